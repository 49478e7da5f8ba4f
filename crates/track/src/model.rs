//! Track data model.
//!
//! Coordinates follow the GeoJSON convention: `x` is longitude, `y` is latitude.

use geo::{BoundingRect, LineString, MultiLineString, Rect};

/// Per-path style overrides.
///
/// Fields left as `None` fall back to whatever the renderer assigns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackStyle {
    /// CSS hex color, e.g. `"#ff9900"`
    pub color: Option<String>,
    /// Line width in pixels
    pub weight: Option<f64>,
    /// Line opacity in `0.0..=1.0`
    pub opacity: Option<f64>,
}

impl TrackStyle {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.weight.is_none() && self.opacity.is_none()
    }
}

/// One continuous activity inside a track (a GPX `<trk>` or `<rte>`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackPath {
    pub name: Option<String>,
    pub segments: Vec<LineString<f64>>,
    pub style: TrackStyle,
}

impl TrackPath {
    pub fn new(segments: Vec<LineString<f64>>) -> Self {
        Self {
            name: None,
            segments,
            style: TrackStyle::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_style(mut self, style: TrackStyle) -> Self {
        self.style = style;
        self
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|segment| segment.0.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}

/// A GPS track file: a name plus the paths it contains.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Track {
    pub name: String,
    pub paths: Vec<TrackPath>,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            paths: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: TrackPath) -> Self {
        self.paths.push(path);
        self
    }

    pub fn point_count(&self) -> usize {
        self.paths.iter().map(TrackPath::point_count).sum()
    }

    /// Bounding box over every coordinate, or `None` for an empty track.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        let lines: Vec<LineString<f64>> = self
            .paths
            .iter()
            .flat_map(|path| path.segments.iter().cloned())
            .collect();
        MultiLineString::new(lines).bounding_rect()
    }
}
