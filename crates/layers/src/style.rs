//! Line layer style for track overlays.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const COLOR_PROPERTY: &str = "color";
pub const WEIGHT_PROPERTY: &str = "weight";
pub const OPACITY_PROPERTY: &str = "opacity";

pub const DEFAULT_WEIGHT: f64 = 6.0;
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Values stamped onto features that don't carry their own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineDefaults {
    pub weight: f64,
    pub opacity: f64,
}

impl Default for LineDefaults {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
            opacity: DEFAULT_OPACITY,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Bevel,
    #[default]
    Round,
    Miter,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineLayout {
    #[serde(rename = "line-join")]
    pub line_join: LineJoin,
    #[serde(rename = "line-cap")]
    pub line_cap: LineCap,
}

/// Paint bound to per-feature properties, so features can override the track defaults.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinePaint {
    #[serde(rename = "line-color")]
    pub line_color: Value,
    #[serde(rename = "line-width")]
    pub line_width: Value,
    #[serde(rename = "line-opacity")]
    pub line_opacity: Value,
}

fn get_property(name: &str) -> Value {
    json!(["get", name])
}

impl Default for LinePaint {
    fn default() -> Self {
        Self {
            line_color: get_property(COLOR_PROPERTY),
            line_width: get_property(WEIGHT_PROPERTY),
            line_opacity: get_property(OPACITY_PROPERTY),
        }
    }
}

/// A `line` layer as understood by Mapbox/MapLibre style documents.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineLayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub source: String,
    pub layout: LineLayout,
    pub paint: LinePaint,
}

impl LineLayerSpec {
    /// Layer `id` drawing source `source` with data-driven paint.
    pub fn data_driven(
        id: impl Into<String>,
        source: impl Into<String>,
        layout: LineLayout,
    ) -> Self {
        Self {
            id: id.into(),
            kind: "line",
            source: source.into(),
            layout,
            paint: LinePaint::default(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!(self)
    }
}
