//! GPX loading.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geo::LineString;
use gpx::{Gpx, Waypoint};

use crate::error::Result;
use crate::model::{Track, TrackPath};

const UNTITLED: &str = "Untitled";

fn waypoints_to_line(points: &[Waypoint]) -> LineString<f64> {
    points.iter().map(|waypoint| waypoint.point().0).collect()
}

fn gpx_to_paths(gpx: &Gpx) -> Vec<TrackPath> {
    let mut paths = Vec::with_capacity(gpx.tracks.len() + gpx.routes.len());

    for track in &gpx.tracks {
        let segments = track
            .segments
            .iter()
            .filter(|segment| !segment.points.is_empty())
            .map(|segment| waypoints_to_line(&segment.points))
            .collect();
        let mut path = TrackPath::new(segments);
        path.name = track.name.clone();
        paths.push(path);
    }

    for route in &gpx.routes {
        let segments = if route.points.is_empty() {
            Vec::new()
        } else {
            vec![waypoints_to_line(&route.points)]
        };
        let mut path = TrackPath::new(segments);
        path.name = route.name.clone();
        paths.push(path);
    }

    paths
}

fn gpx_name(gpx: &Gpx) -> Option<String> {
    gpx.metadata
        .as_ref()
        .and_then(|metadata| metadata.name.clone())
        .or_else(|| gpx.tracks.iter().find_map(|track| track.name.clone()))
}

/// Parse a document into its own name, if it carries one, and its paths.
fn read_gpx<R: Read>(reader: R) -> Result<(Option<String>, Vec<TrackPath>)> {
    let gpx = gpx::read(reader)?;

    tracing::debug!(
        "parsed GPX with {} tracks and {} routes",
        gpx.tracks.len(),
        gpx.routes.len()
    );

    Ok((gpx_name(&gpx), gpx_to_paths(&gpx)))
}

impl Track {
    /// Parse a GPX document.
    ///
    /// Every `<trk>` becomes a path with one segment per non-empty `<trkseg>`,
    /// every `<rte>` a single-segment path.
    pub fn from_gpx<R: Read>(reader: R) -> Result<Self> {
        let (name, paths) = read_gpx(reader)?;
        Ok(Self {
            name: name.unwrap_or_else(|| UNTITLED.to_string()),
            paths,
        })
    }

    /// Load a GPX file, falling back to the file stem when the document has no name.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let (name, paths) = read_gpx(BufReader::new(file))?;

        let name = name
            .or_else(|| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .unwrap_or_else(|| UNTITLED.to_string());

        Ok(Self { name, paths })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TWO_TRACKS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="trailmap-tests" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata>
    <name>Col de la Croix</name>
  </metadata>
  <trk>
    <name>Ascent</name>
    <trkseg>
      <trkpt lat="45.0" lon="6.0"></trkpt>
      <trkpt lat="45.1" lon="6.1"></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="45.2" lon="6.2"></trkpt>
    </trkseg>
  </trk>
  <trk>
    <name>Descent</name>
    <trkseg>
      <trkpt lat="45.2" lon="6.2"></trkpt>
      <trkpt lat="45.0" lon="6.3"></trkpt>
    </trkseg>
  </trk>
  <rte>
    <name>Planned</name>
    <rtept lat="44.9" lon="5.9"></rtept>
    <rtept lat="45.0" lon="6.0"></rtept>
  </rte>
</gpx>"#;

    const UNNAMED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="trailmap-tests" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="1.0" lon="2.0"></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    #[test]
    fn test_tracks_and_routes_become_paths() {
        let track = Track::from_gpx(TWO_TRACKS.as_bytes()).unwrap();

        assert_eq!(track.name, "Col de la Croix");
        assert_eq!(track.paths.len(), 3);
        assert_eq!(track.paths[0].name.as_deref(), Some("Ascent"));
        assert_eq!(track.paths[0].segments.len(), 2);
        assert_eq!(track.paths[2].name.as_deref(), Some("Planned"));
        assert_eq!(track.point_count(), 7);
    }

    #[test]
    fn test_coordinates_are_lon_lat() {
        let track = Track::from_gpx(TWO_TRACKS.as_bytes()).unwrap();
        let first = track.paths[0].segments[0].0[0];
        assert_relative_eq!(first.x, 6.0);
        assert_relative_eq!(first.y, 45.0);
    }

    #[test]
    fn test_unnamed_document() {
        let track = Track::from_gpx(UNNAMED.as_bytes()).unwrap();
        assert_eq!(track.name, "Untitled");
        assert_eq!(track.paths[0].name, None);
    }

    fn write_temp(file_name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("trailmap-reader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file_name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_open_falls_back_to_file_stem() {
        let path = write_temp("morning_ride.gpx", UNNAMED);
        let track = Track::open(&path).unwrap();
        assert_eq!(track.name, "morning_ride");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_open_keeps_document_named_untitled() {
        let document = UNNAMED.replace(
            "<trk>",
            "<metadata><name>Untitled</name></metadata>\n  <trk>",
        );
        let path = write_temp("evening_walk.gpx", &document);
        let track = Track::open(&path).unwrap();
        assert_eq!(track.name, "Untitled");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_open_missing_file_is_an_error() {
        assert!(matches!(
            Track::open("/nonexistent/trailmap/none.gpx"),
            Err(crate::error::TrackError::Io(_))
        ));
    }

    #[test]
    fn test_invalid_document_is_an_error() {
        assert!(Track::from_gpx("<gpx".as_bytes()).is_err());
    }
}
