//! GeoJSON conversion for tracks.

use geo::LineString;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::model::{Track, TrackPath};

fn line_positions(line: &LineString<f64>) -> Vec<Vec<f64>> {
    line.0.iter().map(|c| vec![c.x, c.y]).collect()
}

fn path_geometry(path: &TrackPath) -> Value {
    let mut lines: Vec<Vec<Vec<f64>>> = path
        .segments
        .iter()
        .filter(|segment| !segment.0.is_empty())
        .map(line_positions)
        .collect();

    if lines.len() == 1 {
        Value::LineString(lines.remove(0))
    } else {
        Value::MultiLineString(lines)
    }
}

fn path_properties(path: &TrackPath) -> JsonObject {
    let mut properties = JsonObject::new();
    if let Some(name) = &path.name {
        properties.insert("name".to_string(), serde_json::json!(name));
    }
    if let Some(color) = &path.style.color {
        properties.insert("color".to_string(), serde_json::json!(color));
    }
    if let Some(weight) = path.style.weight {
        properties.insert("weight".to_string(), serde_json::json!(weight));
    }
    if let Some(opacity) = path.style.opacity {
        properties.insert("opacity".to_string(), serde_json::json!(opacity));
    }
    properties
}

impl TrackPath {
    /// Convert to a feature, or `None` if the path has no coordinates.
    pub fn to_feature(&self) -> Option<Feature> {
        if self.is_empty() {
            return None;
        }

        Some(Feature {
            bbox: None,
            geometry: Some(Geometry::new(path_geometry(self))),
            id: None,
            properties: Some(path_properties(self)),
            foreign_members: None,
        })
    }
}

impl Track {
    /// One feature per non-empty path, in path order.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.paths.iter().filter_map(TrackPath::to_feature).collect(),
            foreign_members: None,
        }
    }
}
