//! Layer configuration, loadable from JSON.
//!
//! ```json
//! {
//!   "colors": ["#ff0000", "#0000ff"],
//!   "default_weight": 4,
//!   "default_opacity": 0.8,
//!   "line_join": "round",
//!   "line_cap": "butt"
//! }
//! ```
//!
//! Every field is optional and falls back to [`LayerConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LayerError, Result};
use crate::palette::{ColorPalette, TRAIL_COLORS, to_hex};
use crate::style::{DEFAULT_OPACITY, DEFAULT_WEIGHT, LineCap, LineDefaults, LineJoin, LineLayout};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub colors: Vec<String>,
    pub default_weight: f64,
    pub default_opacity: f64,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            colors: TRAIL_COLORS.iter().copied().map(to_hex).collect(),
            default_weight: DEFAULT_WEIGHT,
            default_opacity: DEFAULT_OPACITY,
            line_join: LineJoin::default(),
            line_cap: LineCap::default(),
        }
    }
}

impl LayerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.default_weight.is_finite() && self.default_weight > 0.0) {
            return Err(LayerError::InvalidConfig(format!(
                "default_weight must be positive, got {}",
                self.default_weight
            )));
        }
        if !(0.0..=1.0).contains(&self.default_opacity) {
            return Err(LayerError::InvalidConfig(format!(
                "default_opacity must be within 0..=1, got {}",
                self.default_opacity
            )));
        }
        Ok(())
    }

    pub fn palette(&self) -> Result<ColorPalette> {
        ColorPalette::from_hex(&self.colors)
    }

    pub fn defaults(&self) -> LineDefaults {
        LineDefaults {
            weight: self.default_weight,
            opacity: self.default_opacity,
        }
    }

    pub fn layout(&self) -> LineLayout {
        LineLayout {
            line_join: self.line_join,
            line_cap: self.line_cap,
        }
    }
}
