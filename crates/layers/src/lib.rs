//! # trailmap-layers
//!
//! Binds observable GPS tracks to line layers on an interactive map.
//!
//! [`GpxLayers`] owns one registration per track: it assigns the track a
//! color from a bounded [`ColorPalette`] (least used first), creates a GeoJSON
//! source and a line layer on the [`MapSurface`], keeps the source data in
//! sync with every change to the track, recreates both after a style reload,
//! and wires click and hover handlers for selection.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use geo::LineString;
//! use trailmap_layers::prelude::*;
//! use trailmap_track::{Observable, Track, TrackPath};
//!
//! let surface = Rc::new(MemorySurface::new());
//! let selection = Rc::new(Selection::new());
//! let mut layers = GpxLayers::new(Rc::clone(&surface), selection.clone(), ToolState::new());
//!
//! let ridge = LineString::from(vec![(7.0, 46.0), (7.1, 46.1)]);
//! let track = Observable::new(Track::new("Ridge").with_path(TrackPath::new(vec![ridge])));
//! let handle = layers.register(&track).unwrap();
//! assert!(surface.has_layer(handle.layer_id().as_str()));
//!
//! surface.click(handle.layer_id().as_str(), Modifiers::default());
//! assert!(selection.is_selected(&track));
//!
//! layers.unregister(handle).unwrap();
//! assert!(surface.layer_order().is_empty());
//! ```

pub mod config;
pub mod error;
pub mod identifiers;
pub mod interaction;
pub mod manager;
pub mod palette;
pub mod style;
pub mod surface;

pub mod prelude {
    pub use crate::config::LayerConfig;
    pub use crate::error::{LayerError, Result, SurfaceError};
    pub use crate::identifiers::{LayerId, ListenerId};
    pub use crate::interaction::{Selection, SelectionService, Tool, ToolState};
    pub use crate::manager::{GpxLayers, LayerBinding, LayerHandle, derive_features};
    pub use crate::palette::{ColorId, ColorPalette};
    pub use crate::style::{LineCap, LineDefaults, LineJoin, LineLayerSpec, LineLayout};
    pub use crate::surface::{
        Cursor, LayerEvent, MapSurface, MemorySurface, Modifiers, PointerEvent, SurfaceCall,
    };
}

pub use prelude::*;
