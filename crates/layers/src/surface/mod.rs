//! The map-surface capability consumed by the layer manager.
//!
//! A surface is single-threaded and uses interior mutability, like the
//! JavaScript map objects it stands in for: every method takes `&self`, and
//! handlers may call back into the surface while it dispatches.

use std::rc::Rc;

use geojson::FeatureCollection;
use serde::Serialize;

use crate::error::SurfaceError;
use crate::identifiers::ListenerId;
use crate::style::LineLayerSpec;

mod memory;

pub use memory::{MemorySurface, SurfaceCall};

/// Pointer events scoped to a single layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerEvent {
    Click,
    MouseEnter,
    MouseLeave,
}

/// Modifier keys held during a pointer event. Shift extends the selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

impl Modifiers {
    pub fn shift() -> Self {
        Self { shift: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerEvent {
    pub event: LayerEvent,
    pub modifiers: Modifiers,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    /// Value for the canvas `style.cursor` property.
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "",
            Cursor::Pointer => "pointer",
        }
    }
}

pub type LayerHandler = Rc<dyn Fn(&PointerEvent)>;
pub type StyleLoadHandler = Rc<dyn Fn()>;

pub trait MapSurface {
    /// `false` until the first style has finished loading.
    fn is_style_loaded(&self) -> bool;

    fn has_source(&self, id: &str) -> bool;
    fn add_geojson_source(&self, id: &str, data: FeatureCollection) -> Result<(), SurfaceError>;
    fn set_source_data(&self, id: &str, data: FeatureCollection) -> Result<(), SurfaceError>;
    /// Fails while a layer still references the source.
    fn remove_source(&self, id: &str) -> Result<(), SurfaceError>;

    fn has_layer(&self, id: &str) -> bool;
    fn add_layer(&self, spec: &LineLayerSpec) -> Result<(), SurfaceError>;
    fn remove_layer(&self, id: &str) -> Result<(), SurfaceError>;
    /// Move a layer above every other layer.
    fn move_layer(&self, id: &str) -> Result<(), SurfaceError>;

    /// Attach a handler for `event` on `layer_id`. Survives style reloads.
    fn on_layer(&self, event: LayerEvent, layer_id: &str, handler: LayerHandler) -> ListenerId;
    /// Attach a handler for the style-load signal. Sources and layers are gone when it fires.
    fn on_style_load(&self, handler: StyleLoadHandler) -> ListenerId;
    fn off(&self, listener: ListenerId);

    fn set_cursor(&self, cursor: Cursor);
}
