//! In-memory map surface.
//!
//! Behaves like a style-driven web map closely enough to drive the layer
//! manager without a renderer: sources and layers live in an ordered stack,
//! a style reload wipes both, and layer handlers are dispatched by id.
//! Every successful mutation is appended to a call log.

use std::cell::RefCell;
use std::collections::BTreeMap;

use geojson::FeatureCollection;
use serde_json::{Value, json};

use super::{
    Cursor, LayerEvent, LayerHandler, MapSurface, Modifiers, PointerEvent, StyleLoadHandler,
};
use crate::error::SurfaceError;
use crate::identifiers::ListenerId;
use crate::style::LineLayerSpec;

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    AddSource(String),
    SetSourceData(String),
    RemoveSource(String),
    AddLayer(String),
    RemoveLayer(String),
    MoveLayer(String),
    On(LayerEvent, String),
    OnStyleLoad,
    Off(ListenerId),
    SetCursor(Cursor),
}

struct LayerListener {
    id: ListenerId,
    event: LayerEvent,
    layer_id: String,
    handler: LayerHandler,
}

#[derive(Default)]
struct State {
    style_loaded: bool,
    sources: BTreeMap<String, FeatureCollection>,
    // bottom to top
    layers: Vec<LineLayerSpec>,
    layer_listeners: Vec<LayerListener>,
    style_listeners: Vec<(ListenerId, StyleLoadHandler)>,
    cursor: Cursor,
    calls: Vec<SurfaceCall>,
    next_listener: u64,
}

impl State {
    fn layer_index(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.id == id)
    }

    fn next_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }
}

pub struct MemorySurface {
    state: RefCell<State>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// A surface whose style has already loaded.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(State {
                style_loaded: true,
                ..State::default()
            }),
        }
    }

    /// A surface still waiting for its first style; see [`MemorySurface::finish_style_load`].
    pub fn loading() -> Self {
        Self {
            state: RefCell::new(State::default()),
        }
    }

    pub fn finish_style_load(&self) {
        self.state.borrow_mut().style_loaded = true;
        self.fire_style_load();
    }

    /// Swap the style: drop every source and layer, then signal style load.
    pub fn reload_style(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.sources.clear();
            state.layers.clear();
            state.style_loaded = true;
        }
        self.fire_style_load();
    }

    fn fire_style_load(&self) {
        let handlers: Vec<StyleLoadHandler> = self
            .state
            .borrow()
            .style_listeners
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();

        tracing::debug!("style loaded, notifying {} listeners", handlers.len());
        for handler in handlers {
            handler();
        }
    }

    /// Dispatch a pointer event to `layer_id`'s handlers.
    ///
    /// Returns the number of handlers invoked; zero when the layer isn't on the map.
    pub fn dispatch(&self, event: LayerEvent, layer_id: &str, modifiers: Modifiers) -> usize {
        let handlers: Vec<LayerHandler> = {
            let state = self.state.borrow();
            if state.layer_index(layer_id).is_none() {
                return 0;
            }
            state
                .layer_listeners
                .iter()
                .filter(|listener| listener.event == event && listener.layer_id == layer_id)
                .map(|listener| listener.handler.clone())
                .collect()
        };

        let pointer = PointerEvent { event, modifiers };
        for handler in &handlers {
            handler(&pointer);
        }
        handlers.len()
    }

    pub fn click(&self, layer_id: &str, modifiers: Modifiers) -> usize {
        self.dispatch(LayerEvent::Click, layer_id, modifiers)
    }

    pub fn mouse_enter(&self, layer_id: &str) -> usize {
        self.dispatch(LayerEvent::MouseEnter, layer_id, Modifiers::default())
    }

    pub fn mouse_leave(&self, layer_id: &str) -> usize {
        self.dispatch(LayerEvent::MouseLeave, layer_id, Modifiers::default())
    }

    pub fn source_data(&self, id: &str) -> Option<FeatureCollection> {
        self.state.borrow().sources.get(id).cloned()
    }

    pub fn layer(&self, id: &str) -> Option<LineLayerSpec> {
        let state = self.state.borrow();
        state.layer_index(id).map(|index| state.layers[index].clone())
    }

    /// Layer ids from bottom to top.
    pub fn layer_order(&self) -> Vec<String> {
        self.state.borrow().layers.iter().map(|layer| layer.id.clone()).collect()
    }

    pub fn cursor(&self) -> Cursor {
        self.state.borrow().cursor
    }

    pub fn listener_count(&self) -> usize {
        let state = self.state.borrow();
        state.layer_listeners.len() + state.style_listeners.len()
    }

    pub fn take_calls(&self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    /// Current style state: layers bottom to top, each with its source data.
    pub fn snapshot(&self) -> Value {
        let state = self.state.borrow();
        let layers: Vec<Value> = state
            .layers
            .iter()
            .map(|layer| {
                let mut entry = layer.to_json();
                if let Some(data) = state.sources.get(&layer.source) {
                    entry["data"] = json!(data);
                }
                entry
            })
            .collect();

        json!({
            "style_loaded": state.style_loaded,
            "cursor": state.cursor.as_css(),
            "sources": state.sources.keys().collect::<Vec<_>>(),
            "layers": layers,
        })
    }
}

impl MapSurface for MemorySurface {
    fn is_style_loaded(&self) -> bool {
        self.state.borrow().style_loaded
    }

    fn has_source(&self, id: &str) -> bool {
        self.state.borrow().sources.contains_key(id)
    }

    fn add_geojson_source(&self, id: &str, data: FeatureCollection) -> Result<(), SurfaceError> {
        let mut state = self.state.borrow_mut();
        if !state.style_loaded {
            return Err(SurfaceError::StyleNotLoaded);
        }
        if state.sources.contains_key(id) {
            return Err(SurfaceError::SourceExists(id.to_string()));
        }
        state.sources.insert(id.to_string(), data);
        state.calls.push(SurfaceCall::AddSource(id.to_string()));
        Ok(())
    }

    fn set_source_data(&self, id: &str, data: FeatureCollection) -> Result<(), SurfaceError> {
        let mut state = self.state.borrow_mut();
        let Some(source) = state.sources.get_mut(id) else {
            return Err(SurfaceError::SourceNotFound(id.to_string()));
        };
        *source = data;
        state.calls.push(SurfaceCall::SetSourceData(id.to_string()));
        Ok(())
    }

    fn remove_source(&self, id: &str) -> Result<(), SurfaceError> {
        let mut state = self.state.borrow_mut();
        if !state.sources.contains_key(id) {
            return Err(SurfaceError::SourceNotFound(id.to_string()));
        }
        if let Some(layer) = state.layers.iter().find(|layer| layer.source == id) {
            return Err(SurfaceError::SourceInUse {
                source_id: id.to_string(),
                layer_id: layer.id.clone(),
            });
        }
        state.sources.remove(id);
        state.calls.push(SurfaceCall::RemoveSource(id.to_string()));
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.state.borrow().layer_index(id).is_some()
    }

    fn add_layer(&self, spec: &LineLayerSpec) -> Result<(), SurfaceError> {
        let mut state = self.state.borrow_mut();
        if !state.style_loaded {
            return Err(SurfaceError::StyleNotLoaded);
        }
        if state.layer_index(&spec.id).is_some() {
            return Err(SurfaceError::LayerExists(spec.id.clone()));
        }
        if !state.sources.contains_key(&spec.source) {
            return Err(SurfaceError::SourceNotFound(spec.source.clone()));
        }
        state.layers.push(spec.clone());
        state.calls.push(SurfaceCall::AddLayer(spec.id.clone()));
        Ok(())
    }

    fn remove_layer(&self, id: &str) -> Result<(), SurfaceError> {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.layer_index(id) else {
            return Err(SurfaceError::LayerNotFound(id.to_string()));
        };
        state.layers.remove(index);
        state.calls.push(SurfaceCall::RemoveLayer(id.to_string()));
        Ok(())
    }

    fn move_layer(&self, id: &str) -> Result<(), SurfaceError> {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.layer_index(id) else {
            return Err(SurfaceError::LayerNotFound(id.to_string()));
        };
        let layer = state.layers.remove(index);
        state.layers.push(layer);
        state.calls.push(SurfaceCall::MoveLayer(id.to_string()));
        Ok(())
    }

    fn on_layer(&self, event: LayerEvent, layer_id: &str, handler: LayerHandler) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = state.next_listener();
        state.layer_listeners.push(LayerListener {
            id,
            event,
            layer_id: layer_id.to_string(),
            handler,
        });
        state.calls.push(SurfaceCall::On(event, layer_id.to_string()));
        id
    }

    fn on_style_load(&self, handler: StyleLoadHandler) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = state.next_listener();
        state.style_listeners.push((id, handler));
        state.calls.push(SurfaceCall::OnStyleLoad);
        id
    }

    fn off(&self, listener: ListenerId) {
        let mut state = self.state.borrow_mut();
        state.layer_listeners.retain(|l| l.id != listener);
        state.style_listeners.retain(|(id, _)| *id != listener);
        state.calls.push(SurfaceCall::Off(listener));
    }

    fn set_cursor(&self, cursor: Cursor) {
        let mut state = self.state.borrow_mut();
        state.cursor = cursor;
        state.calls.push(SurfaceCall::SetCursor(cursor));
    }
}
