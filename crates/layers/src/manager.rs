//! Track layer lifecycle.
//!
//! Each registered track gets exactly one GeoJSON source and one line layer,
//! both keyed by its [`LayerId`]. The manager keeps them in sync with the
//! track, recreates them after a style reload, and detaches everything on
//! unregister.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use geojson::{FeatureCollection, JsonObject, JsonValue};
use serde_json::json;
use trailmap_track::{Observable, ObservableId, Subscription, Track};

use crate::config::LayerConfig;
use crate::error::{LayerError, Result, SurfaceError};
use crate::identifiers::{LayerId, ListenerId};
use crate::interaction::{SelectionService, Tool, ToolState};
use crate::palette::{ColorId, ColorPalette};
use crate::style::{
    COLOR_PROPERTY, LineDefaults, LineLayerSpec, LineLayout, OPACITY_PROPERTY, WEIGHT_PROPERTY,
};
use crate::surface::{Cursor, LayerEvent, MapSurface, PointerEvent};

/// What a track is drawn as: its layer and color.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerBinding {
    pub layer_id: LayerId,
    pub color: ColorId,
    /// CSS hex form of `color`
    pub color_hex: String,
}

/// One-shot handle for a registration. Consumed by [`GpxLayers::unregister`].
#[derive(Debug)]
pub struct LayerHandle {
    binding: LayerBinding,
    track_id: ObservableId,
}

impl LayerHandle {
    pub fn layer_id(&self) -> &LayerId {
        &self.binding.layer_id
    }

    pub fn color(&self) -> ColorId {
        self.binding.color
    }

    pub fn binding(&self) -> &LayerBinding {
        &self.binding
    }

    pub fn track_id(&self) -> ObservableId {
        self.track_id
    }
}

fn stamp_missing(properties: &mut JsonObject, key: &str, value: JsonValue) {
    match properties.get(key) {
        None | Some(JsonValue::Null) => {
            properties.insert(key.to_string(), value);
        }
        Some(_) => {}
    }
}

/// Render `track` as features, filling in `color`, `weight` and `opacity`
/// wherever a feature doesn't set them itself.
pub fn derive_features(
    track: &Track,
    color_hex: &str,
    defaults: LineDefaults,
) -> FeatureCollection {
    let mut collection = track.to_feature_collection();
    for feature in &mut collection.features {
        let properties = feature.properties.get_or_insert_with(JsonObject::new);
        stamp_missing(properties, COLOR_PROPERTY, json!(color_hex));
        stamp_missing(properties, WEIGHT_PROPERTY, json!(defaults.weight));
        stamp_missing(properties, OPACITY_PROPERTY, json!(defaults.opacity));
    }
    collection
}

/// Everything the surface and track callbacks need for one registration.
struct TrackRenderer<S> {
    surface: Rc<S>,
    track: Observable<Track>,
    layer_id: LayerId,
    color_hex: String,
    defaults: LineDefaults,
    layout: LineLayout,
}

impl<S: MapSurface> TrackRenderer<S> {
    fn features(&self, track: &Track) -> FeatureCollection {
        derive_features(track, &self.color_hex, self.defaults)
    }

    /// Create whichever of source and layer is missing. Does nothing before the style loads.
    fn ensure_present(&self) -> std::result::Result<(), SurfaceError> {
        let id = self.layer_id.as_str();
        if !self.surface.is_style_loaded() {
            tracing::debug!("style not loaded, deferring {id}");
            return Ok(());
        }

        if !self.surface.has_source(id) {
            let data = self.features(&self.track.get());
            self.surface.add_geojson_source(id, data)?;
        }
        if !self.surface.has_layer(id) {
            self.surface
                .add_layer(&LineLayerSpec::data_driven(id, id, self.layout))?;
        }
        Ok(())
    }

    fn sync(&self, track: &Track) -> std::result::Result<(), SurfaceError> {
        let id = self.layer_id.as_str();
        if self.surface.has_source(id) {
            self.surface.set_source_data(id, self.features(track))?;
        }
        Ok(())
    }

    fn select(&self, selection: &dyn SelectionService, event: &PointerEvent) {
        if event.modifiers.shift {
            selection.add_select(&self.track);
        } else {
            selection.select(&self.track);
        }
    }
}

struct Registration<S> {
    binding: LayerBinding,
    // callbacks only hold weak references to it
    #[allow(dead_code)]
    renderer: Rc<TrackRenderer<S>>,
    subscription: Subscription,
    style_listener: ListenerId,
    input_listeners: Vec<ListenerId>,
}

/// Owns the track-to-layer registrations and the color palette they share.
pub struct GpxLayers<S: MapSurface> {
    surface: Rc<S>,
    palette: ColorPalette,
    defaults: LineDefaults,
    layout: LineLayout,
    selection: Rc<dyn SelectionService>,
    tool: ToolState,
    registrations: HashMap<ObservableId, Registration<S>>,
}

impl<S: MapSurface + 'static> GpxLayers<S> {
    pub fn new(surface: Rc<S>, selection: Rc<dyn SelectionService>, tool: ToolState) -> Self {
        Self {
            surface,
            palette: ColorPalette::default(),
            defaults: LineDefaults::default(),
            layout: LineLayout::default(),
            selection,
            tool,
            registrations: HashMap::new(),
        }
    }

    pub fn with_config(
        surface: Rc<S>,
        selection: Rc<dyn SelectionService>,
        tool: ToolState,
        config: &LayerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            palette: config.palette()?,
            defaults: config.defaults(),
            layout: config.layout(),
            ..Self::new(surface, selection, tool)
        })
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Resolve a track to the layer drawing it.
    pub fn binding_for(&self, track: &Observable<Track>) -> Option<&LayerBinding> {
        self.registrations
            .get(&track.id())
            .map(|registration| &registration.binding)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &LayerBinding> {
        self.registrations.values().map(|registration| &registration.binding)
    }

    /// Draw `track` on the surface and keep it in sync until unregistered.
    ///
    /// If the style has not loaded yet the source and layer are created on the
    /// next style-load signal instead.
    pub fn register(&mut self, track: &Observable<Track>) -> Result<LayerHandle> {
        let track_id = track.id();
        if self.registrations.contains_key(&track_id) {
            return Err(LayerError::AlreadyRegistered(track_id));
        }

        let layer_id = LayerId::next();
        let color = self.palette.allocate();
        let binding = LayerBinding {
            layer_id: layer_id.clone(),
            color,
            color_hex: self.palette.hex(color),
        };

        let renderer = Rc::new(TrackRenderer {
            surface: Rc::clone(&self.surface),
            track: track.clone(),
            layer_id: layer_id.clone(),
            color_hex: binding.color_hex.clone(),
            defaults: self.defaults,
            layout: self.layout,
        });

        if let Err(err) = renderer.ensure_present() {
            self.palette.release(color);
            return Err(err.into());
        }

        let subscription = track.subscribe(sync_on_change(Rc::downgrade(&renderer)));
        let style_listener = self
            .surface
            .on_style_load(Rc::new(restore_on_style_load(Rc::downgrade(&renderer))));
        let input_listeners = self.attach_input_handlers(&renderer);

        tracing::debug!(
            "registered {} as {} ({})",
            track.get().name,
            layer_id,
            binding.color_hex
        );

        self.registrations.insert(
            track_id,
            Registration {
                binding: binding.clone(),
                renderer,
                subscription,
                style_listener,
                input_listeners,
            },
        );

        Ok(LayerHandle { binding, track_id })
    }

    fn attach_input_handlers(&self, renderer: &Rc<TrackRenderer<S>>) -> Vec<ListenerId> {
        let id = renderer.layer_id.as_str();

        let weak = Rc::downgrade(renderer);
        let selection = Rc::clone(&self.selection);
        let tool = self.tool.clone();
        let click = self.surface.on_layer(
            LayerEvent::Click,
            id,
            Rc::new(move |event: &PointerEvent| {
                // the routing tool handles its own clicks
                if tool.is_active(Tool::Routing) {
                    return;
                }
                if let Some(renderer) = weak.upgrade() {
                    renderer.select(selection.as_ref(), event);
                }
            }),
        );

        let enter = self.surface.on_layer(
            LayerEvent::MouseEnter,
            id,
            Rc::new(set_cursor_on_hover(Rc::downgrade(renderer), Cursor::Pointer)),
        );
        let leave = self.surface.on_layer(
            LayerEvent::MouseLeave,
            id,
            Rc::new(set_cursor_on_hover(Rc::downgrade(renderer), Cursor::Default)),
        );

        vec![click, enter, leave]
    }

    /// Detach `handle`'s handlers, remove its layer and source, and release its color.
    ///
    /// Teardown always completes; the first surface error, if any, is returned.
    pub fn unregister(&mut self, handle: LayerHandle) -> Result<()> {
        let Some(registration) = self.registrations.remove(&handle.track_id) else {
            return Err(LayerError::UnknownLayer(handle.binding.layer_id));
        };

        for listener in &registration.input_listeners {
            self.surface.off(*listener);
        }
        self.surface.off(registration.style_listener);

        let removed = self.remove_from_surface(&registration.binding.layer_id);

        registration.subscription.cancel();
        self.palette.release(registration.binding.color);

        tracing::debug!("unregistered {}", registration.binding.layer_id);
        removed.map_err(LayerError::from)
    }

    fn remove_from_surface(&self, layer_id: &LayerId) -> std::result::Result<(), SurfaceError> {
        let id = layer_id.as_str();
        // layer first: a source can't be removed while a layer draws it
        if self.surface.has_layer(id) {
            self.surface.remove_layer(id)?;
        }
        if self.surface.has_source(id) {
            self.surface.remove_source(id)?;
        }
        Ok(())
    }

    /// Draw `handle`'s layer above every other layer.
    pub fn move_to_front(&self, handle: &LayerHandle) -> Result<()> {
        let id = handle.layer_id().as_str();
        if self.surface.has_layer(id) {
            self.surface.move_layer(id)?;
        }
        Ok(())
    }
}

fn sync_on_change<S: MapSurface>(renderer: Weak<TrackRenderer<S>>) -> impl FnMut(&Track) + 'static
where
    S: 'static,
{
    move |track: &Track| {
        let Some(renderer) = renderer.upgrade() else {
            return;
        };
        if let Err(err) = renderer.sync(track) {
            tracing::error!("failed to update {}: {err}", renderer.layer_id);
        }
    }
}

fn restore_on_style_load<S: MapSurface>(renderer: Weak<TrackRenderer<S>>) -> impl Fn() + 'static
where
    S: 'static,
{
    move || {
        let Some(renderer) = renderer.upgrade() else {
            return;
        };
        if let Err(err) = renderer.ensure_present() {
            tracing::error!("failed to restore {} after style load: {err}", renderer.layer_id);
        }
    }
}

fn set_cursor_on_hover<S: MapSurface>(
    renderer: Weak<TrackRenderer<S>>,
    cursor: Cursor,
) -> impl Fn(&PointerEvent) + 'static
where
    S: 'static,
{
    move |_event: &PointerEvent| {
        if let Some(renderer) = renderer.upgrade() {
            renderer.surface.set_cursor(cursor);
        }
    }
}
