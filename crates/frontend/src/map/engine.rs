use std::rc::Rc;

use decliker_shared::features::FeatureProperties;
use geojson::FeatureCollection;

use super::style::{LayerSpec, ScaleControlSpec, SourceSpec};

/// Pointer events a layer can be subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    Enter,
    Leave,
    Click,
}

impl PointerEvent {
    pub fn event_name(self) -> &'static str {
        match self {
            PointerEvent::Enter => "mouseenter",
            PointerEvent::Leave => "mouseleave",
            PointerEvent::Click => "click",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Pointer,
}

impl Cursor {
    pub fn css_value(self) -> &'static str {
        match self {
            Cursor::Default => "",
            Cursor::Pointer => "pointer",
        }
    }
}

/// A pointer event delivered on a named layer, with every feature under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerEvent {
    pub kind: PointerEvent,
    pub layer_id: String,
    pub features: Vec<FeatureProperties>,
}

pub type LayerHandler = Rc<dyn Fn(&LayerEvent)>;
pub type LoadHandler = Box<dyn FnOnce()>;
pub type ClusterLeavesCallback = Box<dyn FnOnce(Result<Vec<FeatureProperties>, String>)>;

/// What the controller needs from a rendering engine.
///
/// All callbacks run on the UI event loop, one at a time. Implementations may
/// invoke them at any later point, including after [`MapEngine::remove`].
pub trait MapEngine {
    /// Run `handler` once the style and tiles have finished loading.
    fn on_load(&self, handler: LoadHandler);

    fn add_scale_control(&self, control: &ScaleControlSpec) -> Result<(), String>;

    /// Register a clustered GeoJSON source seeded with `data`.
    fn add_source(&self, source: &SourceSpec, data: &FeatureCollection) -> Result<(), String>;

    fn add_layer(&self, layer: &LayerSpec) -> Result<(), String>;

    fn on_layer(&self, kind: PointerEvent, layer_id: &str, handler: LayerHandler);

    fn set_cursor(&self, cursor: Cursor);

    /// Replace the source's whole feature collection. Clusters are recomputed by the engine.
    fn set_source_data(&self, source_id: &str, data: &FeatureCollection) -> Result<(), String>;

    /// Resolve the leaf features of a cluster; `done` may fire after an arbitrary delay.
    fn cluster_leaves(
        &self,
        source_id: &str,
        cluster_id: u64,
        limit: u64,
        offset: u64,
        done: ClusterLeavesCallback,
    );

    /// Release the engine instance and everything registered on it.
    fn remove(&self);
}
