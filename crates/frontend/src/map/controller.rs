use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashSet};
use std::rc::{Rc, Weak};

use decliker_shared::features::{self, ClusterProperties, FeatureProperties};
use decliker_shared::models::Decliker;

use super::engine::{Cursor, LayerEvent, MapEngine, PointerEvent};
use super::style::{self, ScaleControlSpec, SourceSpec, CLUSTER_LAYER_ID, POINT_LAYER_ID, SOURCE_ID};

/// Per-mount options of the map view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapConfig {
    /// Wire hover/click handlers and show the popup. Display-only otherwise.
    pub with_name: bool,
    /// Skip the cluster count labels.
    pub no_figures: bool,
}

/// Where the interaction state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Idle,
    HoverPoint,
    HoverCluster,
    Selected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Hover {
    #[default]
    None,
    Point,
    Cluster,
}

type SelectionListener = Box<dyn Fn(Option<Vec<Decliker>>)>;

struct Inner<E> {
    /// The live engine handle. `None` before mount and after teardown.
    engine: RefCell<Option<E>>,
    ready: Cell<bool>,
    hover: Cell<Hover>,
    selection: RefCell<Option<Vec<Decliker>>>,
    /// Last profession set asked for, applied on ready if it came early.
    filter: RefCell<BTreeSet<String>>,
    declikers: Vec<Decliker>,
    config: MapConfig,
    on_selection: SelectionListener,
}

/// Owns one map engine instance per mounted view and mediates every access to it.
///
/// Cloning is cheap and yields another handle on the same view state. Engine
/// callbacks only hold weak references, so dropping the last clone makes any
/// late callback a no-op.
pub struct MapController<E: MapEngine> {
    inner: Rc<Inner<E>>,
}

impl<E: MapEngine> Clone for MapController<E> {
    fn clone(&self) -> Self {
        MapController {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E: MapEngine + 'static> MapController<E> {
    pub fn new(
        declikers: Vec<Decliker>,
        config: MapConfig,
        on_selection: impl Fn(Option<Vec<Decliker>>) + 'static,
    ) -> Self {
        MapController {
            inner: Rc::new(Inner {
                engine: RefCell::new(None),
                ready: Cell::new(false),
                hover: Cell::new(Hover::None),
                selection: RefCell::new(None),
                filter: RefCell::new(BTreeSet::new()),
                declikers,
                config,
                on_selection: Box::new(on_selection),
            }),
        }
    }

    fn from_weak(weak: &Weak<Inner<E>>) -> Option<Self> {
        weak.upgrade().map(|inner| MapController { inner })
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.engine.borrow().is_some()
    }

    pub fn selection(&self) -> Option<Vec<Decliker>> {
        self.inner.selection.borrow().clone()
    }

    pub fn interaction(&self) -> Interaction {
        if self.inner.selection.borrow().is_some() {
            return Interaction::Selected;
        }
        match self.inner.hover.get() {
            Hover::None => Interaction::Idle,
            Hover::Point => Interaction::HoverPoint,
            Hover::Cluster => Interaction::HoverCluster,
        }
    }

    /// Create the engine and schedule one-time setup. A no-op if this view already
    /// owns an engine. Returns whether a new engine was created.
    pub fn mount(&self, create: impl FnOnce() -> Result<E, String>) -> bool {
        if self.is_mounted() {
            tracing::debug!("Map engine already initialised, skipping mount");
            return false;
        }

        let engine = match create() {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = %e, "Could not create map");
                return false;
            }
        };
        *self.inner.engine.borrow_mut() = Some(engine);

        let weak = Rc::downgrade(&self.inner);
        if let Some(engine) = self.inner.engine.borrow().as_ref() {
            engine.on_load(Box::new(move || {
                if let Some(controller) = Self::from_weak(&weak) {
                    controller.on_engine_ready();
                }
            }));
        }
        true
    }

    /// One-time setup once the engine has loaded: source, layers, interactions.
    ///
    /// Failures are logged and leave the view mounted; setup is never retried.
    pub fn on_engine_ready(&self) {
        let engine = self.inner.engine.borrow();
        let Some(engine) = engine.as_ref() else {
            tracing::debug!("Map loaded after teardown, skipping setup");
            return;
        };
        if self.inner.ready.replace(true) {
            return;
        }

        if let Err(e) = self.setup(engine) {
            tracing::error!(error = %e, "Could not load map");
        }
    }

    fn setup(&self, engine: &E) -> Result<(), String> {
        engine.add_scale_control(&ScaleControlSpec::default())?;

        let data = features::feature_collection(&self.inner.declikers, &BTreeSet::new());
        engine.add_source(&SourceSpec::declikers(), &data)?;

        for layer in style::layers(self.inner.config.no_figures) {
            engine.add_layer(&layer)?;
        }

        if self.inner.config.with_name {
            self.wire_interactions(engine);
        }

        let filter = self.inner.filter.borrow();
        if !filter.is_empty() {
            let filtered = features::feature_collection(&self.inner.declikers, &filter);
            tracing::debug!(
                professions = filter.len(),
                features = filtered.features.len(),
                "Applying profession filter chosen before load"
            );
            engine.set_source_data(SOURCE_ID, &filtered)?;
        }
        tracing::debug!(
            features = data.features.len(),
            interactive = self.inner.config.with_name,
            "Map ready"
        );
        Ok(())
    }

    fn wire_interactions(&self, engine: &E) {
        for layer_id in [POINT_LAYER_ID, CLUSTER_LAYER_ID] {
            for kind in [PointerEvent::Enter, PointerEvent::Leave, PointerEvent::Click] {
                let weak = Rc::downgrade(&self.inner);
                engine.on_layer(
                    kind,
                    layer_id,
                    Rc::new(move |event: &LayerEvent| {
                        if let Some(controller) = Self::from_weak(&weak) {
                            controller.handle_event(event);
                        }
                    }),
                );
            }
        }
    }

    /// Drive the interaction state machine from a layer event.
    pub fn handle_event(&self, event: &LayerEvent) {
        if !self.inner.config.with_name {
            return;
        }
        let hover = match event.layer_id.as_str() {
            POINT_LAYER_ID => Hover::Point,
            CLUSTER_LAYER_ID => Hover::Cluster,
            _ => return,
        };

        match event.kind {
            PointerEvent::Enter => {
                self.set_cursor(Cursor::Pointer);
                self.inner.hover.set(hover);
            }
            PointerEvent::Leave => {
                self.set_cursor(Cursor::Default);
                self.inner.hover.set(Hover::None);
            }
            PointerEvent::Click if hover == Hover::Point => self.select_points(&event.features),
            PointerEvent::Click => self.expand_cluster(&event.features),
        }
    }

    fn set_cursor(&self, cursor: Cursor) {
        if let Some(engine) = self.inner.engine.borrow().as_ref() {
            engine.set_cursor(cursor);
        }
    }

    fn select_points(&self, clicked: &[FeatureProperties]) {
        let records = self.resolve_records(clicked);
        if records.is_empty() {
            tracing::debug!("Click on point layer without a known decliker");
            return;
        }
        self.set_selection(Some(records));
    }

    fn expand_cluster(&self, clicked: &[FeatureProperties]) {
        let Some(cluster) = clicked.first().and_then(FeatureProperties::as_cluster).cloned() else {
            tracing::debug!("Click on cluster layer without cluster properties");
            return;
        };

        let engine = self.inner.engine.borrow();
        let Some(engine) = engine.as_ref() else {
            return;
        };

        let weak = Rc::downgrade(&self.inner);
        engine.cluster_leaves(
            SOURCE_ID,
            cluster.cluster_id,
            cluster.point_count,
            0,
            Box::new(move |result| {
                if let Some(controller) = Self::from_weak(&weak) {
                    controller.on_cluster_leaves(&cluster, result);
                }
            }),
        );
    }

    fn on_cluster_leaves(
        &self,
        cluster: &ClusterProperties,
        result: Result<Vec<FeatureProperties>, String>,
    ) {
        if !self.is_mounted() {
            tracing::debug!(cluster_id = cluster.cluster_id, "Cluster resolved after teardown");
            return;
        }
        match result {
            Ok(leaves) => {
                let records = self.resolve_records(&leaves);
                if records.is_empty() {
                    tracing::debug!(cluster_id = cluster.cluster_id, "Cluster resolved to no declikers");
                    return;
                }
                self.set_selection(Some(records));
            }
            Err(e) => {
                tracing::warn!(cluster_id = cluster.cluster_id, error = %e, "Could not expand cluster");
            }
        }
    }

    /// Map feature ids back to loaded records, keeping order and dropping duplicates.
    fn resolve_records(&self, properties: &[FeatureProperties]) -> Vec<Decliker> {
        let mut seen = HashSet::new();
        properties
            .iter()
            .filter_map(FeatureProperties::decliker_id)
            .filter(|id| seen.insert(*id))
            .filter_map(|id| self.inner.declikers.iter().find(|d| d.id == id))
            .cloned()
            .collect()
    }

    fn set_selection(&self, selection: Option<Vec<Decliker>>) {
        *self.inner.selection.borrow_mut() = selection.clone();
        (self.inner.on_selection)(selection);
    }

    /// Close the popup.
    pub fn dismiss(&self) {
        self.set_selection(None);
    }

    /// Push the records matching any of `selected` (all of them when empty) to the
    /// live source. The engine and its layers stay as they are. A filter set before
    /// the engine has loaded is kept and pushed once setup completes.
    pub fn apply_filter(&self, selected: &BTreeSet<String>) {
        *self.inner.filter.borrow_mut() = selected.clone();

        let engine = self.inner.engine.borrow();
        let Some(engine) = engine.as_ref() else {
            tracing::debug!("Filter changed without a map, ignoring");
            return;
        };
        if !self.inner.ready.get() {
            tracing::debug!("Filter changed before the map loaded, deferring");
            return;
        }

        let data = features::feature_collection(&self.inner.declikers, selected);
        tracing::debug!(
            professions = selected.len(),
            features = data.features.len(),
            "Applying profession filter"
        );
        if let Err(e) = engine.set_source_data(SOURCE_ID, &data) {
            tracing::error!(error = %e, "Could not update map data");
        }
    }

    /// Release the engine. Later callbacks find no handle and do nothing.
    pub fn teardown(&self) {
        let engine = self.inner.engine.borrow_mut().take();
        if let Some(engine) = engine {
            engine.remove();
        }
        self.inner.ready.set(false);
        self.inner.hover.set(Hover::None);
    }
}
