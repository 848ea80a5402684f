//! `MapEngine` backed by the global `maplibregl` namespace (maplibre-gl 4.x).

use std::cell::RefCell;

use decliker_shared::features::FeatureProperties;
use geojson::FeatureCollection;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::engine::{ClusterLeavesCallback, Cursor, LayerEvent, LayerHandler, LoadHandler, MapEngine, PointerEvent};
use super::style::{LayerSpec, MapOptions, ScaleControlSpec, SourceSpec};

#[wasm_bindgen(js_namespace = maplibregl)]
extern "C" {
    #[wasm_bindgen(js_name = Map)]
    type JsMap;

    #[wasm_bindgen(constructor, js_class = "Map", catch)]
    fn new(options: &JsValue) -> Result<JsMap, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &JsMap, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_name = on)]
    fn on_layer(this: &JsMap, event: &str, layer_id: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, catch, js_name = addControl)]
    fn add_control(this: &JsMap, control: &JsScaleControl, position: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = addSource)]
    fn add_source(this: &JsMap, id: &str, source: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = addLayer)]
    fn add_layer(this: &JsMap, layer: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getSource)]
    fn get_source(this: &JsMap, id: &str) -> Option<JsGeoJsonSource>;

    #[wasm_bindgen(method, js_name = getCanvas)]
    fn get_canvas(this: &JsMap) -> web_sys::HtmlElement;

    #[wasm_bindgen(method)]
    fn remove(this: &JsMap);

    #[wasm_bindgen(js_name = ScaleControl)]
    type JsScaleControl;

    #[wasm_bindgen(constructor, js_class = "ScaleControl")]
    fn new(options: &JsValue) -> JsScaleControl;

    #[wasm_bindgen(js_name = GeoJSONSource)]
    type JsGeoJsonSource;

    #[wasm_bindgen(method, catch, js_name = setData)]
    fn set_data(this: &JsGeoJsonSource, data: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = getClusterLeaves)]
    fn get_cluster_leaves(
        this: &JsGeoJsonSource,
        cluster_id: f64,
        limit: f64,
        offset: f64,
    ) -> Result<js_sys::Promise, JsValue>;
}

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, String> {
    let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
    js_sys::JSON::parse(&json).map_err(js_error)
}

fn feature_properties(feature: &JsValue) -> Option<FeatureProperties> {
    let properties = js_sys::Reflect::get(feature, &JsValue::from_str("properties")).ok()?;
    let json: String = js_sys::JSON::stringify(&properties).ok()?.into();
    serde_json::from_str(&json).ok()
}

fn features_of(array: &JsValue) -> Vec<FeatureProperties> {
    if !js_sys::Array::is_array(array) {
        return Vec::new();
    }
    js_sys::Array::from(array)
        .iter()
        .filter_map(|f| feature_properties(&f))
        .collect()
}

pub struct MaplibreEngine {
    map: JsMap,
    load_listener: RefCell<Option<Closure<dyn FnMut()>>>,
    layer_listeners: RefCell<Vec<Closure<dyn FnMut(JsValue)>>>,
}

impl MaplibreEngine {
    pub fn create(container_id: &str, options: &MapOptions) -> Result<Self, String> {
        let options = to_js(&options.to_json(container_id))?;
        let map = JsMap::new(&options).map_err(js_error)?;
        Ok(MaplibreEngine {
            map,
            load_listener: RefCell::new(None),
            layer_listeners: RefCell::new(Vec::new()),
        })
    }

    fn source(&self, source_id: &str) -> Result<JsGeoJsonSource, String> {
        self.map
            .get_source(source_id)
            .ok_or_else(|| format!("Unknown source: {}", source_id))
    }
}

impl MapEngine for MaplibreEngine {
    fn on_load(&self, handler: LoadHandler) {
        let mut handler = Some(handler);
        let listener = Closure::<dyn FnMut()>::new(move || {
            if let Some(handler) = handler.take() {
                handler();
            }
        });
        self.map.on("load", listener.as_ref().unchecked_ref());
        *self.load_listener.borrow_mut() = Some(listener);
    }

    fn add_scale_control(&self, control: &ScaleControlSpec) -> Result<(), String> {
        let scale = JsScaleControl::new(&to_js(&control.to_json())?);
        self.map
            .add_control(&scale, control.position)
            .map_err(js_error)
    }

    fn add_source(&self, source: &SourceSpec, data: &FeatureCollection) -> Result<(), String> {
        self.map
            .add_source(source.id, &to_js(&source.to_json(data))?)
            .map_err(js_error)
    }

    fn add_layer(&self, layer: &LayerSpec) -> Result<(), String> {
        self.map.add_layer(&to_js(&layer.to_json())?).map_err(js_error)
    }

    fn on_layer(&self, kind: PointerEvent, layer_id: &str, handler: LayerHandler) {
        let id = layer_id.to_string();
        let listener = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
            let features = js_sys::Reflect::get(&event, &JsValue::from_str("features"))
                .map(|f| features_of(&f))
                .unwrap_or_default();
            handler(&LayerEvent {
                kind,
                layer_id: id.clone(),
                features,
            });
        });
        self.map
            .on_layer(kind.event_name(), layer_id, listener.as_ref().unchecked_ref());
        self.layer_listeners.borrow_mut().push(listener);
    }

    fn set_cursor(&self, cursor: Cursor) {
        let _ = self
            .map
            .get_canvas()
            .style()
            .set_property("cursor", cursor.css_value());
    }

    fn set_source_data(&self, source_id: &str, data: &FeatureCollection) -> Result<(), String> {
        self.source(source_id)?.set_data(&to_js(data)?).map_err(js_error)
    }

    fn cluster_leaves(
        &self,
        source_id: &str,
        cluster_id: u64,
        limit: u64,
        offset: u64,
        done: ClusterLeavesCallback,
    ) {
        let promise = self.source(source_id).and_then(|source| {
            source
                .get_cluster_leaves(cluster_id as f64, limit as f64, offset as f64)
                .map_err(js_error)
        });
        let promise = match promise {
            Ok(p) => p,
            Err(e) => {
                done(Err(e));
                return;
            }
        };
        wasm_bindgen_futures::spawn_local(async move {
            let result = JsFuture::from(promise)
                .await
                .map(|leaves| features_of(&leaves))
                .map_err(js_error);
            done(result);
        });
    }

    fn remove(&self) {
        self.map.remove();
        self.layer_listeners.borrow_mut().clear();
        self.load_listener.borrow_mut().take();
    }
}
