use geojson::FeatureCollection;
use serde_json::{json, Value};

pub const STYLE_URL: &str = "https://openmaptiles.geo.data.gouv.fr/styles/osm-bright/style.json";

pub const SOURCE_ID: &str = "declikers";
pub const CLUSTER_LAYER_ID: &str = "declikersCluster";
pub const POINT_LAYER_ID: &str = "declikers";
pub const COUNT_LAYER_ID: &str = "declikersClusterSymbol";

/// Cluster radius in pixels.
const CLUSTER_RADIUS: u32 = 50;

const FILL_COLOR: &str = "#f7c744";
const STROKE_COLOR: &str = "#284f42";

/// Options the map view is created with.
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub style_url: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom: f64,
    /// (longitude, latitude)
    pub center: (f64, f64),
    pub attribution_control: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        MapOptions {
            style_url: STYLE_URL.to_string(),
            min_zoom: 2.0,
            max_zoom: 18.0,
            zoom: 5.0,
            center: (2.0, 46.0),
            attribution_control: false,
        }
    }
}

impl MapOptions {
    pub fn to_json(&self, container_id: &str) -> Value {
        json!({
            "container": container_id,
            "style": self.style_url,
            "attributionControl": self.attribution_control,
            "minZoom": self.min_zoom,
            "maxZoom": self.max_zoom,
            "zoom": self.zoom,
            "center": { "lon": self.center.0, "lat": self.center.1 },
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleControlSpec {
    pub max_width: u32,
    pub unit: &'static str,
    pub position: &'static str,
}

impl Default for ScaleControlSpec {
    fn default() -> Self {
        ScaleControlSpec {
            max_width: 100,
            unit: "metric",
            position: "bottom-left",
        }
    }
}

impl ScaleControlSpec {
    pub fn to_json(&self) -> Value {
        json!({ "maxWidth": self.max_width, "unit": self.unit })
    }
}

/// A clustered GeoJSON source with a per-cluster `count` aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSpec {
    pub id: &'static str,
    pub cluster_radius: u32,
}

impl SourceSpec {
    pub fn declikers() -> Self {
        SourceSpec {
            id: SOURCE_ID,
            cluster_radius: CLUSTER_RADIUS,
        }
    }

    pub fn to_json(&self, data: &FeatureCollection) -> Value {
        json!({
            "type": "geojson",
            "data": data,
            "cluster": true,
            "clusterRadius": self.cluster_radius,
            "clusterProperties": {
                "count": ["+", 1],
            },
        })
    }
}

/// Which side of the `cluster` flag a layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterFilter {
    Clusters,
    Points,
}

impl ClusterFilter {
    pub fn expression(self) -> Value {
        match self {
            ClusterFilter::Clusters => json!(["==", "cluster", true]),
            ClusterFilter::Points => json!(["!=", "cluster", true]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Circle,
    Symbol,
}

impl LayerKind {
    fn as_str(self) -> &'static str {
        match self {
            LayerKind::Circle => "circle",
            LayerKind::Symbol => "symbol",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: &'static str,
    pub source: &'static str,
    pub kind: LayerKind,
    pub filter: ClusterFilter,
    pub paint: Value,
    pub layout: Option<Value>,
}

impl LayerSpec {
    pub fn to_json(&self) -> Value {
        let mut layer = json!({
            "id": self.id,
            "source": self.source,
            "type": self.kind.as_str(),
            "filter": self.filter.expression(),
            "paint": self.paint,
        });
        if let Some(layout) = &self.layout {
            layer["layout"] = layout.clone();
        }
        layer
    }
}

fn cluster_circles() -> LayerSpec {
    LayerSpec {
        id: CLUSTER_LAYER_ID,
        source: SOURCE_ID,
        kind: LayerKind::Circle,
        filter: ClusterFilter::Clusters,
        paint: json!({
            "circle-color": FILL_COLOR,
            "circle-stroke-color": STROKE_COLOR,
            "circle-radius": ["interpolate", ["linear"], ["get", "count"], 1, 10, 50, 25],
            "circle-stroke-width": 2,
        }),
        layout: None,
    }
}

fn point_circles() -> LayerSpec {
    LayerSpec {
        id: POINT_LAYER_ID,
        source: SOURCE_ID,
        kind: LayerKind::Circle,
        filter: ClusterFilter::Points,
        paint: json!({
            "circle-color": FILL_COLOR,
            "circle-stroke-color": STROKE_COLOR,
            "circle-radius": 7,
            "circle-stroke-width": 2,
        }),
        layout: None,
    }
}

fn cluster_counts() -> LayerSpec {
    LayerSpec {
        id: COUNT_LAYER_ID,
        source: SOURCE_ID,
        kind: LayerKind::Symbol,
        filter: ClusterFilter::Clusters,
        paint: json!({ "text-color": STROKE_COLOR }),
        layout: Some(json!({
            "text-field": ["get", "count"],
            "text-size": 16,
            "text-allow-overlap": true,
            "text-font": ["Noto Sans Bold"],
        })),
    }
}

/// Layers in registration order; the count labels are left out when `no_figures` is set.
pub fn layers(no_figures: bool) -> Vec<LayerSpec> {
    let mut layers = vec![cluster_circles(), point_circles()];
    if !no_figures {
        layers.push(cluster_counts());
    }
    layers
}
