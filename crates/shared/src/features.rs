//! Projection of decliker records into the GeoJSON payload the map renders.
//!
//! The projection is regenerated on every filter change; nothing here mutates the
//! record set. Each feature carries only `name` and `id`, and the id always maps
//! back to exactly one record.

use std::collections::BTreeSet;

use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

use crate::models::Decliker;

/// Properties of a single decliker point feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclikerProperties {
    pub id: String,
    pub name: String,
}

/// Properties the clustering index attaches to an aggregated feature.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClusterProperties {
    pub cluster_id: u64,
    pub point_count: u64,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Properties of a rendered feature as reported back by the map engine.
///
/// Clusters are tried first: a cluster never carries a decliker `id`, and raw
/// points never carry `cluster_id`, so the two are disjoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FeatureProperties {
    Cluster(ClusterProperties),
    Decliker(DeclikerProperties),
}

impl FeatureProperties {
    pub fn decliker_id(&self) -> Option<&str> {
        match self {
            FeatureProperties::Decliker(p) => Some(&p.id),
            FeatureProperties::Cluster(_) => None,
        }
    }

    pub fn as_cluster(&self) -> Option<&ClusterProperties> {
        match self {
            FeatureProperties::Cluster(c) => Some(c),
            FeatureProperties::Decliker(_) => None,
        }
    }
}

/// Any-of match: an empty selection matches everything, otherwise at least one
/// of the record's jobs must be selected.
pub fn matches_professions(decliker: &Decliker, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || decliker.jobs.iter().any(|job| selected.contains(job))
}

/// Records visible under `selected`, in their original order.
pub fn filter_declikers<'a>(
    declikers: &'a [Decliker],
    selected: &BTreeSet<String>,
) -> Vec<&'a Decliker> {
    declikers
        .iter()
        .filter(|d| matches_professions(d, selected))
        .collect()
}

/// Project one record into a point feature carrying `{name, id}`.
pub fn project(decliker: &Decliker) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), JsonValue::from(decliker.name.clone()));
    properties.insert("id".to_string(), JsonValue::from(decliker.id.clone()));

    Feature {
        bbox: None,
        geometry: Some(decliker.geometry.clone()),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Build the feature collection for the records visible under `selected`.
pub fn feature_collection(declikers: &[Decliker], selected: &BTreeSet<String>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: filter_declikers(declikers, selected)
            .into_iter()
            .map(project)
            .collect(),
        foreign_members: None,
    }
}

/// Ids of the features in a collection, in order.
pub fn feature_ids(collection: &FeatureCollection) -> Vec<String> {
    collection
        .features
        .iter()
        .filter_map(|f| f.properties.as_ref()?.get("id")?.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decliker(id: &str, jobs: &[&str]) -> Decliker {
        Decliker {
            id: id.to_string(),
            name: format!("Decliker {id}"),
            jobs: jobs.iter().map(|j| j.to_string()).collect(),
            geometry: geojson::Geometry::new(geojson::Value::Point(vec![2.0, 46.0])),
        }
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample() -> Vec<Decliker> {
        vec![
            decliker("1", &["plumber"]),
            decliker("2", &["electrician"]),
            decliker("3", &["plumber", "carpenter"]),
            decliker("4", &[]),
        ]
    }

    #[test]
    fn test_filter_by_single_profession() {
        let records = vec![decliker("1", &["plumber"]), decliker("2", &["electrician"])];
        let fc = feature_collection(&records, &set(&["plumber"]));
        assert_eq!(feature_ids(&fc), vec!["1"]);
    }

    #[test]
    fn test_empty_filter_shows_everything() {
        let records = vec![decliker("1", &["plumber"]), decliker("2", &["electrician"])];
        let fc = feature_collection(&records, &BTreeSet::new());
        assert_eq!(feature_ids(&fc), vec!["1", "2"]);
    }

    #[test]
    fn test_filter_is_any_of() {
        let fc = feature_collection(&sample(), &set(&["electrician", "carpenter"]));
        assert_eq!(feature_ids(&fc), vec!["2", "3"]);
    }

    #[test]
    fn test_record_without_jobs_only_visible_unfiltered() {
        assert!(matches_professions(&decliker("4", &[]), &BTreeSet::new()));
        assert!(!matches_professions(&decliker("4", &[]), &set(&["plumber"])));
    }

    #[test]
    fn test_unknown_profession_yields_empty_collection() {
        let fc = feature_collection(&sample(), &set(&["astronaut"]));
        assert!(fc.features.is_empty());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = sample();
        let selected = set(&["plumber"]);
        let first = feature_collection(&records, &selected);
        let second = feature_collection(&records, &selected);
        assert_eq!(first, second);
    }

    #[test]
    fn test_clearing_filter_restores_initial_payload() {
        let records = sample();
        let initial = serde_json::to_string(&feature_collection(&records, &BTreeSet::new())).unwrap();
        let _narrowed = feature_collection(&records, &set(&["electrician"]));
        let cleared = serde_json::to_string(&feature_collection(&records, &BTreeSet::new())).unwrap();
        assert_eq!(initial, cleared);
    }

    #[test]
    fn test_filtered_collection_is_subset_with_unique_ids() {
        let records = sample();
        let fc = feature_collection(&records, &set(&["plumber", "electrician"]));
        let ids = feature_ids(&fc);
        for id in &ids {
            assert_eq!(records.iter().filter(|r| &r.id == id).count(), 1);
        }
        assert!(ids.len() <= records.len());
    }

    #[test]
    fn test_projected_feature_shape() {
        let value = serde_json::to_value(project(&decliker("7", &["plumber"]))).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["properties"]["id"], "7");
        assert_eq!(value["properties"]["name"], "Decliker 7");
        assert_eq!(value["geometry"]["type"], "Point");
        assert!(value["properties"].get("jobs").is_none());
    }

    #[test]
    fn test_feature_properties_cluster() {
        let json = r#"{"cluster":true,"cluster_id":12,"point_count":3,"point_count_abbreviated":"3","count":3}"#;
        let props: FeatureProperties = serde_json::from_str(json).unwrap();
        let cluster = props.as_cluster().unwrap();
        assert_eq!(cluster.cluster_id, 12);
        assert_eq!(cluster.point_count, 3);
        assert_eq!(props.decliker_id(), None);
    }

    #[test]
    fn test_feature_properties_point() {
        let json = r#"{"id":"9","name":"Chez Paul"}"#;
        let props: FeatureProperties = serde_json::from_str(json).unwrap();
        assert_eq!(props.decliker_id(), Some("9"));
        assert!(props.as_cluster().is_none());
    }
}
