use serde::{Deserialize, Serialize};

/// A listed service provider: a name, the professions it offers and where it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decliker {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub jobs: Vec<String>,
    pub geometry: geojson::Geometry,
}

/// One entry of the profession multi-select.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfessionOption {
    pub label: String,
    pub value: String,
}

/// Label for a profession code, falling back to the code itself.
pub fn profession_label<'a>(options: &'a [ProfessionOption], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|o| o.value == value)
        .map(|o| o.label.as_str())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decliker_deserializes_record_shape() {
        let json = r#"{
            "id": "42",
            "name": "Atelier Dupont",
            "jobs": ["plumber", "heating"],
            "geometry": { "type": "Point", "coordinates": [2.35, 48.85] }
        }"#;
        let d: Decliker = serde_json::from_str(json).unwrap();
        assert_eq!(d.id, "42");
        assert_eq!(d.jobs, vec!["plumber", "heating"]);
        assert_eq!(d.geometry.value, geojson::Value::Point(vec![2.35, 48.85]));
    }

    #[test]
    fn test_decliker_without_jobs_defaults_to_empty() {
        let json = r#"{"id":"1","name":"A","geometry":{"type":"Point","coordinates":[0.0,0.0]}}"#;
        let d: Decliker = serde_json::from_str(json).unwrap();
        assert!(d.jobs.is_empty());
    }

    #[test]
    fn test_profession_label_lookup() {
        let options = vec![ProfessionOption {
            label: "Plombier".to_string(),
            value: "plumber".to_string(),
        }];
        assert_eq!(profession_label(&options, "plumber"), "Plombier");
        assert_eq!(profession_label(&options, "baker"), "baker");
    }
}
