use decliker_shared::models::{Decliker, ProfessionOption};
use std::collections::HashSet;
use std::path::Path;

pub struct Assets {
    pub declikers: Vec<Decliker>,
    pub professions: Vec<ProfessionOption>,
}

impl Assets {
    pub fn load(assets_dir: &Path) -> Result<Self, String> {
        let declikers_path = assets_dir.join("declikers.json");
        let professions_path = assets_dir.join("professions.json");

        let declikers_data = std::fs::read_to_string(&declikers_path)
            .map_err(|e| format!("Failed to read {}: {}", declikers_path.display(), e))?;
        let professions_data = std::fs::read_to_string(&professions_path)
            .map_err(|e| format!("Failed to read {}: {}", professions_path.display(), e))?;

        let declikers: Vec<Decliker> = serde_json::from_str(&declikers_data)
            .map_err(|e| format!("Failed to parse declikers.json: {}", e))?;
        let professions: Vec<ProfessionOption> = serde_json::from_str(&professions_data)
            .map_err(|e| format!("Failed to parse professions.json: {}", e))?;

        let assets = Assets::new(declikers, professions)?;
        tracing::info!(
            declikers = assets.declikers.len(),
            professions = assets.professions.len(),
            "Loaded decliker assets"
        );
        Ok(assets)
    }

    /// Build from in-memory data, rejecting duplicate record ids.
    pub fn new(declikers: Vec<Decliker>, professions: Vec<ProfessionOption>) -> Result<Self, String> {
        let mut seen = HashSet::new();
        for d in &declikers {
            if !seen.insert(d.id.as_str()) {
                return Err(format!("Duplicate decliker id: {}", d.id));
            }
        }
        Ok(Assets { declikers, professions })
    }

    pub fn find_decliker(&self, id: &str) -> Option<&Decliker> {
        self.declikers.iter().find(|d| d.id == id)
    }
}
