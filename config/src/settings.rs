//! Application settings management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_delivery_base_url() -> String {
    "http://localhost:3000/media".to_string()
}

/// Application settings stored in settings.toml, overridable from the
/// environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the ingestion API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL derived-asset URLs are constructed against
    #[serde(default = "default_delivery_base_url")]
    pub delivery_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base_url: default_api_base_url(),
            delivery_base_url: default_delivery_base_url(),
        }
    }
}

impl Settings {
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mediakit").join("settings.toml"))
    }

    /// Load settings from the settings file, or return defaults if not
    /// found. `MEDIAKIT_API_URL` and `MEDIAKIT_DELIVERY_URL` override either.
    pub fn load() -> Self {
        let mut settings = Self::settings_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|content| toml::from_str::<Settings>(&content).ok())
            .unwrap_or_default();

        if let Ok(url) = std::env::var("MEDIAKIT_API_URL") {
            settings.api_base_url = url;
        }
        if let Ok(url) = std::env::var("MEDIAKIT_DELIVERY_URL") {
            settings.delivery_base_url = url;
        }
        settings
    }

    /// Save settings to the settings file
    pub fn save(&self) -> Result<(), String> {
        let path = Self::settings_path().ok_or("Could not determine settings path")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(&path, content).map_err(|e| format!("Failed to write settings: {}", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let settings: Settings =
            toml::from_str(r#"api_base_url = "https://media.example.com/api""#).unwrap();
        assert_eq!(settings.api_base_url, "https://media.example.com/api");
        assert_eq!(settings.delivery_base_url, default_delivery_base_url());
    }
}
