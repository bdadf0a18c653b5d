//! Player preferences
//!
//! Persisted separately from the leaderboard as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::PersistenceError;

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name used for the last saved score, offered as the default next time
    pub player_name: Option<String>,
    /// Background music toggle (played by the host)
    pub music_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: None,
            music_enabled: false,
        }
    }
}

impl Settings {
    /// Remember the name a score was saved under
    pub fn remember_name(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.player_name = Some(name.to_string());
        }
    }

    /// Load settings from a JSON file, defaults if missing or corrupt
    pub fn load(path: &Path) -> Self {
        if let Ok(json) = std::fs::read_to_string(path) {
            if let Ok(settings) = serde_json::from_str(&json) {
                log::info!("Loaded settings from {}", path.display());
                return settings;
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_name_ignores_blank() {
        let mut settings = Settings::default();
        settings.remember_name("  ");
        assert_eq!(settings.player_name, None);
        settings.remember_name(" kit ");
        assert_eq!(settings.player_name.as_deref(), Some("kit"));
    }

    #[test]
    fn test_missing_fields_default() {
        let settings: Settings = serde_json::from_str(r#"{ "music_enabled": true }"#).unwrap();
        assert!(settings.music_enabled);
        assert_eq!(settings.player_name, None);
    }
}
