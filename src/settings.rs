//! Game settings
//!
//! Persisted in LocalStorage on the web; read from a JSON file named by
//! `SHARD_RUNNER_SETTINGS` on native. Gravity, speeds and jump force are not
//! settings; they live in [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::frame::AssetKind;

/// Player-facing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Text drawn in the top-right corner of the HUD
    pub hud_label: String,

    // === Assets ===
    pub player_image: String,
    pub shard_image: String,
    pub enemy_image: String,
    /// Give up on image loading after this long (None waits forever)
    pub asset_timeout_ms: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hud_label: "Shard Runner".to_string(),

            player_image: "images/player.png".to_string(),
            shard_image: "images/shard.png".to_string(),
            enemy_image: "images/enemy.png".to_string(),
            asset_timeout_ms: Some(10_000),
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "shard_runner_settings";

    /// Environment variable naming a JSON settings file (native only)
    pub const ENV_VAR: &'static str = "SHARD_RUNNER_SETTINGS";

    /// Parse settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Image path for an asset
    pub fn image_path(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Player => &self.player_image,
            AssetKind::Shard => &self.shard_image,
            AssetKind::Enemy => &self.enemy_image,
        }
    }

    /// Startup timeout in the frame clock's unit
    pub fn startup_timeout_ms(&self) -> Option<f64> {
        self.asset_timeout_ms.map(|ms| ms as f64)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `SHARD_RUNNER_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_file(std::path::Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.image_path(AssetKind::Player), "images/player.png");
        assert_eq!(s.image_path(AssetKind::Shard), "images/shard.png");
        assert_eq!(s.image_path(AssetKind::Enemy), "images/enemy.png");
        assert_eq!(s.startup_timeout_ms(), Some(10_000.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{ "hud_label": "Matthew Martins" }"#).expect("valid");
        assert_eq!(s.hud_label, "Matthew Martins");
        assert_eq!(s.enemy_image, "images/enemy.png");
    }

    #[test]
    fn test_disable_timeout() {
        let s = Settings::from_json(r#"{ "asset_timeout_ms": null }"#).expect("valid");
        assert_eq!(s.startup_timeout_ms(), None);
    }

    #[test]
    fn test_invalid_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut s = Settings::default();
        s.hud_label = "Speedrun".to_string();
        let json = s.to_json().expect("serializable");
        assert_eq!(Settings::from_json(&json).expect("valid"), s);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_missing_file() {
        let err = Settings::load_file(std::path::Path::new("/nonexistent/shard_runner.json"))
            .unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
