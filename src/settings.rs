//! Host settings: key bindings, log level and simulation tuning
//!
//! Read from LocalStorage on web and from a JSON file natively. Settings are
//! never written back.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::Intent;
use crate::tuning::Tuning;

/// Keyboard `KeyboardEvent.key` values mapped to intents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_right: Vec<String>,
    pub move_left: Vec<String>,
    pub jump: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_right: vec!["ArrowRight".into()],
            move_left: vec!["ArrowLeft".into()],
            jump: vec![" ".into(), "ArrowUp".into()],
        }
    }
}

impl KeyBindings {
    fn bound(keys: &[String], key: &str) -> bool {
        keys.iter().any(|k| k == key)
    }

    /// Intent for a key press
    pub fn on_key_down(&self, key: &str) -> Option<Intent> {
        if Self::bound(&self.move_right, key) {
            Some(Intent::MoveRight)
        } else if Self::bound(&self.move_left, key) {
            Some(Intent::MoveLeft)
        } else if Self::bound(&self.jump, key) {
            Some(Intent::Jump)
        } else {
            None
        }
    }

    /// Intent for a key release; releasing either move key stops the player
    pub fn on_key_up(&self, key: &str) -> Option<Intent> {
        if Self::bound(&self.move_right, key) || Self::bound(&self.move_left, key) {
            Some(Intent::Stop)
        } else {
            None
        }
    }
}

/// Host settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub key_bindings: KeyBindings,
    /// `log` level name: error, warn, info, debug, trace
    pub log_level: String,
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_bindings: KeyBindings::default(),
            log_level: "info".into(),
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "stage_runner_settings";

    /// Environment variable naming a settings file (native only)
    #[allow(dead_code)]
    const ENV_PATH: &'static str = "STAGE_RUNNER_SETTINGS";

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.tuning.validate()?;
        if settings.log_level().is_none() {
            return Err(ConfigError::Invalid {
                field: "log_level",
                reason: "unknown level name",
            });
        }
        Ok(settings)
    }

    /// Parsed log level
    pub fn log_level(&self) -> Option<log::LevelFilter> {
        self.log_level.parse().ok()
    }

    /// Parse JSON, falling back to defaults on error
    fn from_json_or_default(json: &str, source: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", source);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings from {}: {}", source, e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                return Self::from_json_or_default(&json, "LocalStorage");
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `STAGE_RUNNER_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_PATH) else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json_or_default(&json, &path),
            Err(e) => {
                log::warn!("Cannot read settings file {}: {}", path, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keys = KeyBindings::default();
        assert_eq!(keys.on_key_down("ArrowRight"), Some(Intent::MoveRight));
        assert_eq!(keys.on_key_down("ArrowLeft"), Some(Intent::MoveLeft));
        assert_eq!(keys.on_key_down(" "), Some(Intent::Jump));
        assert_eq!(keys.on_key_down("ArrowUp"), Some(Intent::Jump));
        assert_eq!(keys.on_key_down("x"), None);

        assert_eq!(keys.on_key_up("ArrowRight"), Some(Intent::Stop));
        assert_eq!(keys.on_key_up("ArrowLeft"), Some(Intent::Stop));
        assert_eq!(keys.on_key_up(" "), None);
    }

    #[test]
    fn test_custom_bindings_from_json() {
        let json = r#"{ "key_bindings": { "move_right": ["d"], "jump": ["w"] }, "log_level": "debug" }"#;
        let settings = Settings::from_json(json).unwrap();
        let keys = &settings.key_bindings;
        assert_eq!(keys.on_key_down("d"), Some(Intent::MoveRight));
        assert_eq!(keys.on_key_down("w"), Some(Intent::Jump));
        // Unspecified list keeps its default
        assert_eq!(keys.on_key_down("ArrowLeft"), Some(Intent::MoveLeft));
        assert_eq!(keys.on_key_down("ArrowRight"), None);
        assert_eq!(settings.log_level(), Some(log::LevelFilter::Debug));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(Settings::from_json(r#"{ "log_level": "loud" }"#).is_err());
        assert!(Settings::from_json(r#"{ "tuning": { "canvas_width": 0.0 } }"#).is_err());
    }

    #[test]
    fn test_fallback_to_default() {
        let settings = Settings::from_json_or_default("garbage", "test");
        assert_eq!(settings.key_bindings, KeyBindings::default());
        assert_eq!(settings.log_level(), Some(log::LevelFilter::Info));
    }
}
