//! Settings file and environment credential resolution

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{PitchpadError, Result};

/// Settings stored in `<config dir>/pitchpad/config.json`
///
/// Every field is optional; a missing file yields defaults. The settings file
/// is read by this crate, never written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// API key, if not supplied through the environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom API endpoint (tests, proxies)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Override for the default chat model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_model: Option<String>,
}

impl Settings {
    /// Load settings from the default location
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load() -> Result<Self> {
        let path = super::Config::settings_path();
        Self::load_from_path(&path)
    }

    /// Load settings from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| PitchpadError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| PitchpadError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(&temp_dir.path().join("config.json")).unwrap();
        assert!(settings.api_key.is_none());
        assert!(settings.base_url.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"api_key":"k-123","chat_model":"gemini-2.5-pro"}"#).unwrap();

        let settings = Settings::load_from_path(&path).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("k-123"));
        assert_eq!(settings.chat_model.as_deref(), Some("gemini-2.5-pro"));
        assert!(settings.base_url.is_none());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let err = Settings::load_from_path(&path).unwrap_err();
        assert!(matches!(err, PitchpadError::ConfigParse { .. }));
    }
}
