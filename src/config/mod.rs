//! Configuration for the Gemini adapter
//!
//! Resolution order for the credential:
//! 1. `GEMINI_API_KEY` environment variable (a `.env` file is consulted)
//! 2. Settings file (`<config dir>/pitchpad/config.json`)
//!
//! Configuration is read once and treated as read-only at call time; it is the
//! only state shared between concurrent adapter calls.

pub mod models;
pub mod settings;

use std::path::PathBuf;

pub use self::{
    models::{ImageSize, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, IMAGE_MODEL, RESEARCH_MODEL},
    settings::Settings,
};
use crate::error::Result;

/// Resolved adapter configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key, if one could be resolved
    pub api_key: Option<String>,

    /// API endpoint (defaults to the public Gemini REST endpoint)
    pub base_url: String,

    /// Model used for chat and slide generation
    pub chat_model: String,
}

impl Config {
    /// Load configuration from the environment and the settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be parsed
    pub fn load() -> Result<Self> {
        // Best-effort; a missing .env file is not an error
        let _ = dotenv::dotenv();

        let settings = Settings::load()?;
        Ok(Self::from_settings(settings))
    }

    /// Build configuration from explicit settings plus the environment
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or(settings.api_key);

        Self {
            api_key,
            base_url: settings
                .base_url
                .unwrap_or_else(|| models::DEFAULT_BASE_URL.to_string()),
            chat_model: settings
                .chat_model
                .unwrap_or_else(|| models::DEFAULT_CHAT_MODEL.to_string()),
        }
    }

    /// Get the settings file path
    #[must_use]
    pub fn settings_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pitchpad")
            .join("config.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: models::DEFAULT_BASE_URL.to_string(),
            chat_model: models::DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}
