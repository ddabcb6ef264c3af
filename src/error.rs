//! Error types for Pitchpad

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`PitchpadError`]
pub type Result<T> = std::result::Result<T, PitchpadError>;

/// Main error type for Pitchpad
#[derive(Debug, Error)]
pub enum PitchpadError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No API key available for the provider
    #[error("Missing API key for {provider}: set GEMINI_API_KEY or add it to the settings file")]
    MissingApiKey { provider: String },

    /// Interactive key selection was required but not completed
    #[error("API key selection was not completed")]
    ApiKeyNotSelected,

    /// Error reported by the remote service
    #[error("{provider} API error: {message}")]
    Api { provider: String, message: String },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structured output was requested but the returned text is not valid
    /// JSON for the declared shape
    #[error("Malformed structured response: {0}")]
    MalformedStructuredResponse(String),

    /// Corruption or failure partway through a streaming response
    #[error("Stream error: {0}")]
    Stream(String),

    /// Malformed input from the caller (e.g. a bad data URI)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl From<String> for PitchpadError {
    fn from(s: String) -> Self {
        PitchpadError::Other(s)
    }
}

impl From<&str> for PitchpadError {
    fn from(s: &str) -> Self {
        PitchpadError::Other(s.to_string())
    }
}
