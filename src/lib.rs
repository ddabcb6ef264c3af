//! Pitchpad: Gemini request/response adapter
//!
//! This library is the thin layer between the Pitchpad workspace UI and the
//! Gemini API: it shapes requests (chat turns with attachments, image
//! generation and editing, schema-constrained slide outlines, grounded stock
//! research) and unpacks responses (streamed text, inline image payloads,
//! structured JSON). Retries, rate limiting, caching, and auth flows beyond
//! the interactive key gate live elsewhere.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::too_many_lines)]

pub mod config;
pub mod error;
pub mod messages;
pub mod services;

// Re-exports for convenience
pub use error::{PitchpadError, Result};
pub use services::gemini::GeminiClient;
