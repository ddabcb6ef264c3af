//! Service layer for the Gemini API
//!
//! This module provides the request/response adapter and its supporting
//! pieces:
//! - the API client ([`gemini::GeminiClient`])
//! - the injectable host key-picker surface ([`host`])
//! - structured slide-outline output ([`slides`])
//! - SSE stream decoding ([`streaming`])

pub mod gemini;
pub mod host;
pub mod slides;
pub mod streaming;

use std::pin::Pin;

use futures::Stream;

use crate::error::Result;

pub use gemini::{Candidate, CandidateContent, GeminiClient, GenerateContentResponse};
pub use host::{HostCapabilities, NoopHost};
pub use slides::{PresentationStructure, Sentiment, Slide};

/// Lazy, forward-only stream of incremental text fragments
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Augmentations applied to a chat request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundingOptions {
    /// Enable the web-search grounding tool
    pub web_search: bool,
}

impl GroundingOptions {
    /// Options with web search enabled
    #[must_use]
    pub const fn with_web_search() -> Self {
        Self { web_search: true }
    }
}
