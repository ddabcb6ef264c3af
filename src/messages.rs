//! Conversation and attachment types for Gemini requests
//!
//! Defines the wire-shaped content types (`Turn`, `Part`) and the
//! application-side `Attachment` model, plus the assembly rules that turn a
//! user message and its attachments into an ordered part sequence.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{PitchpadError, Result};

/// Role of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// Base64 payload tagged with a MIME type, sent inline with text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

/// One content fragment of a turn
///
/// Serialized in the Gemini wire shape: `{"text": ...}` or
/// `{"inlineData": {"mimeType": ..., "data": ...}}`. Variant order matters for
/// `#[serde(untagged)]` decoding; `Other` absorbs part shapes this adapter
/// does not consume (thoughts, function calls).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    Other(serde_json::Value),
}

impl Part {
    /// Create a text part
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an inline-binary part
    #[must_use]
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

/// A single turn in the conversation history
///
/// Carries exactly the fields the service consumes: role and ordered parts.
/// History supplied by the caller is passed through unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    /// Create a user turn with a single text part
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    /// Create a model turn with a single text part
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text content of this turn
    #[must_use]
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// How an attachment is carried in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Sent as an inline binary part
    Pdf,
    /// Sent as an inline binary part
    Image,
    /// Decoded and dropped into the prompt as labeled context
    Text,
}

/// A caller-owned file attached to one chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
    /// Base64-encoded file content
    pub data: String,
}

impl Attachment {
    /// Classify by MIME type into one of the three handling paths
    #[must_use]
    pub fn kind(&self) -> AttachmentKind {
        if self.mime_type == "application/pdf" {
            AttachmentKind::Pdf
        } else if self.mime_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::Text
        }
    }

    /// Decode the payload as text for the labeled-context path
    ///
    /// Invalid base64 or non-UTF-8 content degrades to a lossy rendering
    /// rather than failing the whole request.
    #[must_use]
    pub fn decoded_text(&self) -> String {
        match BASE64.decode(&self.data) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => self.data.clone(),
        }
    }
}

/// Build the part sequence for the current user turn
///
/// One part per attachment, in attachment order: PDFs and images inline as
/// binary, everything else as labeled text context. The user's message comes
/// last, omitted when blank.
#[must_use]
pub fn build_user_parts(message: &str, attachments: &[Attachment]) -> Vec<Part> {
    let mut parts = Vec::with_capacity(attachments.len() + 1);

    for attachment in attachments {
        match attachment.kind() {
            AttachmentKind::Pdf | AttachmentKind::Image => {
                parts.push(Part::inline_data(&attachment.mime_type, &attachment.data));
            }
            AttachmentKind::Text => {
                parts.push(Part::text(format!(
                    "Content from attached file \"{}\":\n{}",
                    attachment.name,
                    attachment.decoded_text()
                )));
            }
        }
    }

    if !message.trim().is_empty() {
        parts.push(Part::text(message));
    }

    parts
}

/// Compose a `data:` URI from a MIME type and base64 payload
#[must_use]
pub fn to_data_uri(mime_type: &str, data: &str) -> String {
    format!("data:{mime_type};base64,{data}")
}

/// Split a `data:` URI into its MIME type and base64 payload
///
/// # Errors
///
/// Returns [`PitchpadError::InvalidInput`] if the URI is not a base64 data URI
pub fn parse_data_uri(uri: &str) -> Result<(String, String)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| PitchpadError::InvalidInput(format!("Not a data URI: {uri}")))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| PitchpadError::InvalidInput("Data URI has no payload".to_string()))?;

    let mime_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| PitchpadError::InvalidInput("Data URI is not base64-encoded".to_string()))?;

    Ok((mime_type.to_string(), payload.to_string()))
}
