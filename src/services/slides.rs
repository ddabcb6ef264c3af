//! Structured slide-outline output
//!
//! The slide generator constrains the service with a response schema and
//! parses the returned JSON text into [`PresentationStructure`]. A parse
//! failure is a distinct, descriptive error; a response with no text at all
//! is a valid "no result" outcome handled by the caller.

use serde::{Deserialize, Serialize};

use crate::error::{PitchpadError, Result};

/// Overall sentiment classification of the presentation topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Urgent,
}

/// One slide of the generated outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: String,
    pub content: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_notes: Option<String>,
}

/// Parsed slide outline as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationStructure {
    pub slides: Vec<Slide>,
    pub sentiment: Sentiment,
    pub theme_color: String,
}

/// Response schema the service is constrained to
///
/// Note the schema does not bound the slide count; the requested count is
/// carried in the prompt and passed through unvalidated.
#[must_use]
pub fn response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "slides": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "content": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        },
                        "speakerNotes": { "type": "STRING" }
                    },
                    "required": ["title", "content"]
                }
            },
            "sentiment": {
                "type": "STRING",
                "enum": ["positive", "neutral", "negative", "urgent"]
            },
            "themeColor": { "type": "STRING" }
        },
        "required": ["slides", "sentiment", "themeColor"]
    })
}

/// Parse the schema-constrained JSON text returned by the service
///
/// # Errors
///
/// Returns [`PitchpadError::MalformedStructuredResponse`] when the text is
/// not valid JSON for the declared shape; the raw parse failure is logged
/// before being re-signaled.
pub fn parse_presentation(text: &str) -> Result<PresentationStructure> {
    serde_json::from_str(text).map_err(|e| {
        tracing::warn!(error = %e, "slide outline response was not valid JSON");
        PitchpadError::MalformedStructuredResponse(format!(
            "slide outline is not valid JSON: {e}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_valid_outline() {
        let text = r##"{
            "slides": [
                {"title": "Intro", "content": ["point one"], "speakerNotes": "greet"},
                {"title": "Close", "content": ["thanks", "questions"]}
            ],
            "sentiment": "positive",
            "themeColor": "#1a73e8"
        }"##;

        let parsed = parse_presentation(text).unwrap();
        assert_eq!(parsed.slides.len(), 2);
        assert_eq!(parsed.slides[0].speaker_notes.as_deref(), Some("greet"));
        assert_eq!(parsed.slides[1].speaker_notes, None);
        assert_eq!(parsed.sentiment, Sentiment::Positive);
        assert_eq!(parsed.theme_color, "#1a73e8");
    }

    #[test]
    fn test_malformed_text_is_a_descriptive_error() {
        let err = parse_presentation("I'd be happy to make slides!").unwrap_err();
        assert!(matches!(
            err,
            PitchpadError::MalformedStructuredResponse(_)
        ));
    }

    #[test]
    fn test_schema_mismatch_is_a_descriptive_error() {
        // Valid JSON, wrong shape
        let err = parse_presentation(r#"{"slides": "none"}"#).unwrap_err();
        assert!(matches!(
            err,
            PitchpadError::MalformedStructuredResponse(_)
        ));
    }

    #[test]
    fn test_schema_names_required_fields() {
        let schema = response_schema();
        assert_eq!(
            schema["required"],
            serde_json::json!(["slides", "sentiment", "themeColor"])
        );
        assert_eq!(
            schema["properties"]["slides"]["items"]["required"],
            serde_json::json!(["title", "content"])
        );
        assert_eq!(
            schema["properties"]["sentiment"]["enum"],
            serde_json::json!(["positive", "neutral", "negative", "urgent"])
        );
    }
}
