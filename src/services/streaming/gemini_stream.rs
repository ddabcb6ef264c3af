//! Gemini streaming response handler
//!
//! Turns raw SSE transport chunks into ordered text deltas. Each SSE event
//! carries one `GenerateContentResponse` JSON chunk; the deltas are the text
//! parts of its first candidate, in emission order.

use crate::{
    error::{PitchpadError, Result},
    services::gemini::GenerateContentResponse,
};

use super::sse_parser::SseDecoder;

/// Decodes the Gemini `streamGenerateContent` SSE stream
#[derive(Debug, Default)]
pub struct GeminiStreamHandler {
    decoder: SseDecoder,
}

impl GeminiStreamHandler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one transport chunk, returning the text deltas it completed
    ///
    /// # Errors
    ///
    /// Returns [`PitchpadError::Stream`] if an event payload is not a valid
    /// response chunk
    pub fn process_chunk(&mut self, chunk: &str) -> Result<Vec<String>> {
        let mut deltas = Vec::new();
        for event in self.decoder.feed(chunk) {
            deltas.extend(Self::decode_event(&event.data)?);
        }
        Ok(deltas)
    }

    /// Flush any event left unterminated when the transport closed
    ///
    /// # Errors
    ///
    /// Returns [`PitchpadError::Stream`] if the trailing payload is malformed
    pub fn finish(&mut self) -> Result<Vec<String>> {
        match self.decoder.finish() {
            Some(event) => Self::decode_event(&event.data),
            None => Ok(Vec::new()),
        }
    }

    fn decode_event(data: &str) -> Result<Vec<String>> {
        let chunk: GenerateContentResponse = serde_json::from_str(data)
            .map_err(|e| PitchpadError::Stream(format!("Malformed stream chunk: {e}")))?;
        Ok(chunk.text_fragments())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_text_deltas_in_emission_order() {
        let mut handler = GeminiStreamHandler::new();

        let sse = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hel\"}]}}]}\r\n\r\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"lo\"},{\"text\":\"!\"}]}}]}\r\n\r\n",
        );

        let deltas = handler.process_chunk(sse).unwrap();
        assert_eq!(deltas, vec!["Hel", "lo", "!"]);
        assert!(handler.finish().unwrap().is_empty());
    }

    #[test]
    fn test_chunk_split_mid_event() {
        let mut handler = GeminiStreamHandler::new();

        let deltas = handler
            .process_chunk("data: {\"candidates\":[{\"content\":{\"parts\":[{\"te")
            .unwrap();
        assert!(deltas.is_empty());

        let deltas = handler
            .process_chunk("xt\":\"joined\"}]}}]}\n\n")
            .unwrap();
        assert_eq!(deltas, vec!["joined"]);
    }

    #[test]
    fn test_chunk_without_candidates_yields_nothing() {
        let mut handler = GeminiStreamHandler::new();
        let deltas = handler.process_chunk("data: {}\n\n").unwrap();
        assert!(deltas.is_empty());
    }

    #[test]
    fn test_malformed_payload_is_a_stream_error() {
        let mut handler = GeminiStreamHandler::new();
        let err = handler.process_chunk("data: not-json\n\n").unwrap_err();
        assert!(matches!(err, PitchpadError::Stream(_)));
    }

    #[test]
    fn test_finish_decodes_unterminated_event() {
        let mut handler = GeminiStreamHandler::new();
        handler
            .process_chunk("data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"tail\"}]}}]}")
            .unwrap();
        assert_eq!(handler.finish().unwrap(), vec!["tail"]);
    }
}
