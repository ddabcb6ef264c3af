//! Incremental Server-Sent Events decoder
//!
//! The Gemini streaming endpoint (`alt=sse`) delivers one JSON chunk per SSE
//! event. Network chunks can split events anywhere, so the decoder buffers
//! partial lines across calls and emits only completed events.

/// One completed SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Value of the `event:` field, if any
    pub event: Option<String>,
    /// Joined `data:` lines
    pub data: String,
}

/// Stateful SSE decoder fed with raw transport chunks
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Unterminated tail of the last chunk
    partial_line: String,
    event_name: Option<String>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a transport chunk, returning every event completed by it
    pub fn feed(&mut self, chunk: &str) -> Vec<SseEvent> {
        let mut events = Vec::new();

        self.partial_line.push_str(chunk);

        while let Some(newline) = self.partial_line.find('\n') {
            let line: String = self.partial_line.drain(..=newline).collect();
            if let Some(event) = self.accept_line(line.trim_end_matches(['\n', '\r'])) {
                events.push(event);
            }
        }

        events
    }

    /// Emit whatever is buffered when the transport closes mid-event
    pub fn finish(&mut self) -> Option<SseEvent> {
        if !self.partial_line.is_empty() {
            let line = std::mem::take(&mut self.partial_line);
            if let Some(event) = self.accept_line(line.trim_end_matches('\r')) {
                return Some(event);
            }
        }
        self.take_event()
    }

    fn accept_line(&mut self, line: &str) -> Option<SseEvent> {
        // Blank line terminates the current event
        if line.is_empty() {
            return self.take_event();
        }

        // Comment / keepalive
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => self.data_lines.push(value.to_string()),
            "event" => self.event_name = Some(value.to_string()),
            // id and retry are never sent by the Gemini endpoint
            _ => {}
        }

        None
    }

    fn take_event(&mut self) -> Option<SseEvent> {
        if self.data_lines.is_empty() {
            self.event_name = None;
            return None;
        }

        Some(SseEvent {
            event: self.event_name.take(),
            data: std::mem::take(&mut self.data_lines).join("\n"),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data: {\"a\":1}\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"a\":1}");
        assert_eq!(events[0].event, None);
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("data: {\"text\":").is_empty());
        assert!(decoder.feed("\"hi\"}\n").is_empty());

        let events = decoder.feed("\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "{\"text\":\"hi\"}");
    }

    #[test]
    fn test_multiple_events_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data: one\n\ndata: two\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "one");
        assert_eq!(events[1].data, "two");
    }

    #[test]
    fn test_multi_line_data_is_joined() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data: line1\ndata: line2\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "line1\nline2");
    }

    #[test]
    fn test_event_name_is_captured() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("event: update\ndata: x\n\n");
        assert_eq!(events[0].event.as_deref(), Some("update"));
    }

    #[test]
    fn test_comments_are_ignored() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(": keepalive\ndata: x\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn test_finish_flushes_unterminated_event() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("data: tail").is_empty());

        let event = decoder.finish().unwrap();
        assert_eq!(event.data, "tail");
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn test_blank_lines_without_data_emit_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("\n\n\n").is_empty());
    }
}
