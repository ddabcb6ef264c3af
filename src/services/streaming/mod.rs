//! Streaming support for Gemini responses
//!
//! Splits the concern in two: a transport-level SSE decoder and a handler
//! that turns decoded events into text deltas.

pub mod gemini_stream;
pub mod sse_parser;

pub use gemini_stream::GeminiStreamHandler;
pub use sse_parser::{SseDecoder, SseEvent};
