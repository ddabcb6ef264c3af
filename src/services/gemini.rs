//! Gemini API client
//!
//! One thin adapter over the Gemini REST API: shapes requests for chat,
//! image generation/editing, schema-constrained slide outlines, and grounded
//! stock research, and unpacks the responses. No retries, no backoff, no
//! caching; transport failures propagate to the caller unmodified.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::{
    config::{models, Config, ImageSize},
    error::{PitchpadError, Result},
    messages::{build_user_parts, parse_data_uri, to_data_uri, Attachment, Part, Role, Turn},
};

use super::{
    host::{HostCapabilities, NoopHost},
    slides::{self, PresentationStructure},
    streaming::GeminiStreamHandler,
    GroundingOptions, TextStream,
};

const PROVIDER: &str = "gemini";

/// Persona for the grounded stock research operation
const ANALYST_INSTRUCTION: &str = "You are a senior equity research analyst. \
    Ground every figure in current web search results, be concise, and \
    separate facts from your own assessment.";

/// Gemini API client
///
/// Cheap to construct; callers may build one per call. The only shared state
/// is the resolved configuration, read-only after construction.
pub struct GeminiClient {
    client: Client,
    config: Config,
    host: Arc<dyn HostCapabilities>,
}

impl GeminiClient {
    /// Create a new client from resolved configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is available or the key cannot be used
    /// as an HTTP header value
    pub fn new(config: Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| PitchpadError::MissingApiKey {
                provider: PROVIDER.to_string(),
            })?;

        let client = Client::builder()
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    "x-goog-api-key",
                    header::HeaderValue::from_str(&api_key).map_err(|_| {
                        PitchpadError::InvalidConfig("Invalid API key format".to_string())
                    })?,
                );
                headers
            })
            .build()?;

        Ok(Self {
            client,
            config,
            host: Arc::new(NoopHost),
        })
    }

    /// Inject the host's key-picker surface
    #[must_use]
    pub fn with_host(mut self, host: Arc<dyn HostCapabilities>) -> Self {
        self.host = host;
        self
    }

    /// Model used for chat and slide generation
    #[must_use]
    pub fn chat_model(&self) -> &str {
        &self.config.chat_model
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.base_url, model, method
        )
    }

    /// Complete the interactive key gate before a paid call
    ///
    /// Prompts at most once. Fails before any network I/O when the user does
    /// not complete selection; hosts without a picker always pass.
    async fn ensure_api_key(&self) -> Result<()> {
        if self.host.has_selected_api_key().await {
            return Ok(());
        }

        self.host.open_select_key().await;

        if self.host.has_selected_api_key().await {
            Ok(())
        } else {
            Err(PitchpadError::ApiKeyNotSelected)
        }
    }

    async fn post_generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint(model, "generateContent"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(PitchpadError::Api {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {status}: {error_text}"),
            });
        }

        Ok(response.json().await?)
    }

    /// Stream one chat turn
    ///
    /// History is passed through with only role and parts, in original order.
    /// The current turn carries one part per attachment (in attachment order)
    /// followed by the message text when non-blank. Returns a forward-only,
    /// non-restartable stream of text fragments in emission order.
    ///
    /// # Errors
    ///
    /// Transport and service errors propagate; there is no local retry.
    pub async fn stream_chat(
        &self,
        model: &str,
        history: Vec<Turn>,
        message: &str,
        attachments: &[Attachment],
        grounding: GroundingOptions,
    ) -> Result<TextStream> {
        let mut contents = history;
        contents.push(Turn {
            role: Role::User,
            parts: build_user_parts(message, attachments),
        });

        let request = GenerateContentRequest {
            contents,
            tools: grounding.web_search.then(|| vec![Tool::web_search()]),
            system_instruction: None,
            generation_config: None,
        };

        tracing::debug!(model, grounded = grounding.web_search, "starting chat stream");

        let response = self
            .client
            .post(format!(
                "{}?alt=sse",
                self.endpoint(model, "streamGenerateContent")
            ))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(PitchpadError::Api {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {status}: {error_text}"),
            });
        }

        Ok(Box::pin(Self::process_stream(response.bytes_stream())))
    }

    /// Turn the SSE byte stream into text fragments
    ///
    /// Transport chunks can split a multi-byte character; incomplete trailing
    /// bytes are carried into the next chunk. The stream ends at the first
    /// error item.
    fn process_stream(
        byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
    ) -> impl Stream<Item = Result<String>> + Send + 'static {
        async_stream::stream! {
            let mut handler = GeminiStreamHandler::new();
            let mut pending: Vec<u8> = Vec::new();
            let mut byte_stream = Box::pin(byte_stream);

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(PitchpadError::Http(e));
                        return;
                    }
                };

                pending.extend_from_slice(&bytes);

                let valid_len = match std::str::from_utf8(&pending) {
                    Ok(_) => pending.len(),
                    // Incomplete trailing sequence; the rest arrives with
                    // the next chunk
                    Err(e) if e.error_len().is_none() => e.valid_up_to(),
                    Err(e) => {
                        yield Err(PitchpadError::Stream(format!(
                            "Invalid UTF-8 in stream: {e}"
                        )));
                        return;
                    }
                };

                let text = String::from_utf8_lossy(&pending[..valid_len]).into_owned();
                pending.drain(..valid_len);

                match handler.process_chunk(&text) {
                    Ok(deltas) => {
                        for delta in deltas {
                            yield Ok(delta);
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }

            if !pending.is_empty() {
                yield Err(PitchpadError::Stream(
                    "Invalid UTF-8 in stream: truncated multi-byte sequence".to_string(),
                ));
                return;
            }

            match handler.finish() {
                Ok(deltas) => {
                    for delta in deltas {
                        yield Ok(delta);
                    }
                }
                Err(e) => yield Err(e),
            }
        }
    }

    /// Generate images for a prompt at a fixed 1:1 aspect ratio
    ///
    /// Gated behind the host's key picker when one is present. Returns every
    /// inline-image fragment of the first candidate as a data URI, in order;
    /// empty when the response carries none.
    ///
    /// # Errors
    ///
    /// Fails with [`PitchpadError::ApiKeyNotSelected`] before any network
    /// call when key selection is not completed
    pub async fn generate_image(&self, prompt: &str, size: ImageSize) -> Result<Vec<String>> {
        self.ensure_api_key().await?;

        let request = GenerateContentRequest {
            contents: vec![Turn::user(prompt)],
            tools: None,
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: models::IMAGE_ASPECT_RATIO.to_string(),
                    image_size: size.as_str().to_string(),
                }),
                ..GenerationConfig::default()
            }),
        };

        let response = self.post_generate(models::IMAGE_MODEL, &request).await?;
        Ok(response.inline_images())
    }

    /// Edit an image given as a data URI
    ///
    /// Sends the image first and the instruction second; same extraction and
    /// key-gate contract as [`Self::generate_image`].
    ///
    /// # Errors
    ///
    /// Fails with [`PitchpadError::ApiKeyNotSelected`] before any network
    /// call when key selection is not completed, and with
    /// [`PitchpadError::InvalidInput`] if the URI is not a base64 data URI
    pub async fn edit_image(&self, image_data_uri: &str, prompt: &str) -> Result<Vec<String>> {
        self.ensure_api_key().await?;

        let (mime_type, data) = parse_data_uri(image_data_uri)?;

        let request = GenerateContentRequest {
            contents: vec![Turn {
                role: Role::User,
                parts: vec![Part::inline_data(mime_type, data), Part::text(prompt)],
            }],
            tools: None,
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                ..GenerationConfig::default()
            }),
        };

        let response = self.post_generate(models::IMAGE_MODEL, &request).await?;
        Ok(response.inline_images())
    }

    /// Generate a schema-constrained slide outline
    ///
    /// Returns `Ok(None)` when the response carries no text at all; a
    /// response that has text but is not valid JSON for the declared shape
    /// fails with a descriptive error. The requested count is carried in the
    /// prompt only; the schema does not bound the slide array.
    pub async fn generate_slide_content(
        &self,
        topic: &str,
        count: usize,
    ) -> Result<Option<PresentationStructure>> {
        let prompt = format!(
            "Create a presentation outline about \"{topic}\" with exactly {count} slides. \
             Classify the overall sentiment of the topic and choose a fitting theme color \
             as a hex string."
        );

        let request = GenerateContentRequest {
            contents: vec![Turn::user(prompt)],
            tools: None,
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(slides::response_schema()),
                ..GenerationConfig::default()
            }),
        };

        let response = self
            .post_generate(&self.config.chat_model, &request)
            .await?;

        match response.text() {
            Some(text) => slides::parse_presentation(&text).map(Some),
            None => Ok(None),
        }
    }

    /// Run a grounded stock analysis for a ticker
    ///
    /// Web search is always enabled. The decoded response envelope is
    /// returned unparsed; interpretation of the text and grounding metadata
    /// is left to the caller.
    pub async fn analyze_stock(&self, ticker: &str) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            contents: vec![Turn::user(format!(
                "Provide an up-to-date analysis of {ticker} stock: current price and recent \
                 movement, key news, analyst outlook, and principal risks."
            ))],
            tools: Some(vec![Tool::web_search()]),
            system_instruction: Some(SystemInstruction {
                parts: vec![Part::text(ANALYST_INSTRUCTION)],
            }),
            generation_config: None,
        };

        self.post_generate(models::RESEARCH_MODEL, &request).await
    }
}

// Gemini wire types

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Turn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: serde_json::Value,
}

impl Tool {
    fn web_search() -> Self {
        Self {
            google_search: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
    image_size: String,
}

/// Decoded `generateContent` response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One completion candidate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Web-search grounding metadata, passed through uninterpreted
    #[serde(default)]
    pub grounding_metadata: Option<serde_json::Value>,
}

/// Content of a candidate
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
    pub role: Option<String>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map_or(&[], |content| content.parts.as_slice())
    }

    /// Text parts of the first candidate, in order
    #[must_use]
    pub fn text_fragments(&self) -> Vec<String> {
        self.first_parts()
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Concatenated text of the first candidate, or `None` when the response
    /// carries no text at all
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let text = self.text_fragments().concat();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Inline-image parts of the first candidate as data URIs, in order
    #[must_use]
    pub fn inline_images(&self) -> Vec<String> {
        self.first_parts()
            .iter()
            .filter_map(|part| match part {
                Part::InlineData { inline_data } => {
                    Some(to_data_uri(&inline_data.mime_type, &inline_data.data))
                }
                _ => None,
            })
            .collect()
    }
}
