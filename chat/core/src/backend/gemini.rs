//! Gemini Backend Implementation
//!
//! Streams replies from Google's generative-language REST API.
//!
//! # Gemini API
//!
//! `POST {api_base}/models/{model}:streamGenerateContent?alt=sse` with the
//! key in the `x-goog-api-key` header. The body carries the system
//! instruction, the conversation as `contents`, and the generation config.
//! The reply arrives as Server-Sent Events, one `GenerateContentResponse`
//! JSON object per `data:` line; the body ending is the end of the reply.

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use async_trait::async_trait;

use super::traits::{
    BackendError, ChatRequest, LlmBackend, StreamingToken, STREAM_CHANNEL_CAPACITY,
};
use crate::config::{ChatConfig, DEFAULT_API_BASE};
use crate::transcript::TurnRole;

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct StreamChunk {
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ApiError>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
    thought: bool,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ApiError {
    code: Option<i64>,
    message: String,
}

fn role_name(role: TurnRole) -> &'static str {
    match role {
        TurnRole::User => "user",
        TurnRole::Model => "model",
    }
}

fn build_request_body(request: &ChatRequest) -> GenerateRequest<'_> {
    let mut contents: Vec<Content<'_>> = request
        .history
        .iter()
        .map(|turn| Content {
            role: Some(role_name(turn.role)),
            parts: vec![Part {
                text: &turn.content,
            }],
        })
        .collect();

    contents.push(Content {
        role: Some(role_name(TurnRole::User)),
        parts: vec![Part {
            text: &request.message,
        }],
    });

    GenerateRequest {
        system_instruction: request.system.as_deref().map(|system| Content {
            role: None,
            parts: vec![Part { text: system }],
        }),
        contents,
        generation_config: GenerationConfig {
            temperature: request.temperature,
        },
    }
}

// =============================================================================
// SSE Decoding
// =============================================================================

/// What a single SSE `data:` payload carried
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SsePayload {
    /// Concatenated candidate text (possibly empty)
    Text(String),
    /// The payload reported a failure
    Error(String),
}

/// Interpret one `GenerateContentResponse` payload
pub fn parse_sse_payload(data: &str) -> SsePayload {
    let chunk: StreamChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => return SsePayload::Error(format!("malformed stream payload: {e}")),
    };

    if let Some(error) = chunk.error {
        return match error.code {
            Some(code) => SsePayload::Error(format!("{code}: {}", error.message)),
            None => SsePayload::Error(error.message),
        };
    }

    if let Some(reason) = chunk.prompt_feedback.and_then(|f| f.block_reason) {
        return SsePayload::Error(format!("prompt blocked: {reason}"));
    }

    let text = chunk
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    SsePayload::Text(text)
}

/// Splits a byte stream into SSE event data
///
/// Bytes are buffered until a full line is available, so multi-byte UTF-8
/// sequences split across network chunks decode correctly.
#[derive(Default)]
struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    /// Feed bytes, returning the data of every event completed by them
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                if let Some(event) = self.take_event() {
                    events.push(event);
                }
            } else if let Some(data) = line.strip_prefix("data:") {
                self.data_lines.push(data.trim_start().to_string());
            }
            // Comments (":") and other fields (event:, id:, retry:) are ignored
        }
        events
    }

    /// Flush whatever is pending when the body ends
    fn finish(mut self) -> Option<String> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            if let Some(data) = line.trim_end_matches('\r').strip_prefix("data:") {
                self.data_lines.push(data.trim_start().to_string());
            }
        }
        self.take_event()
    }

    fn take_event(&mut self) -> Option<String> {
        if self.data_lines.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.data_lines).join("\n"))
    }
}

/// Forward one event to the widget. Returns `false` when the stream should stop.
async fn forward_event(tx: &mpsc::Sender<StreamingToken>, data: &str) -> bool {
    match parse_sse_payload(data) {
        SsePayload::Text(text) if text.is_empty() => true,
        SsePayload::Text(text) => tx.send(StreamingToken::Token(text)).await.is_ok(),
        SsePayload::Error(error) => {
            tracing::warn!(error = %error, "Gemini stream reported an error");
            let _ = tx.send(StreamingToken::Error(error)).await;
            false
        }
    }
}

// =============================================================================
// Backend
// =============================================================================

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiBackend {
    /// API key sent with every request
    api_key: String,
    /// REST endpoint base URL (no trailing slash)
    api_base: String,
    /// HTTP client, reused for the whole session
    http_client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        let api_base: String = api_base.into();
        Self {
            api_key: api_key.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Create from `ChatConfig`
    pub fn from_config(config: &ChatConfig) -> Result<Self, BackendError> {
        match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(Self::new(key, config.api_base.clone())),
            _ => Err(BackendError::MissingApiKey),
        }
    }

    /// Get the streaming endpoint URL for a model
    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:streamGenerateContent?alt=sse",
            self.api_base
        )
    }
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_API_BASE)
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn open_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<mpsc::Receiver<StreamingToken>, BackendError> {
        let body = build_request_body(request);
        let payload = serde_json::to_vec(&body)?;

        tracing::info!(
            model = %request.model,
            turns = body.contents.len(),
            "Opening Gemini stream"
        );

        let response = self
            .http_client
            .post(self.stream_url(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        // Check for HTTP errors
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Open { status, body });
        }

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let mut stream = response.bytes_stream();

        // Spawn task to process stream
        tokio::spawn(async move {
            let mut decoder = SseDecoder::default();

            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(bytes) => {
                        for event in decoder.push(&bytes) {
                            if !forward_event(&tx, &event).await {
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(StreamingToken::Error(e.to_string())).await;
                        return;
                    }
                }
            }

            if let Some(event) = decoder.finish() {
                if !forward_event(&tx, &event).await {
                    return;
                }
            }

            let _ = tx.send(StreamingToken::Complete).await;
        });

        Ok(rx)
    }
}
