//! Response Stream Client
//!
//! Given a user utterance and the prior turn history, a backend produces a
//! lazy, finite sequence of text fragments over a channel, or fails.
//!
//! # Available Backends
//!
//! - **Gemini**: the hosted generative-language API, streamed over SSE
//! - **Canned**: offline demo mode, one fixed fragment and no network
//!
//! [`StreamClient`] picks one of the two at startup depending on whether a
//! credential is configured, so the widget never needs to know which.
//!
//! # Usage
//!
//! ```ignore
//! use folio_chat_core::backend::{ChatRequest, LlmBackend, StreamClient, StreamingToken};
//!
//! let client = StreamClient::from_config(&config);
//! let request = ChatRequest::new("What does Spencer work on?", &config.model);
//! let mut rx = client.open_stream(&request).await?;
//! while let Some(StreamingToken::Token(text)) = rx.recv().await {
//!     print!("{text}");
//! }
//! ```

mod canned;
mod client;
mod gemini;
mod traits;

pub use canned::CannedBackend;
pub use client::StreamClient;
pub use gemini::{parse_sse_payload, GeminiBackend, SsePayload};
pub use traits::{BackendError, ChatRequest, LlmBackend, StreamingToken};
