//! Backend Traits
//!
//! The seam between the chat widget and whatever produces the reply. The
//! widget only ever sees a channel of [`StreamingToken`]s; a backend decides
//! how those tokens come to be.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::config::DEFAULT_TEMPERATURE;
use crate::transcript::TurnHistoryEntry;

/// Channel capacity between a stream reader task and the widget
pub const STREAM_CHANNEL_CAPACITY: usize = 100;

/// Token stream events from a backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamingToken {
    /// A non-empty text delta
    Token(String),
    /// The remote side signalled the end of the reply
    Complete,
    /// The stream failed after it was opened
    Error(String),
}

/// Errors opening a stream
#[derive(Debug, Error)]
pub enum BackendError {
    /// The remote service answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Open {
        /// HTTP status code
        status: u16,
        /// Response body (usually a JSON error object)
        body: String,
    },

    /// Transport failure before any response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request body could not be encoded
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// A remote backend was built without a credential
    #[error("no API key configured")]
    MissingApiKey,

    /// The task opening the stream ended without a result
    #[error("stream open task failed: {0}")]
    Task(String),
}

/// A request for one streamed reply
#[derive(Clone, Debug)]
pub struct ChatRequest {
    /// The new user utterance
    pub message: String,
    /// Prior turns, oldest first, excluding `message`
    pub history: Vec<TurnHistoryEntry>,
    /// Model to use (backend-specific identifier)
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// System instruction
    pub system: Option<String>,
}

impl Default for ChatRequest {
    fn default() -> Self {
        Self {
            message: String::new(),
            history: Vec::new(),
            model: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            system: None,
        }
    }
}

impl ChatRequest {
    /// Create a new request with message and model
    pub fn new(message: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Set prior turns
    #[must_use]
    pub fn with_history(mut self, history: Vec<TurnHistoryEntry>) -> Self {
        self.history = history;
        self
    }

    /// Set temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set system instruction
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Backend trait
///
/// Implement this trait to add another source of replies.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Get the backend name (e.g., "Gemini")
    fn name(&self) -> &str;

    /// Whether replies come from a remote model
    fn is_remote(&self) -> bool;

    /// Open a streamed reply
    ///
    /// Returns a channel receiver that yields tokens as they arrive. The
    /// sequence ends with `Complete` or `Error`, or with the channel closing.
    /// Each receiver is meant to be drained exactly once.
    async fn open_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<mpsc::Receiver<StreamingToken>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TurnRole;

    #[test]
    fn test_chat_request_builder() {
        let request = ChatRequest::new("Hello", "gemini-2.5-flash")
            .with_temperature(0.5)
            .with_system("You are helpful")
            .with_history(vec![TurnHistoryEntry::new(TurnRole::Model, "Hi!")]);

        assert_eq!(request.message, "Hello");
        assert_eq!(request.model, "gemini-2.5-flash");
        assert!((request.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(request.system, Some("You are helpful".to_string()));
        assert_eq!(request.history.len(), 1);
    }

    #[test]
    fn test_chat_request_defaults() {
        let request = ChatRequest::new("Hello", "m");
        assert!((request.temperature - 0.7).abs() < f32::EPSILON);
        assert!(request.system.is_none());
        assert!(request.history.is_empty());
    }

    #[test]
    fn test_temperature_clamped() {
        let request = ChatRequest::new("Hello", "m").with_temperature(5.0);
        assert!((request.temperature - 2.0).abs() < f32::EPSILON);
    }
}
