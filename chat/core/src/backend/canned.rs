//! Canned Backend
//!
//! Offline demo mode: every request is answered with one fixed reply.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::traits::{
    BackendError, ChatRequest, LlmBackend, StreamingToken, STREAM_CHANNEL_CAPACITY,
};

/// Backend that replies with a fixed string and never touches the network
#[derive(Clone, Debug)]
pub struct CannedBackend {
    reply: String,
}

impl CannedBackend {
    /// Create a canned backend
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl LlmBackend for CannedBackend {
    fn name(&self) -> &str {
        "Demo"
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn open_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<mpsc::Receiver<StreamingToken>, BackendError> {
        tracing::debug!(
            message_len = request.message.len(),
            "Answering from canned backend"
        );

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);

        if !self.reply.is_empty() {
            let _ = tx.send(StreamingToken::Token(self.reply.clone())).await;
        }
        let _ = tx.send(StreamingToken::Complete).await;

        Ok(rx)
    }
}
