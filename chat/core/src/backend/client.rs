//! Stream client selection
//!
//! The widget is handed one [`StreamClient`] at startup and keeps it for the
//! whole session.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::canned::CannedBackend;
use super::gemini::GeminiBackend;
use super::traits::{BackendError, ChatRequest, LlmBackend, StreamingToken};
use crate::config::ChatConfig;

/// Either the remote model or the offline demo reply
#[derive(Clone, Debug)]
pub enum StreamClient {
    /// Hosted Gemini model
    Remote(GeminiBackend),
    /// Fixed demo reply, no network
    Canned(CannedBackend),
}

impl StreamClient {
    /// Pick the variant for a configuration
    ///
    /// A non-blank API key selects `Remote`; anything else selects `Canned`
    /// with the persona's demo reply.
    pub fn from_config(config: &ChatConfig) -> Self {
        match GeminiBackend::from_config(config) {
            Ok(backend) => {
                tracing::info!(
                    model = %config.model,
                    api_base = %config.api_base,
                    "Using remote Gemini backend"
                );
                Self::Remote(backend)
            }
            Err(e) => {
                tracing::info!(reason = %e, "Using canned demo backend");
                Self::Canned(CannedBackend::new(config.persona.demo_reply.clone()))
            }
        }
    }

    /// Whether replies are canned
    pub fn is_demo_mode(&self) -> bool {
        matches!(self, Self::Canned(_))
    }
}

#[async_trait]
impl LlmBackend for StreamClient {
    fn name(&self) -> &str {
        match self {
            Self::Remote(backend) => backend.name(),
            Self::Canned(backend) => backend.name(),
        }
    }

    fn is_remote(&self) -> bool {
        match self {
            Self::Remote(backend) => backend.is_remote(),
            Self::Canned(backend) => backend.is_remote(),
        }
    }

    async fn open_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<mpsc::Receiver<StreamingToken>, BackendError> {
        match self {
            Self::Remote(backend) => backend.open_stream(request).await,
            Self::Canned(backend) => backend.open_stream(request).await,
        }
    }
}
