//! Chat Widget - Submission Flow
//!
//! The widget owns the transcript and drives one request at a time through
//! `Idle -> Submitting -> Streaming -> Idle`.
//!
//! Surfaces call [`ChatWidget::submit`] with the input line, then either
//! call [`ChatWidget::poll_streaming`] every frame or await
//! [`ChatWidget::next_update`] until it returns `None`. Remote failures
//! never escape the widget: they become the persona's apology message.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::backend::{BackendError, ChatRequest, LlmBackend, StreamingToken};
use crate::config::{ChatConfig, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::error::ChatError;
use crate::messages::{ChatState, MessageId};
use crate::profile::Persona;
use crate::transcript::Transcript;

/// Per-session widget settings
#[derive(Clone, Debug)]
pub struct WidgetSettings {
    /// Model identifier sent with every request
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Persona copy: greeting, system instruction, apology
    pub persona: Persona,
}

impl WidgetSettings {
    /// Take the widget-relevant parts of a configuration
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            persona: config.persona.clone(),
        }
    }
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            persona: Persona::default(),
        }
    }
}

/// What applying one stream event did to the transcript
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamUpdate {
    /// Text was appended to the typing message
    Fragment(String),
    /// The reply ended normally
    Finished,
    /// The reply failed; the apology has been appended
    Failed(ChatError),
}

/// An accepted submission whose stream has not been attached yet
#[derive(Debug)]
pub struct PendingReply {
    user_id: MessageId,
    request: ChatRequest,
}

impl PendingReply {
    /// The recorded user message
    #[must_use]
    pub fn user_id(&self) -> MessageId {
        self.user_id
    }

    /// The request to open the stream with
    #[must_use]
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// The chat widget
pub struct ChatWidget<B: LlmBackend> {
    /// Reply source, fixed for the session
    backend: Arc<B>,
    settings: WidgetSettings,
    transcript: Transcript,
    state: ChatState,
    /// Receiver for the in-flight reply
    streaming_rx: Option<mpsc::Receiver<StreamingToken>>,
    /// Typing bot message fragments are appended to
    streaming_message_id: Option<MessageId>,
    streaming_start: Option<Instant>,
    fragment_count: usize,
    last_error: Option<ChatError>,
}

impl<B: LlmBackend> ChatWidget<B> {
    /// Create a widget seeded with the persona greeting
    pub fn new(backend: B, settings: WidgetSettings) -> Self {
        let transcript = Transcript::with_greeting(settings.persona.greeting.clone());
        Self {
            backend: Arc::new(backend),
            settings,
            transcript,
            state: ChatState::Idle,
            streaming_rx: None,
            streaming_message_id: None,
            streaming_start: None,
            fragment_count: 0,
            last_error: None,
        }
    }

    /// Submit a user message and open the reply stream
    ///
    /// Blank input and submissions while a reply is in flight are rejected
    /// with no state change. Once accepted the call returns the user
    /// message id even when the stream could not be opened; in that case
    /// the apology has already been appended and the widget is idle again.
    ///
    /// Dropping the returned future before it resolves leaves the widget in
    /// `Submitting`. Surfaces that must keep running while the stream opens
    /// use [`ChatWidget::begin_submission`] and [`ChatWidget::attach_stream`].
    pub async fn submit(&mut self, text: &str) -> Result<MessageId, ChatError> {
        let pending = self.begin_submission(text)?;
        let opened = self.backend.open_stream(pending.request()).await;
        self.attach_stream(pending, opened)
    }

    /// Accept a user message and prepare its request
    ///
    /// Applies the submit guards, records the user turn and moves to
    /// `Submitting`. The caller opens the stream (for example on a task
    /// holding [`ChatWidget::backend`]) and hands the outcome to
    /// [`ChatWidget::attach_stream`].
    pub fn begin_submission(&mut self, text: &str) -> Result<PendingReply, ChatError> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring blank submission");
            return Err(ChatError::EmptyInput);
        }
        if self.state != ChatState::Idle {
            tracing::debug!(state = ?self.state, "Ignoring submission while busy");
            return Err(ChatError::AlreadyStreaming);
        }

        // History is taken before the new turn so it is not sent twice
        let history = self.transcript.history();
        let user_id = self.transcript.append_user_message(text)?;
        self.last_error = None;
        self.set_state(ChatState::Submitting);

        let mut request = ChatRequest::new(text, &self.settings.model)
            .with_history(history)
            .with_temperature(self.settings.temperature);
        if !self.settings.persona.system_instruction.trim().is_empty() {
            request = request.with_system(self.settings.persona.system_instruction.clone());
        }

        Ok(PendingReply { user_id, request })
    }

    /// Finish a submission with the result of opening its stream
    ///
    /// On success a typing bot message is added and the widget streams. On
    /// failure the apology is appended and the widget is idle again; the
    /// user message id is still returned.
    pub fn attach_stream(
        &mut self,
        pending: PendingReply,
        opened: Result<mpsc::Receiver<StreamingToken>, BackendError>,
    ) -> Result<MessageId, ChatError> {
        if self.state != ChatState::Submitting {
            tracing::debug!(state = ?self.state, "Ignoring stream for stale submission");
            return Err(ChatError::AlreadyStreaming);
        }

        match opened {
            Ok(rx) => {
                let msg_id = match self.transcript.begin_bot_response() {
                    Ok(msg_id) => msg_id,
                    Err(e) => {
                        self.set_state(ChatState::Idle);
                        return Err(e);
                    }
                };
                tracing::info!(
                    backend = self.backend.name(),
                    message_id = %msg_id,
                    history_turns = pending.request.history.len(),
                    "Response stream opened"
                );
                self.streaming_rx = Some(rx);
                self.streaming_message_id = Some(msg_id);
                self.streaming_start = Some(Instant::now());
                self.fragment_count = 0;
                self.set_state(ChatState::Streaming);
            }
            Err(e) => {
                tracing::warn!(
                    backend = self.backend.name(),
                    error = %e,
                    "Failed to open response stream"
                );
                self.transcript
                    .append_error_message(self.settings.persona.apology.clone());
                self.last_error = Some(ChatError::StreamOpen(e.to_string()));
                self.set_state(ChatState::Idle);
            }
        }

        Ok(pending.user_id)
    }

    /// Poll for streaming tokens
    ///
    /// Applies every token that is already available without waiting.
    /// Returns true if there was activity.
    pub fn poll_streaming(&mut self) -> bool {
        let mut activity = false;

        loop {
            let Some(rx) = self.streaming_rx.as_mut() else {
                return activity;
            };

            let token = match rx.try_recv() {
                Ok(token) => token,
                Err(TryRecvError::Empty) => return activity,
                Err(TryRecvError::Disconnected) => StreamingToken::Complete,
            };

            self.apply_token(token);
            activity = true;
        }
    }

    /// Wait for the next stream event and apply it
    ///
    /// Returns `None` when no reply is in flight.
    pub async fn next_update(&mut self) -> Option<StreamUpdate> {
        let rx = self.streaming_rx.as_mut()?;
        let token = rx.recv().await.unwrap_or(StreamingToken::Complete);
        Some(self.apply_token(token))
    }

    /// Consume the rest of the in-flight reply
    pub async fn finish_response(&mut self) {
        while self.next_update().await.is_some() {}
    }

    fn apply_token(&mut self, token: StreamingToken) -> StreamUpdate {
        match token {
            StreamingToken::Token(text) => {
                if let Some(ref msg_id) = self.streaming_message_id {
                    self.transcript.append_to_bot_response(msg_id, &text);
                }
                self.fragment_count += 1;
                StreamUpdate::Fragment(text)
            }

            StreamingToken::Complete => {
                tracing::info!(
                    fragments = self.fragment_count,
                    elapsed_ms = self.elapsed_ms(),
                    "Response stream completed"
                );
                self.end_stream();
                StreamUpdate::Finished
            }

            StreamingToken::Error(error) => {
                tracing::warn!(
                    error = %error,
                    fragments = self.fragment_count,
                    elapsed_ms = self.elapsed_ms(),
                    "Response stream failed"
                );
                // Partial text stays; the apology is a separate message
                self.end_stream();
                self.transcript
                    .append_error_message(self.settings.persona.apology.clone());

                let error = ChatError::StreamFragment(error);
                self.last_error = Some(error.clone());
                StreamUpdate::Failed(error)
            }
        }
    }

    fn end_stream(&mut self) {
        if let Some(msg_id) = self.streaming_message_id.take() {
            self.transcript.finalize_bot_response(&msg_id);
        }
        self.streaming_rx = None;
        self.streaming_start = None;
        self.fragment_count = 0;
        self.set_state(ChatState::Idle);
    }

    fn elapsed_ms(&self) -> u64 {
        self.streaming_start
            .map_or(0, |start| u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX))
    }

    fn set_state(&mut self, state: ChatState) {
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "Widget state change");
        }
        self.state = state;
    }

    /// Current state
    pub fn state(&self) -> ChatState {
        self.state
    }

    /// Check if a reply is streaming
    pub fn is_streaming(&self) -> bool {
        self.state == ChatState::Streaming
    }

    /// Whether the input line accepts submissions
    pub fn input_enabled(&self) -> bool {
        !self.state.is_busy()
    }

    /// The transcript, for rendering
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Session settings
    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    /// Shared handle to the reply source
    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    /// Name of the reply source
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Whether replies are canned
    pub fn is_demo_mode(&self) -> bool {
        !self.backend.is_remote()
    }

    /// The most recent stream failure, cleared by the next accepted submit
    pub fn last_error(&self) -> Option<&ChatError> {
        self.last_error.as_ref()
    }
}
