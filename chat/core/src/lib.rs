//! Folio Chat Core - Headless Chat Widget for the Portfolio Assistant
//!
//! This crate holds everything behind the portfolio's "ask my assistant"
//! widget, independent of any UI framework. A surface (the terminal UI, a
//! test harness, a future web front-end) owns a [`ChatWidget`], forwards the
//! user's submissions to it and renders its [`Transcript`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Surface                           │
//! │        input line ──submit()──┐   ┌── render reads       │
//! └───────────────────────────────┼───┼──────────────────────┘
//!                                 │   │
//! ┌───────────────────────────────┼───┼──────────────────────┐
//! │                       ChatWidget                         │
//! │   ┌──────────────┐     ┌──────┴───┴─────┐                │
//! │   │  ChatState   │     │   Transcript   │                │
//! │   │ Idle/Submit/ │     │ ordered turns, │                │
//! │   │  Streaming   │     │ one typing max │                │
//! │   └──────────────┘     └────────────────┘                │
//! │            │ open_stream()        ▲ StreamingToken       │
//! │            ▼                      │                      │
//! │   ┌──────────────────────────────────────────────┐       │
//! │   │ StreamClient: GeminiBackend | CannedBackend  │       │
//! │   └──────────────────────────────────────────────┘       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use folio_chat_core::{load_config, ChatWidget, StreamClient, WidgetSettings};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let client = StreamClient::from_config(&config);
//!     let mut widget = ChatWidget::new(client, WidgetSettings::from_config(&config));
//!
//!     widget.submit("What did Spencer build at AWS?").await.ok();
//!     widget.finish_response().await;
//!
//!     for msg in widget.transcript().messages() {
//!         println!("{:?}: {}", msg.sender, msg.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: Response stream client (Gemini remote, canned fallback)
//! - [`config`]: TOML + environment configuration
//! - [`error`]: Error types for the widget flow
//! - [`messages`]: Identifiers, senders and widget state
//! - [`profile`]: Static résumé data and the assistant persona
//! - [`transcript`]: The ordered chat transcript store
//! - [`widget`]: The submission state machine

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod error;
pub mod messages;
pub mod profile;
pub mod transcript;
pub mod widget;

// Re-exports for convenience
pub use backend::{
    BackendError, CannedBackend, ChatRequest, GeminiBackend, LlmBackend, StreamClient,
    StreamingToken,
};
pub use config::{
    default_config_path, load_config, load_config_from_path, ChatConfig, ChatToml, ConfigError,
    ConfigOverrides, ConfigSource,
};
pub use error::ChatError;
pub use messages::{ChatState, MessageId, Sender};
pub use profile::{Persona, Profile};
pub use transcript::{ChatMessage, Transcript, TurnHistoryEntry, TurnRole};
pub use widget::{ChatWidget, PendingReply, StreamUpdate, WidgetSettings};
