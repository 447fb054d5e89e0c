//! Chat Transcript Store
//!
//! The ordered list of turns shown in the widget. The transcript is seeded
//! with a greeting, grows by append only and lives for one session.
//!
//! At most one bot message is "typing" at a time: the placeholder that
//! fragments are streamed into. Once finalized, a message's text is frozen.

use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::messages::{now_ms, MessageId, Sender};

/// A message in the transcript
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: MessageId,
    /// Accumulated content
    pub text: String,
    /// Who sent this message
    pub sender: Sender,
    /// When the message was created (Unix timestamp ms)
    pub timestamp: u64,
    /// Whether fragments are still being streamed into this message
    pub is_typing: bool,
}

impl ChatMessage {
    /// Create a finished message
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            sender,
            timestamp: now_ms(),
            is_typing: false,
        }
    }

    /// Create an empty typing placeholder for a bot reply
    pub fn typing() -> Self {
        Self {
            id: MessageId::new(),
            text: String::new(),
            sender: Sender::Bot,
            timestamp: now_ms(),
            is_typing: true,
        }
    }
}

/// Role of a turn as the remote API sees it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Visitor turn
    User,
    /// Assistant turn
    Model,
}

impl From<Sender> for TurnRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => TurnRole::User,
            Sender::Bot => TurnRole::Model,
        }
    }
}

/// A transcript message projected into the remote API's turn format
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnHistoryEntry {
    /// Who authored the turn
    pub role: TurnRole,
    /// Turn text
    pub content: String,
}

impl TurnHistoryEntry {
    /// Create a history entry
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// The ordered conversation shown in the widget
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    /// The single in-flight bot turn, if any
    typing_id: Option<MessageId>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript seeded with a bot greeting
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.messages.push(ChatMessage::new(Sender::Bot, greeting));
        transcript
    }

    /// Append a user turn
    ///
    /// Blank text and submissions made while a reply is typing are rejected
    /// without touching the transcript. The text is stored as submitted.
    pub fn append_user_message(&mut self, text: &str) -> Result<MessageId, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }
        if self.is_streaming() {
            return Err(ChatError::AlreadyStreaming);
        }

        let msg = ChatMessage::new(Sender::User, text);
        let id = msg.id;
        self.messages.push(msg);
        Ok(id)
    }

    /// Start a typing bot placeholder
    pub fn begin_bot_response(&mut self) -> Result<MessageId, ChatError> {
        if self.typing_id.is_some() {
            return Err(ChatError::AlreadyTyping);
        }

        let msg = ChatMessage::typing();
        let id = msg.id;
        self.typing_id = Some(id);
        self.messages.push(msg);
        Ok(id)
    }

    /// Append a fragment to a typing bot message
    ///
    /// Returns `false` (and changes nothing) when the id is unknown or the
    /// message has already been finalized.
    pub fn append_to_bot_response(&mut self, id: &MessageId, fragment: &str) -> bool {
        match self.messages.iter_mut().find(|m| &m.id == id) {
            Some(msg) if msg.is_typing => {
                msg.text.push_str(fragment);
                true
            }
            _ => false,
        }
    }

    /// Mark a bot message as finished. Idempotent.
    pub fn finalize_bot_response(&mut self, id: &MessageId) -> bool {
        if self.typing_id.as_ref() == Some(id) {
            self.typing_id = None;
        }

        match self.messages.iter_mut().find(|m| &m.id == id) {
            Some(msg) => {
                msg.is_typing = false;
                true
            }
            None => false,
        }
    }

    /// Append a finished bot message (used for the failure apology)
    pub fn append_error_message(&mut self, text: impl Into<String>) -> MessageId {
        let msg = ChatMessage::new(Sender::Bot, text);
        let id = msg.id;
        self.messages.push(msg);
        id
    }

    /// Project the transcript into remote turn history
    ///
    /// The typing placeholder and messages with no text are left out.
    pub fn history(&self) -> Vec<TurnHistoryEntry> {
        self.messages
            .iter()
            .filter(|m| !m.is_typing && !m.text.is_empty())
            .map(|m| TurnHistoryEntry::new(m.sender.into(), m.text.clone()))
            .collect()
    }

    /// All messages in render order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Get message by ID
    pub fn get(&self, id: &MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Most recent message
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The in-flight bot message, if any
    pub fn typing_message(&self) -> Option<&ChatMessage> {
        self.typing_id.as_ref().and_then(|id| self.get(id))
    }

    /// Check if a bot reply is currently typing
    pub fn is_streaming(&self) -> bool {
        self.typing_id.is_some()
    }
}
