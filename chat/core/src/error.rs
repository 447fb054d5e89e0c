//! Widget Error Types

use thiserror::Error;

/// Errors raised by the transcript store and the submission flow
///
/// `EmptyInput` and `AlreadyStreaming` are guard rejections: surfaces are
/// expected to ignore them. The stream variants describe failures that the
/// widget has already turned into an apology message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    /// Submission was blank or whitespace-only
    #[error("message is empty")]
    EmptyInput,

    /// A response is still in flight
    #[error("a response is already streaming")]
    AlreadyStreaming,

    /// A typing placeholder already exists
    #[error("a bot response is already typing")]
    AlreadyTyping,

    /// The remote stream could not be opened
    #[error("failed to open response stream: {0}")]
    StreamOpen(String),

    /// The stream failed after it was opened
    #[error("response stream failed: {0}")]
    StreamFragment(String),
}

impl ChatError {
    /// Whether this is a guard rejection (no state was changed)
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput | Self::AlreadyStreaming | Self::AlreadyTyping
        )
    }
}
