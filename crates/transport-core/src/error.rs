//! Error types for transport operations.

use thiserror::Error;

/// Errors a messaging backend can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The edit would leave the message unchanged.
    #[error("message is not modified")]
    NotModified,

    /// The bot is not allowed to delete this message.
    #[error("message deletion is forbidden")]
    DeleteForbidden,

    /// The user is not a member of the chat.
    #[error("user is not a participant of the chat")]
    NotParticipant,

    /// The chat cannot be reached any more (bot blocked, kicked, chat deleted).
    #[error("chat is unavailable: {0}")]
    ChatUnavailable(String),

    /// The referenced message does not exist.
    #[error("message not found")]
    MessageNotFound,

    /// Any other backend failure.
    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Whether the error leaves the platform state exactly as requested.
    ///
    /// `NotModified` on edit and `DeleteForbidden` on delete are treated as
    /// no-ops by callers.
    pub fn is_benign(&self) -> bool {
        matches!(self, TransportError::NotModified | TransportError::DeleteForbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benign_errors() {
        assert!(TransportError::NotModified.is_benign());
        assert!(TransportError::DeleteForbidden.is_benign());
        assert!(!TransportError::NotParticipant.is_benign());
        assert!(!TransportError::ChatUnavailable("blocked".into()).is_benign());
        assert!(!TransportError::Other("boom".into()).is_benign());
    }
}
