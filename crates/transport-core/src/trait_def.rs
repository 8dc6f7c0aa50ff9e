//! The Transport trait definition.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::message::{ChatId, ChatMember, InlineKeyboard, Message, MessageId, MessageOptions, UserId};

/// A messaging backend that can display and inspect window messages.
///
/// This trait is object-safe and can be used with `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a new message with an optional button grid.
    ///
    /// Returns [`TransportError::ChatUnavailable`] when the chat can no
    /// longer be written to.
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
        options: &MessageOptions,
    ) -> Result<Message, TransportError>;

    /// Replace the text and buttons of an existing message.
    ///
    /// Returns [`TransportError::NotModified`] when nothing changed.
    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
        options: &MessageOptions,
    ) -> Result<(), TransportError>;

    /// Delete messages from a chat.
    ///
    /// Returns [`TransportError::DeleteForbidden`] when the bot lacks the right.
    async fn delete_messages(
        &self,
        chat_id: ChatId,
        message_ids: &[MessageId],
    ) -> Result<(), TransportError>;

    /// Fetch a message as currently displayed.
    ///
    /// Deleted or unknown messages come back with `empty` set.
    async fn get_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<Message, TransportError>;

    /// Look up a chat member.
    ///
    /// Returns [`TransportError::NotParticipant`] for non-members.
    async fn get_chat_member(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<ChatMember, TransportError>;

    /// Acknowledge a callback query, optionally with a notice.
    async fn answer_event(
        &self,
        event_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), TransportError>;

    /// Get a human-readable name for this backend.
    fn name(&self) -> &str;
}
