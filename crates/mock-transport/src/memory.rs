//! Memory-backed transport implementation.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;
use tracing::debug;
use transport_core::{
    async_trait, CallbackQuery, ChatId, ChatMember, IncomingMessage, InlineKeyboard, Message,
    MessageId, MessageOptions, Transport, TransportError, UserId,
};

/// A call recorded by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Send { chat_id: ChatId, message_id: MessageId },
    Edit { chat_id: ChatId, message_id: MessageId },
    Delete { chat_id: ChatId, message_ids: Vec<MessageId> },
    Fetch { chat_id: ChatId, message_id: MessageId },
    GetChatMember { chat_id: ChatId, user_id: UserId },
    Answer { event_id: String, text: Option<String>, show_alert: bool },
}

#[derive(Default)]
struct State {
    next_message_id: MessageId,
    next_event_id: u64,
    messages: HashMap<(ChatId, MessageId), Message>,
    members: HashMap<(ChatId, UserId), ChatMember>,
    unavailable_chats: HashSet<ChatId>,
    delete_forbidden: bool,
    calls: Vec<TransportCall>,
}

/// A transport that keeps displayed messages in memory.
///
/// Every user is treated as a regular chat member unless configured
/// otherwise with [`MemoryTransport::set_member`] or
/// [`MemoryTransport::remove_member`].
#[derive(Default)]
pub struct MemoryTransport {
    state: Mutex<State>,
    strict_members: bool,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that only knows explicitly registered members.
    ///
    /// Lookups for anyone else fail with [`TransportError::NotParticipant`].
    pub fn with_strict_members() -> Self {
        Self {
            strict_members: true,
            ..Self::default()
        }
    }

    /// Register a chat member.
    pub async fn set_member(&self, chat_id: ChatId, user_id: UserId, is_anonymous: bool) {
        self.state.lock().await.members.insert(
            (chat_id, user_id),
            ChatMember {
                user_id,
                is_anonymous,
            },
        );
    }

    /// Forget a chat member.
    pub async fn remove_member(&self, chat_id: ChatId, user_id: UserId) {
        self.state.lock().await.members.remove(&(chat_id, user_id));
    }

    /// Make every later send to `chat_id` fail as if the bot was blocked.
    pub async fn block_chat(&self, chat_id: ChatId) {
        self.state.lock().await.unavailable_chats.insert(chat_id);
    }

    /// Make every later deletion fail with [`TransportError::DeleteForbidden`].
    pub async fn forbid_deletes(&self) {
        self.state.lock().await.delete_forbidden = true;
    }

    /// Remove a message as if a user deleted it.
    pub async fn drop_message(&self, chat_id: ChatId, message_id: MessageId) {
        self.state.lock().await.messages.remove(&(chat_id, message_id));
    }

    /// Place a message in a chat without recording a call.
    pub async fn put_message(&self, message: Message) {
        self.state
            .lock()
            .await
            .messages
            .insert((message.chat_id, message.id), message);
    }

    /// Get a displayed message.
    pub async fn message(&self, chat_id: ChatId, message_id: MessageId) -> Option<Message> {
        self.state
            .lock()
            .await
            .messages
            .get(&(chat_id, message_id))
            .cloned()
    }

    /// Get the newest displayed message in a chat.
    pub async fn latest_message(&self, chat_id: ChatId) -> Option<Message> {
        let state = self.state.lock().await;
        state
            .messages
            .values()
            .filter(|m| m.chat_id == chat_id)
            .max_by_key(|m| m.id)
            .cloned()
    }

    /// Number of messages currently displayed in a chat.
    pub async fn message_count(&self, chat_id: ChatId) -> usize {
        let state = self.state.lock().await;
        state.messages.keys().filter(|(chat, _)| *chat == chat_id).count()
    }

    /// All calls made so far, oldest first.
    pub async fn calls(&self) -> Vec<TransportCall> {
        self.state.lock().await.calls.clone()
    }

    /// Answers given to callback queries, oldest first.
    pub async fn answers(&self) -> Vec<(Option<String>, bool)> {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter_map(|call| match call {
                TransportCall::Answer {
                    text, show_alert, ..
                } => Some((text.clone(), *show_alert)),
                _ => None,
            })
            .collect()
    }

    /// Build the callback query produced by tapping the button labelled
    /// `button_text` on a displayed message.
    pub async fn press(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        user_id: UserId,
        button_text: &str,
    ) -> Option<CallbackQuery> {
        let mut state = self.state.lock().await;
        let message = state.messages.get(&(chat_id, message_id))?.clone();
        let data = message.find_button(button_text)?.callback_data.clone()?;
        state.next_event_id += 1;
        Some(CallbackQuery {
            id: format!("event-{}", state.next_event_id),
            chat_id,
            user_id,
            data,
            message,
        })
    }

    /// Build a text message from a user.
    pub async fn user_message(
        &self,
        chat_id: ChatId,
        user_id: Option<UserId>,
        text: &str,
    ) -> IncomingMessage {
        let mut state = self.state.lock().await;
        state.next_message_id += 1;
        let message = Message::new(chat_id, state.next_message_id, text, None);
        state.messages.insert((chat_id, message.id), message.clone());
        IncomingMessage {
            id: message.id,
            chat_id,
            user_id,
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
        _options: &MessageOptions,
    ) -> Result<Message, TransportError> {
        let mut state = self.state.lock().await;
        if state.unavailable_chats.contains(&chat_id) {
            return Err(TransportError::ChatUnavailable(format!(
                "bot was blocked in chat {}",
                chat_id
            )));
        }

        state.next_message_id += 1;
        let message = Message::new(chat_id, state.next_message_id, text, keyboard.cloned());
        debug!("Sent message {} to chat {}", message.id, chat_id);
        state.messages.insert((chat_id, message.id), message.clone());
        state.calls.push(TransportCall::Send {
            chat_id,
            message_id: message.id,
        });
        Ok(message)
    }

    async fn edit_message_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
        _options: &MessageOptions,
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;
        state.calls.push(TransportCall::Edit {
            chat_id,
            message_id,
        });
        let message = state
            .messages
            .get_mut(&(chat_id, message_id))
            .ok_or(TransportError::MessageNotFound)?;

        if message.text == text && message.keyboard.as_ref() == keyboard {
            return Err(TransportError::NotModified);
        }

        message.text = text.to_string();
        message.keyboard = keyboard.cloned();
        Ok(())
    }

    async fn delete_messages(
        &self,
        chat_id: ChatId,
        message_ids: &[MessageId],
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock().await;
        state.calls.push(TransportCall::Delete {
            chat_id,
            message_ids: message_ids.to_vec(),
        });
        if state.delete_forbidden {
            return Err(TransportError::DeleteForbidden);
        }
        for id in message_ids {
            state.messages.remove(&(chat_id, *id));
        }
        Ok(())
    }

    async fn get_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> Result<Message, TransportError> {
        let mut state = self.state.lock().await;
        state.calls.push(TransportCall::Fetch {
            chat_id,
            message_id,
        });
        Ok(state
            .messages
            .get(&(chat_id, message_id))
            .cloned()
            .unwrap_or_else(|| Message::empty(chat_id, message_id)))
    }

    async fn get_chat_member(
        &self,
        chat_id: ChatId,
        user_id: UserId,
    ) -> Result<ChatMember, TransportError> {
        let mut state = self.state.lock().await;
        state.calls.push(TransportCall::GetChatMember { chat_id, user_id });
        match state.members.get(&(chat_id, user_id)) {
            Some(member) => Ok(*member),
            None if self.strict_members => Err(TransportError::NotParticipant),
            None => Ok(ChatMember {
                user_id,
                is_anonymous: false,
            }),
        }
    }

    async fn answer_event(
        &self,
        event_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), TransportError> {
        self.state.lock().await.calls.push(TransportCall::Answer {
            event_id: event_id.to_string(),
            text: text.map(str::to_string),
            show_alert,
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "MemoryTransport"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transport_core::InlineButton;

    fn keyboard() -> InlineKeyboard {
        vec![vec![InlineButton::callback("ok", vec![9])]]
    }

    #[tokio::test]
    async fn test_send_and_edit() {
        let transport = MemoryTransport::new();
        let options = MessageOptions::default();
        let sent = transport
            .send_message(1, "hi", Some(&keyboard()), &options)
            .await
            .unwrap();

        transport
            .edit_message_text(1, sent.id, "hello", Some(&keyboard()), &options)
            .await
            .unwrap();
        assert_eq!(transport.message(1, sent.id).await.unwrap().text, "hello");

        let unchanged = transport
            .edit_message_text(1, sent.id, "hello", Some(&keyboard()), &options)
            .await;
        assert_eq!(unchanged, Err(TransportError::NotModified));
    }

    #[tokio::test]
    async fn test_blocked_chat() {
        let transport = MemoryTransport::new();
        transport.block_chat(5).await;
        let result = transport
            .send_message(5, "hi", None, &MessageOptions::default())
            .await;
        assert!(matches!(result, Err(TransportError::ChatUnavailable(_))));
    }

    #[tokio::test]
    async fn test_deleted_message_is_empty() {
        let transport = MemoryTransport::new();
        let sent = transport
            .send_message(1, "hi", None, &MessageOptions::default())
            .await
            .unwrap();
        transport.delete_messages(1, &[sent.id]).await.unwrap();

        let fetched = transport.get_message(1, sent.id).await.unwrap();
        assert!(fetched.empty);
    }

    #[tokio::test]
    async fn test_forbidden_delete() {
        let transport = MemoryTransport::new();
        transport.forbid_deletes().await;
        let result = transport.delete_messages(1, &[1]).await;
        assert_eq!(result, Err(TransportError::DeleteForbidden));
    }

    #[tokio::test]
    async fn test_members() {
        let transport = MemoryTransport::with_strict_members();
        transport.set_member(1, 100, true).await;

        assert!(transport.get_chat_member(1, 100).await.unwrap().is_anonymous);
        assert_eq!(
            transport.get_chat_member(1, 200).await,
            Err(TransportError::NotParticipant)
        );
    }

    #[tokio::test]
    async fn test_press_builds_query() {
        let transport = MemoryTransport::new();
        let sent = transport
            .send_message(1, "hi", Some(&keyboard()), &MessageOptions::default())
            .await
            .unwrap();

        let query = transport.press(1, sent.id, 3, "ok").await.unwrap();
        assert_eq!(query.data, vec![9]);
        assert_eq!(query.user_id, 3);
        assert_eq!(query.message.id, sent.id);
        assert!(transport.press(1, sent.id, 3, "nope").await.is_none());
    }
}
