//! Platform-side message and event types.

use serde::{Deserialize, Serialize};

/// Chat identifier on the messaging platform.
pub type ChatId = i64;
/// User identifier on the messaging platform.
pub type UserId = i64;
/// Message identifier, unique within a chat.
pub type MessageId = i64;

/// A button as the platform renders it.
///
/// Buttons produced by the window engine carry an opaque `callback_data`
/// payload. Buttons without a payload (URL buttons and the like) are
/// platform-native and are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    /// Label shown to the user.
    pub text: String,
    /// Opaque payload delivered back on tap.
    pub callback_data: Option<Vec<u8>>,
    /// Link opened on tap.
    pub url: Option<String>,
}

impl InlineButton {
    /// Create a button that reports taps back with `data`.
    pub fn callback(text: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            text: text.into(),
            callback_data: Some(data.into()),
            url: None,
        }
    }

    /// Create a link button.
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
            url: Some(url.into()),
        }
    }

    /// Whether tapping the button produces a callback event.
    pub fn has_payload(&self) -> bool {
        self.callback_data.is_some()
    }
}

/// Rows of buttons attached to a message.
pub type InlineKeyboard = Vec<Vec<InlineButton>>;

/// A message as currently displayed on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier.
    pub id: MessageId,
    /// Chat the message lives in.
    pub chat_id: ChatId,
    /// Rendered text.
    pub text: String,
    /// Attached button grid, if any.
    pub keyboard: Option<InlineKeyboard>,
    /// Set when the message was deleted or never existed.
    pub empty: bool,
}

impl Message {
    /// Create a displayed message.
    pub fn new(
        chat_id: ChatId,
        id: MessageId,
        text: impl Into<String>,
        keyboard: Option<InlineKeyboard>,
    ) -> Self {
        Self {
            id,
            chat_id,
            text: text.into(),
            keyboard,
            empty: false,
        }
    }

    /// Placeholder for a message that is gone.
    pub fn empty(chat_id: ChatId, id: MessageId) -> Self {
        Self {
            id,
            chat_id,
            text: String::new(),
            keyboard: None,
            empty: true,
        }
    }

    /// The attached button grid, or an empty grid when there is none.
    pub fn button_grid(&self) -> InlineKeyboard {
        self.keyboard.clone().unwrap_or_default()
    }

    /// Find the first button whose label equals `text`.
    pub fn find_button(&self, text: &str) -> Option<&InlineButton> {
        self.keyboard
            .as_ref()?
            .iter()
            .flatten()
            .find(|button| button.text == text)
    }
}

/// Membership information for a chat participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMember {
    /// The member's user id.
    pub user_id: UserId,
    /// Whether the member acts anonymously (anonymous group admin).
    pub is_anonymous: bool,
}

/// Extra flags passed along with send/edit requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageOptions {
    /// Deliver silently.
    pub disable_notification: bool,
    /// Do not expand link previews.
    pub disable_web_page_preview: bool,
    /// Forbid forwarding and saving.
    pub protect_content: bool,
}

/// A button tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackQuery {
    /// Event id, used to answer the query.
    pub id: String,
    /// Chat the tapped message lives in.
    pub chat_id: ChatId,
    /// User who tapped.
    pub user_id: UserId,
    /// Payload of the tapped button.
    pub data: Vec<u8>,
    /// The message carrying the tapped button, as currently displayed.
    pub message: Message,
}

/// A text message sent by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Message identifier.
    pub id: MessageId,
    /// Chat the message was sent to.
    pub chat_id: ChatId,
    /// Sender, or `None` when the message was sent on behalf of the chat
    /// (anonymous admins).
    pub user_id: Option<UserId>,
    /// Message text.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_grid_defaults_to_empty() {
        let message = Message::new(1, 10, "hello", None);
        assert!(message.button_grid().is_empty());
        assert!(!message.empty);
    }

    #[test]
    fn test_find_button() {
        let keyboard = vec![
            vec![InlineButton::callback("a", vec![1]), InlineButton::url("docs", "https://example.com")],
            vec![InlineButton::callback("b", vec![2])],
        ];
        let message = Message::new(1, 10, "hello", Some(keyboard));

        let button = message.find_button("b").unwrap();
        assert_eq!(button.callback_data, Some(vec![2]));
        assert!(!message.find_button("docs").unwrap().has_payload());
        assert!(message.find_button("missing").is_none());
    }
}
