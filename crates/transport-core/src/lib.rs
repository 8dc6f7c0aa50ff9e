//! Messaging transport interface for persistent chat windows.
//!
//! This crate defines the collaborator that the window engine talks to when
//! it needs to put something on screen or inspect what is already there:
//!
//! - [`Transport`] - The trait every messaging backend implements
//! - [`Message`] / [`InlineButton`] - What a rendered window looks like on the platform
//! - [`CallbackQuery`] / [`IncomingMessage`] - Inbound events handed to the dispatcher
//! - [`TransportError`] - Error types, including the benign ones the engine swallows
//!
//! # Example
//!
//! ```rust
//! use transport_core::{
//!     async_trait, ChatMember, InlineKeyboard, Message, MessageOptions, Transport, TransportError,
//! };
//!
//! struct NullTransport;
//!
//! #[async_trait]
//! impl Transport for NullTransport {
//!     async fn send_message(
//!         &self,
//!         chat_id: i64,
//!         text: &str,
//!         keyboard: Option<&InlineKeyboard>,
//!         _options: &MessageOptions,
//!     ) -> Result<Message, TransportError> {
//!         Ok(Message::new(chat_id, 1, text, keyboard.cloned()))
//!     }
//!
//!     async fn edit_message_text(
//!         &self,
//!         _chat_id: i64,
//!         _message_id: i64,
//!         _text: &str,
//!         _keyboard: Option<&InlineKeyboard>,
//!         _options: &MessageOptions,
//!     ) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//!
//!     async fn delete_messages(&self, _chat_id: i64, _ids: &[i64]) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//!
//!     async fn get_message(&self, chat_id: i64, message_id: i64) -> Result<Message, TransportError> {
//!         Ok(Message::empty(chat_id, message_id))
//!     }
//!
//!     async fn get_chat_member(&self, _chat_id: i64, user_id: i64) -> Result<ChatMember, TransportError> {
//!         Ok(ChatMember { user_id, is_anonymous: false })
//!     }
//!
//!     async fn answer_event(
//!         &self,
//!         _event_id: &str,
//!         _text: Option<&str>,
//!         _show_alert: bool,
//!     ) -> Result<(), TransportError> {
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "NullTransport"
//!     }
//! }
//! ```

mod error;
mod message;
mod trait_def;

pub use error::TransportError;
pub use message::{
    CallbackQuery, ChatId, ChatMember, IncomingMessage, InlineButton, InlineKeyboard, Message,
    MessageId, MessageOptions, UserId,
};
pub use trait_def::Transport;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
