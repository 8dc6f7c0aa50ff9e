//! In-memory transport for testing persistent chat windows.
//!
//! [`MemoryTransport`] keeps a per-chat table of displayed messages, records
//! every call made against it, and can be told to misbehave the way a real
//! messaging platform does (blocked chats, forbidden deletions, anonymous
//! admins, users who left the chat).
//!
//! # Example
//!
//! ```rust
//! use mock_transport::MemoryTransport;
//! use transport_core::{InlineButton, MessageOptions, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), transport_core::TransportError> {
//!     let transport = MemoryTransport::new();
//!     let keyboard = vec![vec![InlineButton::callback("Tap", vec![1, 2, 3])]];
//!
//!     let message = transport
//!         .send_message(42, "Hello!", Some(&keyboard), &MessageOptions::default())
//!         .await?;
//!
//!     let query = transport.press(42, message.id, 7, "Tap").await.unwrap();
//!     assert_eq!(query.data, vec![1, 2, 3]);
//!     Ok(())
//! }
//! ```

mod memory;

pub use memory::{MemoryTransport, TransportCall};

// Re-export transport-core types for convenience
pub use transport_core::{
    async_trait, CallbackQuery, ChatMember, IncomingMessage, InlineButton, InlineKeyboard, Message,
    MessageOptions, Transport, TransportError,
};
