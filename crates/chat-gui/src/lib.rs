//! Persistent multi-tab chat windows.
//!
//! A window is one bot message with an inline keyboard. Nothing about it
//! lives in memory between events: every tap or text message rebuilds the
//! window from SQLite, checks it against the message the platform shows,
//! runs the tab's handler and writes the result back in one transaction.
//!
//! - [`Gui`] - Dispatcher for callback queries and text input
//! - [`Registry`] - Window kinds and button kinds, keyed by CRC-32 tags
//! - [`WindowDescriptor`] / [`TabBehavior`] - How applications describe windows
//! - [`Button`] / [`Keyboard`] / [`Text`] - What a tab renders
//! - [`Token`] - The 32-byte callback payload carried by every button
//! - [`pagination`] - Page navigation rows for long lists
//! - [`tabs`] - Ready-made selection tabs
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use chat_gui::{
//!     async_trait, Button, ButtonPress, Gui, GuiConfig, GuiContext, Owner, Registry, Result,
//!     TabBehavior, TabCore, WindowDescriptor,
//! };
//! use database::Database;
//! use mock_transport::MemoryTransport;
//!
//! struct Counter;
//!
//! #[async_trait]
//! impl TabBehavior for Counter {
//!     fn name(&self) -> &str {
//!         "Counter"
//!     }
//!
//!     async fn build(
//!         &self,
//!         tab: &mut TabCore,
//!         _ctx: &mut GuiContext<'_>,
//!         _args: &serde_json::Value,
//!     ) -> Result<()> {
//!         tab.set("count", 0)?;
//!         tab.text.set_body("Count: {count}");
//!         tab.keyboard.add_row([Button::simple("+1").callback("increment")])
//!     }
//!
//!     fn text_data(&self, tab: &TabCore) -> Vec<(String, String)> {
//!         let count: i64 = tab.get("count").ok().flatten().unwrap_or_default();
//!         vec![("count".to_string(), count.to_string())]
//!     }
//!
//!     async fn on_callback(
//!         &self,
//!         tab: &mut TabCore,
//!         _ctx: &mut GuiContext<'_>,
//!         _callback: &str,
//!         _press: &ButtonPress,
//!     ) -> Result<()> {
//!         let count: i64 = tab.get("count")?.unwrap_or_default();
//!         tab.set("count", count + 1)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let db = Database::connect("sqlite::memory:").await?;
//!     db.migrate().await?;
//!
//!     let mut registry = Registry::new();
//!     registry.register_window(WindowDescriptor::new("CounterWindow").tab(Counter))?;
//!
//!     let transport = Arc::new(MemoryTransport::new());
//!     let gui = Gui::new(db, transport.clone(), registry, GuiConfig::default());
//!     gui.open_window("CounterWindow", 42, Owner::Anyone, None, &serde_json::Value::Null)
//!         .await?;
//!
//!     let message = transport.latest_message(42).await.unwrap();
//!     let query = transport.press(42, message.id, 7, "+1").await.unwrap();
//!     gui.handle_callback_query(&query).await?;
//!     Ok(())
//! }
//! ```

pub mod button;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod keyboard;
pub mod pagination;
pub mod registry;
pub mod tab;
pub mod tabs;
pub mod text;
pub mod token;
pub mod window;

pub use button::{Button, ButtonKind, ButtonPress};
pub use config::GuiConfig;
pub use context::{EventScope, GuiContext, Owner, WindowRef, ANONYMOUS, ANYONE};
pub use dispatcher::{Dispatch, Gui};
pub use error::{GuiError, Result};
pub use keyboard::{Cell, Keyboard, KeyboardLayout};
pub use pagination::{PageInfo, PageSource, PageTarget, Paginated, PaginatorMode};
pub use registry::{Registry, RegistryError};
pub use tab::{InputField, Tab, TabBehavior, TabCore, WindowRequest};
pub use text::Text;
pub use token::{Token, TokenError, TypeTag};
pub use window::{Window, WindowDescriptor, WindowState};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
