//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chat_gui::{Dispatch, Gui, GuiConfig, Registry, Result};
use database::Database;
use mock_transport::MemoryTransport;
use sqlx::pool::PoolConnection;
use sqlx::Sqlite;

pub struct Harness {
    pub gui: Gui,
    pub transport: Arc<MemoryTransport>,
}

impl Harness {
    pub async fn new(registry: Registry) -> Self {
        Self::with_transport(registry, MemoryTransport::new()).await
    }

    pub async fn with_transport(registry: Registry, transport: MemoryTransport) -> Self {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let transport = Arc::new(transport);
        let config = GuiConfig::from_sqlite_path("sqlite::memory:");
        let gui = Gui::new(db, transport.clone(), registry, config);
        Self { gui, transport }
    }

    pub async fn conn(&self) -> PoolConnection<Sqlite> {
        self.gui.database().pool().acquire().await.unwrap()
    }

    /// Text of the newest message in a chat.
    pub async fn text(&self, chat_id: i64) -> String {
        self.transport.latest_message(chat_id).await.unwrap().text
    }

    /// Button labels of the newest message in a chat.
    pub async fn labels(&self, chat_id: i64) -> Vec<Vec<String>> {
        let message = self.transport.latest_message(chat_id).await.unwrap();
        message
            .button_grid()
            .iter()
            .map(|row| row.iter().map(|button| button.text.clone()).collect())
            .collect()
    }

    /// Tap a button of the newest message in a chat.
    pub async fn press(&self, chat_id: i64, user_id: i64, label: &str) -> Result<Dispatch> {
        let message = self.transport.latest_message(chat_id).await.unwrap();
        let query = self
            .transport
            .press(chat_id, message.id, user_id, label)
            .await
            .unwrap_or_else(|| panic!("no button {:?} in {:?}", label, message.keyboard));
        self.gui.handle_callback_query(&query).await
    }

    /// The last answer given to a callback query.
    pub async fn last_answer(&self) -> (Option<String>, bool) {
        self.transport.answers().await.pop().unwrap()
    }

    pub async fn window_count(&self, chat_id: i64) -> i64 {
        let mut conn = self.conn().await;
        database::window::count_windows(&mut conn, chat_id)
            .await
            .unwrap()
    }
}

pub fn labels(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|row| row.iter().map(|label| label.to_string()).collect())
        .collect()
}
