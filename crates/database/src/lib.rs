//! SQLite persistence for persistent chat windows.
//!
//! This crate stores the durable half of every window: window, tab, text and
//! button rows, plus the bridge rows that park a suspended tab's keyboard.
//! All row functions take a `&mut SqliteConnection` so that one inbound event
//! can run every query inside a single transaction.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, models::WindowRecord, window};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:windows.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a window inside a transaction
//!     let mut tx = db.begin().await?;
//!     let mut row = WindowRecord::new(42, 0, b"\x01\x02\x03\x04".to_vec(), 0);
//!     window::create_window(&mut tx, &mut row).await?;
//!     tx.commit().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod button;
pub mod error;
pub mod models;
pub mod platform_button;
pub mod tab;
pub mod text;
pub mod window;

pub use error::{DatabaseError, Result};
pub use models::{
    ButtonRecord, ButtonTable, PlatformButtonRecord, TabRecord, TextRecord, WindowRecord,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Every inbound event holds one connection for the length of its transaction.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/windows.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Start a transaction. Dropping it without committing rolls back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
