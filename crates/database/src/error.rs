//! Store error types.

use thiserror::Error;

/// Errors raised by the window store.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Query, connection or column decode failure (tab data JSON included).
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A window, tab, text or button row that an update expected is gone.
    #[error("{entity} row not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
