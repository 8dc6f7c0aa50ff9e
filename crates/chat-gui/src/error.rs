//! Error types for window operations.

use database::DatabaseError;
use thiserror::Error;
use transport_core::TransportError;

use crate::registry::RegistryError;
use crate::token::TokenError;

/// Errors raised while building, reconstructing or driving a window.
#[derive(Debug, Error)]
pub enum GuiError {
    /// The window behind an event is gone or superseded.
    #[error("no window: {0}")]
    NoWindow(String),

    /// The acting user does not own the window.
    #[error("permission denied")]
    Permission,

    /// The displayed state diverged from the store.
    #[error("reconstruction failed: {0}")]
    Reconstruction(String),

    /// A handler cut the event short and asked for a direct re-render.
    #[error("user request processing stopped")]
    StopProcessing { alert: Option<String> },

    /// No tab with this name in the window.
    #[error("tab not found: {0}")]
    TabNotFound(String),

    /// Switching to the tab that is already displayed.
    #[error("tab {0} is already active")]
    TabAlreadyActive(usize),

    /// No input field with this name in the tab.
    #[error("input field not found: {0}")]
    InputFieldNotFound(String),

    /// Input processing needs a selected input field.
    #[error("input field not selected")]
    InputFieldNotSelected,

    /// A suspended tab could not be resumed.
    #[error("tab restore failed: {0}")]
    RestoreFailed(String),

    /// A button names a callback its tab does not handle.
    #[error("tab {tab} has no callback named {callback}")]
    UnknownCallback { tab: String, callback: String },

    /// A tab hook the tab kind does not provide.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// Invalid argument passed by application code.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Tab state could not be encoded or decoded.
    #[error("tab data error: {0}")]
    Data(#[from] serde_json::Error),

    /// Store failure.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Messaging backend failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Type registration failure.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

impl GuiError {
    /// Whether the error means the displayed window cannot be trusted.
    ///
    /// True for [`GuiError::NoWindow`], [`GuiError::Permission`] and
    /// [`GuiError::Reconstruction`].
    pub fn is_reconstruction(&self) -> bool {
        matches!(
            self,
            GuiError::NoWindow(_) | GuiError::Permission | GuiError::Reconstruction(_)
        )
    }

    /// Whether the error is the stop-processing control signal.
    pub fn is_stop(&self) -> bool {
        matches!(self, GuiError::StopProcessing { .. })
    }
}

impl From<TokenError> for GuiError {
    fn from(err: TokenError) -> Self {
        GuiError::Reconstruction(err.to_string())
    }
}

impl From<sqlx::Error> for GuiError {
    fn from(err: sqlx::Error) -> Self {
        GuiError::Database(DatabaseError::Sqlx(err))
    }
}

/// Result type for window operations.
pub type Result<T> = std::result::Result<T, GuiError>;
