//! Dispatcher configuration.

use std::env;

use crate::error::{GuiError, Result};

const DEFAULT_PERMISSION_NOTICE: &str = "Sorry, you can't use this button.";
const DEFAULT_STALE_NOTICE: &str = "Sorry, this keyboard is outdated and no longer served. \
                                    Please use the keyboard from a later message.";
const DEFAULT_FAILURE_NOTICE: &str = "Sorry, something went wrong.\nPlease try again later.";

/// Configuration for [`Gui`](crate::Gui).
#[derive(Debug, Clone)]
pub struct GuiConfig {
    /// SQLite URL of the window store.
    pub sqlite_url: String,
    /// Shown when someone taps a button of a window they do not own.
    pub permission_notice: String,
    /// Shown when a tapped keyboard no longer matches the store.
    pub stale_notice: String,
    /// Shown when handling a tap fails unexpectedly.
    pub failure_notice: String,
    /// Default for window kinds that do not choose whether to resend the
    /// message after processing text input.
    pub resend_after_input: bool,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self::from_sqlite_path("./data/windows.db")
    }
}

impl GuiConfig {
    /// Create a config from a SQLite path or URL.
    pub fn from_sqlite_path(path: impl Into<String>) -> Self {
        Self {
            sqlite_url: sqlite_url_from_path(&path.into()),
            permission_notice: DEFAULT_PERMISSION_NOTICE.to_string(),
            stale_notice: DEFAULT_STALE_NOTICE.to_string(),
            failure_notice: DEFAULT_FAILURE_NOTICE.to_string(),
            resend_after_input: true,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `SQLITE_PATH` (path or sqlite URL, default: ./data/windows.db)
    /// - `GUI_PERMISSION_NOTICE`
    /// - `GUI_STALE_NOTICE`
    /// - `GUI_FAILURE_NOTICE`
    /// - `GUI_RESEND_AFTER_INPUT` (true/false, default: true)
    pub fn from_env() -> Result<Self> {
        let sqlite_path =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "./data/windows.db".to_string());
        let mut config = Self::from_sqlite_path(sqlite_path);

        if let Ok(notice) = env::var("GUI_PERMISSION_NOTICE") {
            config.permission_notice = notice;
        }
        if let Ok(notice) = env::var("GUI_STALE_NOTICE") {
            config.stale_notice = notice;
        }
        if let Ok(notice) = env::var("GUI_FAILURE_NOTICE") {
            config.failure_notice = notice;
        }
        if let Ok(value) = env::var("GUI_RESEND_AFTER_INPUT") {
            config.resend_after_input = parse_bool(&value).ok_or_else(|| {
                GuiError::InvalidArgument(format!("GUI_RESEND_AFTER_INPUT: {}", value))
            })?;
        }

        Ok(config)
    }
}

fn sqlite_url_from_path(path: &str) -> String {
    if path.starts_with("sqlite:") {
        path.to_string()
    } else {
        format!("sqlite:{}?mode=rwc", path)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_from_path() {
        assert_eq!(sqlite_url_from_path("data/w.db"), "sqlite:data/w.db?mode=rwc");
        assert_eq!(sqlite_url_from_path("sqlite::memory:"), "sqlite::memory:");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_defaults() {
        let config = GuiConfig::from_sqlite_path("sqlite::memory:");
        assert_eq!(config.sqlite_url, "sqlite::memory:");
        assert!(config.resend_after_input);
        assert!(!config.stale_notice.is_empty());
    }
}
