//! Database models.
//!
//! Every record carries `id == 0` until it has been inserted; the create
//! functions write the assigned id back into the record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;

/// One persistent interactive session bound to one chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct WindowRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Chat the window lives in.
    pub chat_id: i64,
    /// Owning user, or one of the owner sentinels.
    pub user_id: i64,
    /// 4-byte type tag of the window kind.
    pub kind: Vec<u8>,
    /// Currently displayed message, unset before the first render.
    pub message_id: Option<i64>,
    /// Position of the active tab.
    pub current_tab_index: i64,
    /// Positions of suspended tabs, oldest first.
    pub saved_tab_indexes: Json<Vec<i64>>,
    /// Whether the active tab wants raw text input routed to it.
    pub input_required: bool,
}

impl WindowRecord {
    /// A fresh, not yet inserted window.
    pub fn new(chat_id: i64, user_id: i64, kind: Vec<u8>, current_tab_index: i64) -> Self {
        Self {
            id: 0,
            chat_id,
            user_id,
            kind,
            message_id: None,
            current_tab_index,
            saved_tab_indexes: Json(Vec::new()),
            input_required: false,
        }
    }
}

/// Per-tab state shared by every tab kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TabRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning window.
    pub window_id: i64,
    /// Tab kind name.
    pub kind: String,
    /// Position inside the window, reused when the tab is resumed.
    pub index_in_window: i64,
    /// Route raw text input to this tab.
    pub input_processing_enabled: bool,
    /// Selected input field; always set while input processing is enabled.
    pub current_input_field_name: Option<String>,
    /// Delete the user's message after its text was processed.
    pub delete_user_input_message: bool,
    /// Send a new window message on the next render instead of editing.
    pub resend_window_message: bool,
    /// Delete the old window message before resending.
    pub delete_previous_window_message_before_resending: bool,
    /// Kind-specific key/value state.
    pub data: Json<Map<String, Value>>,
}

impl TabRecord {
    /// A fresh, not yet inserted tab.
    pub fn new(window_id: i64, kind: impl Into<String>, index_in_window: i64) -> Self {
        Self {
            id: 0,
            window_id,
            kind: kind.into(),
            index_in_window,
            input_processing_enabled: false,
            current_input_field_name: None,
            delete_user_input_message: false,
            resend_window_message: false,
            delete_previous_window_message_before_resending: false,
            data: Json(Map::new()),
        }
    }
}

/// Message text composition for one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TextRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning window.
    pub window_id: i64,
    /// Position of the owning tab.
    pub tab_index: i64,
    /// Owning tab.
    pub tab_id: i64,
    pub header: Option<String>,
    /// Clear the header after the next render.
    pub one_time_header: bool,
    pub body: Option<String>,
    /// Fragment echoed while an input field is focused.
    pub input_field_text: Option<String>,
}

impl Default for TextRecord {
    fn default() -> Self {
        Self {
            id: 0,
            window_id: 0,
            tab_index: 0,
            tab_id: 0,
            header: None,
            one_time_header: true,
            body: None,
            input_field_text: None,
        }
    }
}

/// Which table a button kind is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonTable {
    Simple,
    CheckBox,
    SingleSelect,
}

impl ButtonTable {
    /// SQL table name.
    pub fn name(self) -> &'static str {
        match self {
            ButtonTable::Simple => "simple_buttons",
            ButtonTable::CheckBox => "check_box_buttons",
            ButtonTable::SingleSelect => "single_select_buttons",
        }
    }
}

/// A tappable button. All button tables share this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ButtonRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning window.
    pub window_id: i64,
    /// 32-byte callback token, globally unique.
    pub token: Vec<u8>,
    /// Symbolic name used for group lookups.
    pub name: Option<String>,
    /// Name of the tab callback invoked on activation.
    pub callback_name: Option<String>,
    /// Free-form argument passed to the callback.
    pub arg: Option<String>,
    /// Label without check prefix.
    pub text: Option<String>,
    pub is_checked: bool,
    pub checked_prefix: String,
    pub unchecked_prefix: String,
    /// Mutual-exclusion group for single-select buttons.
    pub selection_group: String,
}

/// A flattened button parked while its tab is suspended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PlatformButtonRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning window.
    pub window_id: i64,
    /// Position of the suspended tab.
    pub tab_index: i64,
    pub text: String,
    /// Raw callback payload, absent for platform-native buttons.
    pub token: Option<Vec<u8>>,
    pub url: Option<String>,
    /// Whether the button closes its row.
    pub last_in_row: bool,
}
