//! Widget buttons.

use std::str::FromStr;

use database::{button as rows, ButtonRecord, ButtonTable};
use transport_core::InlineButton;

use crate::context::{GuiContext, WindowRef};
use crate::error::Result;
use crate::token::{type_tag, Token, TypeTag};

/// Prefix shown in front of a checked button's label by default.
pub const DEFAULT_CHECKED_PREFIX: &str = "☑ ";

/// The built-in button kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    /// Stateless trigger.
    Simple,
    /// Toggles on every tap.
    CheckBox,
    /// Checks itself and unchecks its group sibling.
    SingleSelect,
}

impl ButtonKind {
    pub const ALL: [ButtonKind; 3] = [
        ButtonKind::Simple,
        ButtonKind::CheckBox,
        ButtonKind::SingleSelect,
    ];

    /// Registered type name; its CRC-32 is the kind's tag.
    pub fn type_name(self) -> &'static str {
        match self {
            ButtonKind::Simple => "SimpleButton",
            ButtonKind::CheckBox => "CheckBoxButton",
            ButtonKind::SingleSelect => "SingleSelectButton",
        }
    }

    pub fn tag(self) -> TypeTag {
        type_tag(self.type_name())
    }

    pub fn table(self) -> ButtonTable {
        match self {
            ButtonKind::Simple => ButtonTable::Simple,
            ButtonKind::CheckBox => ButtonTable::CheckBox,
            ButtonKind::SingleSelect => ButtonTable::SingleSelect,
        }
    }

    /// Whether the kind carries a checked state and stores its own label.
    pub fn is_checkable(self) -> bool {
        !matches!(self, ButtonKind::Simple)
    }
}

/// What a tab callback learns about the button that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPress {
    /// Tab callback to invoke; `None` means the tap is a no-op.
    pub callback: Option<String>,
    pub arg: Option<String>,
    /// New checked state, for checkable kinds.
    pub checked: Option<bool>,
    pub row: usize,
    pub column: usize,
}

impl ButtonPress {
    /// Parse the argument.
    pub fn arg_as<T: FromStr>(&self) -> Option<T> {
        self.arg.as_deref()?.parse().ok()
    }
}

/// A tappable button backed by a row in its kind's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    kind: ButtonKind,
    text: String,
    row: ButtonRecord,
}

impl Button {
    fn with_kind(kind: ButtonKind, text: String) -> Self {
        let checkable = kind.is_checkable();
        let row = ButtonRecord {
            text: checkable.then(|| text.clone()),
            checked_prefix: if checkable {
                DEFAULT_CHECKED_PREFIX.to_string()
            } else {
                String::new()
            },
            ..ButtonRecord::default()
        };
        Self { kind, text, row }
    }

    pub fn simple(text: impl Into<String>) -> Self {
        Self::with_kind(ButtonKind::Simple, text.into())
    }

    pub fn check_box(text: impl Into<String>) -> Self {
        Self::with_kind(ButtonKind::CheckBox, text.into())
    }

    pub fn single_select(text: impl Into<String>) -> Self {
        Self::with_kind(ButtonKind::SingleSelect, text.into())
    }

    /// Rebuild a button from its stored row. Simple buttons do not store
    /// their label, so the label shown on screen is reused.
    pub(crate) fn from_record(kind: ButtonKind, row: ButtonRecord, displayed: &str) -> Self {
        let text = match (&row.text, kind.is_checkable()) {
            (Some(text), true) => text.clone(),
            _ => displayed.to_string(),
        };
        Self { kind, text, row }
    }

    /// Symbolic name for group lookups.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.row.name = Some(name.into());
        self
    }

    /// Tab callback invoked on activation.
    pub fn callback(mut self, callback: impl Into<String>) -> Self {
        self.row.callback_name = Some(callback.into());
        self
    }

    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.row.arg = Some(arg.to_string());
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.row.is_checked = checked;
        self
    }

    pub fn prefixes(mut self, checked: impl Into<String>, unchecked: impl Into<String>) -> Self {
        self.row.checked_prefix = checked.into();
        self.row.unchecked_prefix = unchecked.into();
        self
    }

    /// Mutual-exclusion group for single-select buttons.
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.row.selection_group = group.into();
        self
    }

    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn row(&self) -> &ButtonRecord {
        &self.row
    }

    pub fn get_name(&self) -> Option<&str> {
        self.row.name.as_deref()
    }

    pub fn get_arg(&self) -> Option<&str> {
        self.row.arg.as_deref()
    }

    pub fn is_checked(&self) -> bool {
        self.row.is_checked
    }

    /// Raw token; empty until the button has been persisted.
    pub fn token(&self) -> &[u8] {
        &self.row.token
    }

    pub fn is_persisted(&self) -> bool {
        self.row.id != 0
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if self.kind.is_checkable() {
            self.row.text = Some(self.text.clone());
        }
    }

    pub fn set_arg(&mut self, arg: impl ToString) {
        self.row.arg = Some(arg.to_string());
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.row.is_checked = checked;
    }

    /// Label as rendered, including the check prefix.
    pub fn label(&self) -> String {
        if !self.kind.is_checkable() {
            return self.text.clone();
        }
        let prefix = if self.row.is_checked {
            &self.row.checked_prefix
        } else {
            &self.row.unchecked_prefix
        };
        format!("{}{}", prefix, self.text)
    }

    pub(crate) fn press(&self, row: usize, column: usize) -> ButtonPress {
        ButtonPress {
            callback: self.row.callback_name.clone(),
            arg: self.row.arg.clone(),
            checked: self.kind.is_checkable().then_some(self.row.is_checked),
            row,
            column,
        }
    }

    /// Write the button to its table, minting a token on first write.
    pub async fn persist(&mut self, ctx: &mut GuiContext<'_>, window: WindowRef) -> Result<()> {
        let table = self.kind.table();
        if self.is_persisted() {
            rows::update_button(ctx.conn, table, &self.row).await?;
            return Ok(());
        }
        let token = Token::generate(window.tag, window.id, self.kind.tag())?;
        self.row.token = token.to_vec();
        self.row.window_id = window.id;
        rows::create_button(ctx.conn, table, &mut self.row).await?;
        Ok(())
    }

    /// Persist and produce the platform button.
    pub async fn render(
        &mut self,
        ctx: &mut GuiContext<'_>,
        window: WindowRef,
    ) -> Result<InlineButton> {
        self.persist(ctx, window).await?;
        Ok(InlineButton::callback(self.label(), self.row.token.clone()))
    }

    /// Delete the row, if the button was ever written.
    pub async fn destroy(&self, ctx: &mut GuiContext<'_>) -> Result<()> {
        if self.is_persisted() {
            rows::delete_button(ctx.conn, self.kind.table(), self.row.id).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        let simple = Button::simple("Go");
        assert_eq!(simple.label(), "Go");
        assert_eq!(simple.row().text, None);

        let mut check = Button::check_box("Sound");
        assert_eq!(check.label(), "Sound");
        check.set_checked(true);
        assert_eq!(check.label(), "☑ Sound");

        let custom = Button::single_select("A").prefixes("(x) ", "( ) ");
        assert_eq!(custom.label(), "( ) A");
    }

    #[test]
    fn test_from_record_label_source() {
        let row = ButtonRecord {
            text: Some("stored".to_string()),
            ..ButtonRecord::default()
        };
        assert_eq!(
            Button::from_record(ButtonKind::CheckBox, row.clone(), "☑ stored").text(),
            "stored"
        );
        assert_eq!(
            Button::from_record(ButtonKind::Simple, row, "shown").text(),
            "shown"
        );
    }

    #[test]
    fn test_press_arg_parsing() {
        let press = Button::simple("+1").arg(6).callback("on_value").press(0, 2);
        assert_eq!(press.arg_as::<i64>(), Some(6));
        assert_eq!(press.callback.as_deref(), Some("on_value"));
        assert_eq!(press.checked, None);
        assert_eq!((press.row, press.column), (0, 2));
    }
}
