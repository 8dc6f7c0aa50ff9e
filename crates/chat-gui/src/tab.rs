//! Tabs: named screens owning one text and one keyboard.
//!
//! A tab kind is a stateless [`TabBehavior`] registered on a window kind.
//! Everything that changes between events lives in [`TabCore`], which is
//! rebuilt from the store for every event.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use database::{tab as rows, TabRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use transport_core::InlineKeyboard;

use crate::button::{Button, ButtonPress};
use crate::context::{GuiContext, WindowRef};
use crate::error::{GuiError, Result};
use crate::keyboard::{Keyboard, KeyboardLayout};
use crate::text::Text;

/// A named slot for raw text input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    pub name: String,
    /// Echoed under the body while the field is focused.
    pub prompt: Option<String>,
}

impl InputField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prompt: None,
        }
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

/// Window-level actions a tab asks for from inside a handler.
///
/// They run after the handler returns, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowRequest {
    SwitchTab {
        name: String,
        save_current: bool,
        args: Value,
    },
    Close,
}

/// Behavior of a tab kind.
///
/// Implementors hold no per-window state; they read and write it through
/// the [`TabCore`] they are handed.
#[async_trait]
pub trait TabBehavior: Send + Sync {
    /// Tab kind name, unique within its window kind.
    fn name(&self) -> &str;

    fn input_fields(&self) -> Vec<InputField> {
        Vec::new()
    }

    /// When false, the message text is only composed once and then reused
    /// verbatim from the displayed message.
    fn rerender_text(&self) -> bool {
        true
    }

    fn layout(&self) -> KeyboardLayout {
        KeyboardLayout::Rows
    }

    /// Fill a freshly created tab.
    async fn build(
        &self,
        _tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
        _args: &Value,
    ) -> Result<()> {
        Ok(())
    }

    /// Values substituted for `{key}` placeholders in the text.
    fn text_data(&self, _tab: &TabCore) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Handle a button callback by name.
    async fn on_callback(
        &self,
        _tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
        callback: &str,
        _press: &ButtonPress,
    ) -> Result<()> {
        Err(GuiError::UnknownCallback {
            tab: self.name().to_string(),
            callback: callback.to_string(),
        })
    }

    /// Handle text sent to the selected input field.
    async fn on_input(
        &self,
        _tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
        _field: &str,
        _text: &str,
    ) -> Result<()> {
        Err(GuiError::NotImplemented("on_input"))
    }
}

/// The live state of one tab during an event.
#[derive(Debug)]
pub struct TabCore {
    window: WindowRef,
    row: TabRecord,
    pub text: Text,
    pub keyboard: Keyboard,
    input_fields: Vec<InputField>,
    message_text: Option<String>,
    activated: Option<Button>,
    requests: VecDeque<WindowRequest>,
}

impl TabCore {
    pub fn window(&self) -> WindowRef {
        self.window
    }

    pub fn row(&self) -> &TabRecord {
        &self.row
    }

    pub fn index(&self) -> i64 {
        self.row.index_in_window
    }

    /// Text of the message this tab was reconstructed from.
    pub fn message_text(&self) -> Option<&str> {
        self.message_text.as_deref()
    }

    /// The button being handled, while a callback runs.
    ///
    /// A copy taken after activation; keyboard edits made by the handler do
    /// not change it.
    pub fn activated_button(&self) -> Option<&Button> {
        self.activated.as_ref()
    }

    /// Read a value from the tab's key/value state.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.row.data.0.get(key) {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        self.row
            .data
            .0
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) {
        self.row.data.0.remove(key);
    }

    pub fn input_fields(&self) -> &[InputField] {
        &self.input_fields
    }

    pub fn current_input_field(&self) -> Option<&InputField> {
        let name = self.row.current_input_field_name.as_deref()?;
        self.input_fields.iter().find(|field| field.name == name)
    }

    pub fn select_input_field(&mut self, name: &str) -> Result<()> {
        if !self.input_fields.iter().any(|field| field.name == name) {
            return Err(GuiError::InputFieldNotFound(name.to_string()));
        }
        self.row.current_input_field_name = Some(name.to_string());
        Ok(())
    }

    /// Route raw text input to this tab. Needs a selected field.
    pub fn enable_input_processing(&mut self) -> Result<()> {
        if self.row.current_input_field_name.is_none() {
            return Err(GuiError::InputFieldNotSelected);
        }
        self.row.input_processing_enabled = true;
        Ok(())
    }

    pub fn disable_input_processing(&mut self) {
        self.row.input_processing_enabled = false;
    }

    pub fn enable_window_message_resending(&mut self, delete_previous: bool) {
        self.row.resend_window_message = true;
        self.row.delete_previous_window_message_before_resending = delete_previous;
    }

    pub fn disable_window_message_resending(&mut self) {
        self.row.resend_window_message = false;
    }

    pub fn enable_user_input_message_deletion(&mut self) {
        self.row.delete_user_input_message = true;
    }

    pub fn disable_user_input_message_deletion(&mut self) {
        self.row.delete_user_input_message = false;
    }

    /// Signal that cuts the current event short. Return it from a handler:
    /// the window is re-rendered as it stands and `alert` is shown.
    pub fn stop(&self, alert: Option<String>) -> GuiError {
        GuiError::StopProcessing { alert }
    }

    /// Switch the window to another tab once the handler returns.
    pub fn switch_tab(&mut self, name: impl Into<String>, save_current: bool, args: Value) {
        self.requests.push_back(WindowRequest::SwitchTab {
            name: name.into(),
            save_current,
            args,
        });
    }

    /// Close the window once the handler returns.
    pub fn close_window(&mut self) {
        self.requests.push_back(WindowRequest::Close);
    }

    pub(crate) fn next_request(&mut self) -> Option<WindowRequest> {
        self.requests.pop_front()
    }
}

fn restore_error(err: GuiError) -> GuiError {
    if err.is_reconstruction() {
        GuiError::RestoreFailed(format!(
            "Tab restore succeeded, but reconstruction failed: {}",
            err
        ))
    } else {
        err
    }
}

/// A tab kind bound to its live state.
pub struct Tab {
    core: TabCore,
    behavior: Arc<dyn TabBehavior>,
}

impl Tab {
    fn assemble(
        window: WindowRef,
        row: TabRecord,
        text: Text,
        keyboard: Keyboard,
        behavior: Arc<dyn TabBehavior>,
    ) -> Self {
        let core = TabCore {
            window,
            row,
            text,
            keyboard,
            input_fields: behavior.input_fields(),
            message_text: None,
            activated: None,
            requests: VecDeque::new(),
        };
        Self { core, behavior }
    }

    /// Create the tab rows at `index` and let the kind fill them.
    pub async fn build(
        ctx: &mut GuiContext<'_>,
        window: WindowRef,
        index: i64,
        behavior: Arc<dyn TabBehavior>,
        args: &Value,
    ) -> Result<Self> {
        let mut row = TabRecord::new(window.id, behavior.name(), index);
        rows::create_tab(ctx.conn, &mut row).await?;
        let text = Text::build(ctx, window.id, index, row.id).await?;
        let keyboard = Keyboard::new(behavior.layout());

        let mut tab = Self::assemble(window, row, text, keyboard, behavior);
        tab.behavior.build(&mut tab.core, ctx, args).await?;
        Ok(tab)
    }

    async fn load_row(
        ctx: &mut GuiContext<'_>,
        window: WindowRef,
        index: i64,
        behavior: &dyn TabBehavior,
    ) -> Result<Option<TabRecord>> {
        let row = rows::get_tab(ctx.conn, window.id, index).await?;
        match row {
            Some(row) if row.kind != behavior.name() => Err(GuiError::Reconstruction(format!(
                "Tab at {} is {}, expected {}",
                index,
                row.kind,
                behavior.name()
            ))),
            row => Ok(row),
        }
    }

    /// Rebuild the displayed tab from its rows and the live message.
    pub async fn reconstruct(
        ctx: &mut GuiContext<'_>,
        window: WindowRef,
        index: i64,
        behavior: Arc<dyn TabBehavior>,
        message_text: String,
        grid: InlineKeyboard,
    ) -> Result<Self> {
        let row = Self::load_row(ctx, window, index, behavior.as_ref())
            .await?
            .ok_or_else(|| GuiError::Reconstruction("Tab not found".to_string()))?;
        let text = Text::reconstruct(ctx, window.id, index, row.id).await?;
        let keyboard = Keyboard::reconstruct(ctx, window, grid, behavior.layout()).await?;

        let mut tab = Self::assemble(window, row, text, keyboard, behavior);
        tab.core.message_text = Some(message_text);
        Ok(tab)
    }

    /// Resume a suspended tab from its rows and parked keyboard.
    pub async fn restore(
        ctx: &mut GuiContext<'_>,
        window: WindowRef,
        index: i64,
        behavior: Arc<dyn TabBehavior>,
    ) -> Result<Self> {
        let row = Self::load_row(ctx, window, index, behavior.as_ref())
            .await
            .map_err(|e| GuiError::RestoreFailed(e.to_string()))?
            .ok_or_else(|| GuiError::RestoreFailed("Tab restore failed".to_string()))?;

        let text = Text::reconstruct(ctx, window.id, index, row.id)
            .await
            .map_err(restore_error)?;
        let keyboard = Keyboard::restore(ctx, window, index, behavior.layout())
            .await
            .map_err(restore_error)?;

        Ok(Self::assemble(window, row, text, keyboard, behavior))
    }

    pub fn name(&self) -> &str {
        self.behavior.name()
    }

    pub fn core(&self) -> &TabCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut TabCore {
        &mut self.core
    }

    pub fn behavior(&self) -> &Arc<dyn TabBehavior> {
        &self.behavior
    }

    /// Produce the message text and keyboard, persisting every row.
    pub async fn render(
        &mut self,
        ctx: &mut GuiContext<'_>,
    ) -> Result<(String, Option<InlineKeyboard>)> {
        let reuse = if self.behavior.rerender_text() {
            None
        } else {
            self.core.message_text.clone()
        };

        let text = match reuse {
            Some(text) => text,
            None => {
                let prompt = if self.core.row.input_processing_enabled {
                    self.core
                        .current_input_field()
                        .and_then(|field| field.prompt.clone())
                } else {
                    None
                };
                self.core.text.set_input_field_text(prompt);
                let data = self.behavior.text_data(&self.core);
                self.core.text.render(ctx, &data).await?
            }
        };

        let keyboard = self.core.keyboard.render(ctx, self.core.window).await?;
        rows::update_tab(ctx.conn, &self.core.row).await?;
        Ok((text, keyboard))
    }

    /// Deliver the tap carried by the current event to its button.
    ///
    /// A token that is not on this tab's keyboard is ignored.
    pub async fn handle_button_activation(&mut self, ctx: &mut GuiContext<'_>) -> Result<()> {
        let Some(data) = ctx.event.callback_data.clone() else {
            return Err(GuiError::InvalidArgument(
                "button activation outside a callback event".to_string(),
            ));
        };
        let Some((row, column)) = self.core.keyboard.position_of(&data) else {
            return Ok(());
        };

        let press = self.core.keyboard.activate(row, column);
        self.core.activated = self.core.keyboard.button_at(row, column).cloned();
        let result = match press {
            Some(press) => match press.callback.clone() {
                Some(callback) => {
                    self.behavior
                        .on_callback(&mut self.core, ctx, &callback, &press)
                        .await
                }
                None => Ok(()),
            },
            None => Ok(()),
        };
        self.core.activated = None;
        result
    }

    /// Deliver raw text to the selected input field.
    pub async fn process_input(&mut self, ctx: &mut GuiContext<'_>, text: &str) -> Result<()> {
        let field = self
            .core
            .row
            .current_input_field_name
            .clone()
            .ok_or(GuiError::InputFieldNotSelected)?;
        self.behavior
            .on_input(&mut self.core, ctx, &field, text)
            .await
    }

    /// Suspend: store the rows and park the keyboard in bridge rows.
    pub async fn save(&mut self, ctx: &mut GuiContext<'_>) -> Result<()> {
        self.core.text.save(ctx).await?;
        let index = self.core.index();
        self.core.keyboard.save(ctx, self.core.window, index).await?;
        rows::update_tab(ctx.conn, &self.core.row).await?;
        Ok(())
    }

    pub async fn destroy(&mut self, ctx: &mut GuiContext<'_>) -> Result<()> {
        rows::delete_tab(ctx.conn, self.core.row.id).await?;
        self.core.text.destroy(ctx).await?;
        self.core.keyboard.destroy(ctx).await?;
        Ok(())
    }
}
