//! Windows: persistent sessions bound to one chat message.

use std::fmt;
use std::sync::Arc;

use database::{window as rows, WindowRecord};
use serde_json::Value;
use tracing::{debug, info, warn};
use transport_core::{ChatId, IncomingMessage, Message, MessageOptions, TransportError};

use crate::context::{GuiContext, Owner, WindowRef, ANONYMOUS, ANYONE};
use crate::error::{GuiError, Result};
use crate::tab::{Tab, TabBehavior, WindowRequest};
use crate::token::{type_tag, TypeTag};

/// A window kind: its name, its tabs and how its message is sent.
pub struct WindowDescriptor {
    name: String,
    tag: TypeTag,
    tabs: Vec<Arc<dyn TabBehavior>>,
    resend_after_input: Option<bool>,
    send_options: MessageOptions,
    edit_options: MessageOptions,
}

impl WindowDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            tag: type_tag(&name),
            name,
            tabs: Vec::new(),
            resend_after_input: None,
            send_options: MessageOptions::default(),
            edit_options: MessageOptions::default(),
        }
    }

    /// Append a tab kind. The first tab is opened by default.
    pub fn tab(mut self, tab: impl TabBehavior + 'static) -> Self {
        self.tabs.push(Arc::new(tab));
        self
    }

    pub fn shared_tab(mut self, tab: Arc<dyn TabBehavior>) -> Self {
        self.tabs.push(tab);
        self
    }

    /// Whether the message is sent anew after text input was processed.
    /// Defaults to the dispatcher setting.
    pub fn resend_after_input(mut self, resend: bool) -> Self {
        self.resend_after_input = Some(resend);
        self
    }

    pub fn send_options(mut self, options: MessageOptions) -> Self {
        self.send_options = options;
        self
    }

    pub fn edit_options(mut self, options: MessageOptions) -> Self {
        self.edit_options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn tabs(&self) -> &[Arc<dyn TabBehavior>] {
        &self.tabs
    }

    pub fn find_tab_index(&self, name: &str) -> Result<usize> {
        self.tabs
            .iter()
            .position(|tab| tab.name() == name)
            .ok_or_else(|| GuiError::TabNotFound(name.to_string()))
    }

    fn tab_at(&self, index: i64) -> Result<Arc<dyn TabBehavior>> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.tabs.get(i))
            .cloned()
            .ok_or_else(|| {
                GuiError::Reconstruction(format!("{} has no tab at {}", self.name, index))
            })
    }
}

impl fmt::Debug for WindowDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowDescriptor")
            .field("name", &self.name)
            .field("tabs", &self.tabs.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Lifecycle of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Row exists, nothing displayed yet.
    Building,
    /// Displayed in a message.
    Active,
    Destroyed,
}

/// A live window during one event.
pub struct Window {
    row: WindowRecord,
    descriptor: Arc<WindowDescriptor>,
    current_tab: Tab,
    processing_input: bool,
    state: WindowState,
}

impl Window {
    /// Create a window and build its initial tab (`tab`, or the first one).
    pub async fn build(
        ctx: &mut GuiContext<'_>,
        descriptor: Arc<WindowDescriptor>,
        chat_id: ChatId,
        owner: Owner,
        tab: Option<&str>,
        args: &Value,
    ) -> Result<Self> {
        let index = match tab {
            Some(name) => descriptor.find_tab_index(name)?,
            None => 0,
        };
        let index = index as i64;
        let behavior = descriptor.tab_at(index)?;

        let mut row = WindowRecord::new(
            chat_id,
            owner.to_stored(),
            descriptor.tag().to_vec(),
            index,
        );
        rows::create_window(ctx.conn, &mut row).await?;
        let window_ref = WindowRef {
            id: row.id,
            chat_id,
            tag: descriptor.tag(),
        };
        let current_tab = Tab::build(ctx, window_ref, index, behavior, args).await?;
        info!(
            "Built window {} ({}) in chat {}",
            row.id,
            descriptor.name(),
            chat_id
        );

        let mut window = Self {
            row,
            descriptor,
            current_tab,
            processing_input: false,
            state: WindowState::Building,
        };
        window.apply_requests(ctx).await?;
        Ok(window)
    }

    /// Rebuild a displayed window and check it against the live message.
    ///
    /// `message` is the message the event came from, if the event carries
    /// it; otherwise it is fetched. `row` skips the window lookup.
    pub async fn reconstruct(
        ctx: &mut GuiContext<'_>,
        descriptor: Arc<WindowDescriptor>,
        chat_id: ChatId,
        window_id: i64,
        message: Option<Message>,
        row: Option<WindowRecord>,
    ) -> Result<Self> {
        let row = match row {
            Some(row) => row,
            None => rows::get_window(ctx.conn, window_id, chat_id)
                .await?
                .ok_or_else(|| GuiError::NoWindow("Window not found".to_string()))?,
        };
        if row.kind.as_slice() != descriptor.tag().as_slice() {
            return Err(GuiError::Reconstruction(format!(
                "Window {} is not a {}",
                row.id,
                descriptor.name()
            )));
        }

        let actor = resolve_actor(ctx, &row).await?;
        if row.user_id != ANYONE && row.user_id != actor {
            debug!(
                "User {} may not use window {} owned by {}",
                actor, row.id, row.user_id
            );
            return Err(GuiError::Permission);
        }

        let message = match message {
            Some(message) => message,
            None => fetch_message(ctx, &row).await?,
        };
        if row.message_id != Some(message.id) {
            return Err(GuiError::NoWindow(
                "Message id does not match the id in the database".to_string(),
            ));
        }

        let window_ref = WindowRef {
            id: row.id,
            chat_id: row.chat_id,
            tag: descriptor.tag(),
        };
        let behavior = descriptor.tab_at(row.current_tab_index)?;
        let grid = message.button_grid();
        let current_tab = Tab::reconstruct(
            ctx,
            window_ref,
            row.current_tab_index,
            behavior,
            message.text,
            grid,
        )
        .await?;

        Ok(Self {
            row,
            descriptor,
            current_tab,
            processing_input: false,
            state: WindowState::Active,
        })
    }

    pub fn id(&self) -> i64 {
        self.row.id
    }

    pub fn chat_id(&self) -> ChatId {
        self.row.chat_id
    }

    pub fn owner(&self) -> Owner {
        Owner::from_stored(self.row.user_id)
    }

    pub fn row(&self) -> &WindowRecord {
        &self.row
    }

    pub fn descriptor(&self) -> &Arc<WindowDescriptor> {
        &self.descriptor
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn message_id(&self) -> Option<i64> {
        self.row.message_id
    }

    /// Positions of suspended tabs, oldest first.
    pub fn saved_tab_indexes(&self) -> &[i64] {
        &self.row.saved_tab_indexes.0
    }

    pub fn current_tab(&self) -> &Tab {
        &self.current_tab
    }

    pub fn current_tab_mut(&mut self) -> &mut Tab {
        &mut self.current_tab
    }

    pub fn window_ref(&self) -> WindowRef {
        WindowRef {
            id: self.row.id,
            chat_id: self.row.chat_id,
            tag: self.descriptor.tag(),
        }
    }

    /// Display the current tab, editing the message in place or sending a
    /// new one.
    pub async fn render(&mut self, ctx: &mut GuiContext<'_>) -> Result<()> {
        if self.state == WindowState::Destroyed {
            return Ok(());
        }

        let (text, keyboard) = self.current_tab.render(ctx).await?;
        let tab_row = self.current_tab.core().row();
        self.row.input_required = tab_row.input_processing_enabled;

        let (resend, delete_previous) = if tab_row.resend_window_message {
            (
                true,
                tab_row.delete_previous_window_message_before_resending,
            )
        } else {
            let after_input = self
                .descriptor
                .resend_after_input
                .unwrap_or(ctx.resend_after_input);
            (self.processing_input && after_input, true)
        };

        if resend {
            if let Some(previous) = self.row.message_id.take() {
                if delete_previous {
                    self.delete_message(ctx, previous).await;
                }
            }
        }

        match self.row.message_id {
            None => {
                let sent = ctx
                    .transport
                    .send_message(
                        self.row.chat_id,
                        &text,
                        keyboard.as_ref(),
                        &self.descriptor.send_options,
                    )
                    .await;
                match sent {
                    Ok(message) => self.row.message_id = Some(message.id),
                    Err(TransportError::ChatUnavailable(reason)) => {
                        warn!(
                            "Chat {} unavailable, destroying window {}: {}",
                            self.row.chat_id, self.row.id, reason
                        );
                        return self.destroy(ctx).await;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Some(message_id) => {
                let edited = ctx
                    .transport
                    .edit_message_text(
                        self.row.chat_id,
                        message_id,
                        &text,
                        keyboard.as_ref(),
                        &self.descriptor.edit_options,
                    )
                    .await;
                match edited {
                    Ok(()) | Err(TransportError::NotModified) => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        rows::update_window(ctx.conn, &self.row).await?;
        self.state = WindowState::Active;
        Ok(())
    }

    /// Delete every row of the window, suspended tabs included.
    pub async fn destroy(&mut self, ctx: &mut GuiContext<'_>) -> Result<()> {
        if self.state == WindowState::Destroyed {
            return Ok(());
        }

        self.current_tab.destroy(ctx).await?;
        let window_ref = self.window_ref();
        for index in std::mem::take(&mut self.row.saved_tab_indexes.0) {
            let behavior = self.descriptor.tab_at(index)?;
            let mut tab = Tab::restore(ctx, window_ref, index, behavior).await?;
            tab.destroy(ctx).await?;
        }

        rows::delete_window(ctx.conn, self.row.id).await?;
        self.state = WindowState::Destroyed;
        info!("Destroyed window {} in chat {}", self.row.id, self.row.chat_id);
        Ok(())
    }

    /// Delete the displayed message and destroy the window.
    pub async fn close(&mut self, ctx: &mut GuiContext<'_>) -> Result<()> {
        if let Some(message_id) = self.row.message_id.take() {
            self.delete_message(ctx, message_id).await;
        }
        self.destroy(ctx).await
    }

    /// Make another tab current.
    ///
    /// The current tab is destroyed, or suspended when `save_current` is
    /// set. A suspended target is resumed, any other target is built with
    /// `args`.
    pub async fn switch_tab(
        &mut self,
        ctx: &mut GuiContext<'_>,
        name: &str,
        save_current: bool,
        args: &Value,
    ) -> Result<()> {
        let index = self.descriptor.find_tab_index(name)? as i64;
        if index == self.row.current_tab_index {
            return Err(GuiError::TabAlreadyActive(index as usize));
        }

        if save_current {
            self.current_tab.save(ctx).await?;
            self.row
                .saved_tab_indexes
                .0
                .push(self.row.current_tab_index);
        } else {
            self.current_tab.destroy(ctx).await?;
        }

        self.row.current_tab_index = index;
        let behavior = self.descriptor.tab_at(index)?;
        let window_ref = self.window_ref();
        let saved = &mut self.row.saved_tab_indexes.0;
        if let Some(position) = saved.iter().position(|i| *i == index) {
            saved.remove(position);
            self.current_tab = Tab::restore(ctx, window_ref, index, behavior).await?;
        } else {
            self.current_tab = Tab::build(ctx, window_ref, index, behavior, args).await?;
        }

        info!("Window {} switched to tab {}", self.row.id, name);
        Ok(())
    }

    /// Deliver the current callback event to the current tab.
    pub async fn handle_button_activation(&mut self, ctx: &mut GuiContext<'_>) -> Result<()> {
        let result = self.current_tab.handle_button_activation(ctx).await;
        self.finish_handler(ctx, result).await
    }

    /// Deliver a user's text message to the current tab.
    pub async fn process_input(
        &mut self,
        ctx: &mut GuiContext<'_>,
        message: &IncomingMessage,
    ) -> Result<()> {
        self.processing_input = true;
        // The handler may switch tabs, so read the flag first.
        let delete_input = self
            .current_tab
            .core()
            .row()
            .delete_user_input_message;

        let result = self.current_tab.process_input(ctx, &message.text).await;

        if delete_input {
            if let Err(e) = ctx
                .transport
                .delete_messages(message.chat_id, &[message.id])
                .await
            {
                if !e.is_benign() && result.is_ok() {
                    return Err(e.into());
                }
                warn!("Failed to delete input message {}: {}", message.id, e);
            }
        }

        self.finish_handler(ctx, result).await
    }

    async fn finish_handler(&mut self, ctx: &mut GuiContext<'_>, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => self.apply_requests(ctx).await,
            Err(e) if e.is_stop() => {
                self.apply_requests(ctx).await?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn apply_requests(&mut self, ctx: &mut GuiContext<'_>) -> Result<()> {
        while let Some(request) = self.current_tab.core_mut().next_request() {
            match request {
                WindowRequest::SwitchTab {
                    name,
                    save_current,
                    args,
                } => self.switch_tab(ctx, &name, save_current, &args).await?,
                WindowRequest::Close => return self.close(ctx).await,
            }
        }
        Ok(())
    }

    async fn delete_message(&self, ctx: &mut GuiContext<'_>, message_id: i64) {
        if let Err(e) = ctx
            .transport
            .delete_messages(self.row.chat_id, &[message_id])
            .await
        {
            warn!(
                "Failed to delete message {} of window {}: {}",
                message_id, self.row.id, e
            );
        }
    }
}

/// Identity the event acts as. A sender of a window owned by the anonymous
/// sentinel is checked against the chat membership: anonymous admins and
/// non-participants act as anonymous.
async fn resolve_actor(ctx: &mut GuiContext<'_>, row: &WindowRecord) -> Result<i64> {
    let Some(user_id) = ctx.event.user_id else {
        return Ok(ANONYMOUS);
    };
    if row.user_id != ANONYMOUS || !ctx.event.is_callback() {
        return Ok(user_id);
    }

    match ctx.transport.get_chat_member(row.chat_id, user_id).await {
        Ok(member) if member.is_anonymous => Ok(ANONYMOUS),
        Ok(_) => Ok(user_id),
        Err(TransportError::NotParticipant) => Ok(ANONYMOUS),
        Err(e) => Err(e.into()),
    }
}

/// Fetch the displayed message of a window. A vanished message purges the
/// window.
async fn fetch_message(ctx: &mut GuiContext<'_>, row: &WindowRecord) -> Result<Message> {
    let fetched = match row.message_id {
        Some(message_id) => match ctx.transport.get_message(row.chat_id, message_id).await {
            Ok(message) if !message.empty => Some(message),
            Ok(_) | Err(TransportError::MessageNotFound) => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };

    match fetched {
        Some(message) => Ok(message),
        None => {
            rows::delete_window(ctx.conn, row.id).await?;
            info!("Purged window {}: message not found", row.id);
            Err(GuiError::NoWindow("Message not found".to_string()))
        }
    }
}
