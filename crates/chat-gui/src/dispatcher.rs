//! Routes inbound events to windows.
//!
//! Every event runs in one store transaction. It is committed when the
//! handler succeeds or stops early, and when the window turned out to be
//! gone so that its purge is kept. Any other failure rolls it back.

use std::sync::Arc;

use database::{window as rows, Database};
use serde_json::Value;
use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::{debug, error, info, warn};
use transport_core::{CallbackQuery, ChatId, IncomingMessage, MessageOptions, Transport};

use crate::config::GuiConfig;
use crate::context::{EventScope, GuiContext, Owner, ANYONE};
use crate::error::{GuiError, Result};
use crate::registry::Registry;
use crate::token::{has_signature, Token, TypeTag};
use crate::window::Window;

/// Whether an event was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    /// Not meant for any window; other handlers may take it.
    Ignored,
}

/// The window dispatcher.
pub struct Gui {
    db: Database,
    transport: Arc<dyn Transport>,
    registry: Arc<Registry>,
    config: GuiConfig,
}

impl Gui {
    pub fn new(
        db: Database,
        transport: Arc<dyn Transport>,
        registry: Registry,
        config: GuiConfig,
    ) -> Self {
        Self {
            db,
            transport,
            registry: Arc::new(registry),
            config,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    /// Build a context for work outside the dispatcher's own handlers.
    pub fn context<'a>(
        &'a self,
        conn: &'a mut SqliteConnection,
        event: EventScope,
    ) -> GuiContext<'a> {
        let mut ctx = GuiContext::new(conn, self.transport.as_ref(), &self.registry, event);
        ctx.resend_after_input = self.config.resend_after_input;
        ctx
    }

    /// Build, render and store a new window. Returns its id.
    pub async fn open_window(
        &self,
        name: &str,
        chat_id: ChatId,
        owner: Owner,
        tab: Option<&str>,
        args: &Value,
    ) -> Result<i64> {
        let descriptor = self
            .registry
            .window_by_name(name)
            .cloned()
            .ok_or_else(|| GuiError::InvalidArgument(format!("unknown window {}", name)))?;

        let mut tx = self.db.begin().await?;
        let result = async {
            let mut ctx = self.context(&mut tx, EventScope::default());
            let mut window = Window::build(&mut ctx, descriptor, chat_id, owner, tab, args).await?;
            window.render(&mut ctx).await?;
            Ok::<_, GuiError>(window.id())
        }
        .await;

        match result {
            Ok(id) => {
                tx.commit().await?;
                info!("Opened window {} ({}) in chat {}", id, name, chat_id);
                Ok(id)
            }
            Err(e) => {
                rollback(tx).await;
                Err(e)
            }
        }
    }

    /// Handle a button tap.
    ///
    /// Payloads without the token signature are [`Dispatch::Ignored`].
    /// Every other query is answered exactly once.
    pub async fn handle_callback_query(&self, query: &CallbackQuery) -> Result<Dispatch> {
        if !has_signature(&query.data) {
            return Ok(Dispatch::Ignored);
        }

        let mut tx = self.db.begin().await?;
        let result = self.process_callback(&mut tx, query).await;

        let (notice, outcome) = match result {
            Ok(alert) => match tx.commit().await {
                Ok(()) => (alert, Ok(Dispatch::Handled)),
                Err(e) => {
                    error!("Failed to commit callback {}: {}", query.id, e);
                    (Some(self.config.failure_notice.clone()), Err(e.into()))
                }
            },
            Err(GuiError::Permission) => {
                rollback(tx).await;
                (
                    Some(self.config.permission_notice.clone()),
                    Ok(Dispatch::Handled),
                )
            }
            Err(e) if e.is_reconstruction() => {
                debug!("Stale keyboard in chat {}: {}", query.chat_id, e);
                if matches!(e, GuiError::NoWindow(_)) {
                    if let Err(e) = tx.commit().await {
                        warn!("Failed to commit window purge: {}", e);
                    }
                } else {
                    rollback(tx).await;
                }
                (Some(self.config.stale_notice.clone()), Ok(Dispatch::Handled))
            }
            Err(e) => {
                error!("Failed to handle callback {}: {}", query.id, e);
                rollback(tx).await;
                (Some(self.config.failure_notice.clone()), Err(e))
            }
        };

        let show_alert = notice.is_some();
        if let Err(e) = self
            .transport
            .answer_event(&query.id, notice.as_deref(), show_alert)
            .await
        {
            warn!("Failed to answer callback {}: {}", query.id, e);
        }
        outcome
    }

    async fn process_callback(
        &self,
        conn: &mut SqliteConnection,
        query: &CallbackQuery,
    ) -> Result<Option<String>> {
        let token = Token::parse(&query.data)?;
        let descriptor = self
            .registry
            .window(token.window_tag())
            .cloned()
            .ok_or_else(|| GuiError::NoWindow("Unknown window kind".to_string()))?;

        let mut ctx = self.context(conn, EventScope::callback(query.user_id, query.data.clone()));
        let mut window = Window::reconstruct(
            &mut ctx,
            descriptor,
            query.chat_id,
            token.window_id(),
            Some(query.message.clone()),
            None,
        )
        .await?;

        let alert = match window.handle_button_activation(&mut ctx).await {
            Ok(()) => None,
            Err(GuiError::StopProcessing { alert }) => alert,
            Err(e) => return Err(e),
        };
        window.render(&mut ctx).await?;
        Ok(alert)
    }

    /// Route a text message to the newest window in the chat waiting for
    /// input from its sender.
    pub async fn handle_message(&self, message: &IncomingMessage) -> Result<Dispatch> {
        let mut tx = self.db.begin().await?;
        match self.process_message(&mut tx, message).await {
            Ok(dispatch) => {
                tx.commit().await?;
                Ok(dispatch)
            }
            Err(e) => {
                error!("Failed to process input in chat {}: {}", message.chat_id, e);
                rollback(tx).await;
                if let Err(send_err) = self
                    .transport
                    .send_message(
                        message.chat_id,
                        &self.config.failure_notice,
                        None,
                        &MessageOptions::default(),
                    )
                    .await
                {
                    warn!("Failed to send failure notice: {}", send_err);
                }
                Err(e)
            }
        }
    }

    async fn process_message(
        &self,
        conn: &mut SqliteConnection,
        message: &IncomingMessage,
    ) -> Result<Dispatch> {
        let actor = Owner::actor(message.user_id).to_stored();
        let Some(row) = rows::find_input_window(&mut *conn, message.chat_id, &[ANYONE, actor]).await?
        else {
            return Ok(Dispatch::Ignored);
        };

        let tag: Option<TypeTag> = row.kind.as_slice().try_into().ok();
        let Some(descriptor) = tag.and_then(|tag| self.registry.window(tag)).cloned() else {
            warn!("Window {} has an unregistered kind", row.id);
            return Ok(Dispatch::Ignored);
        };

        let mut ctx = self.context(conn, EventScope::message(message.user_id));
        let window_id = row.id;
        let reconstructed = Window::reconstruct(
            &mut ctx,
            descriptor,
            message.chat_id,
            window_id,
            None,
            Some(row),
        )
        .await;
        let mut window = match reconstructed {
            Ok(window) => window,
            Err(e) if e.is_reconstruction() => {
                debug!("Input window {} not reconstructed: {}", window_id, e);
                return Ok(Dispatch::Ignored);
            }
            Err(e) => return Err(e),
        };

        match window.process_input(&mut ctx, message).await {
            Ok(()) | Err(GuiError::StopProcessing { .. }) => {}
            Err(e) => return Err(e),
        }
        window.render(&mut ctx).await?;
        Ok(Dispatch::Handled)
    }
}

async fn rollback(tx: Transaction<'static, Sqlite>) {
    if let Err(e) = tx.rollback().await {
        warn!("Failed to roll back: {}", e);
    }
}
