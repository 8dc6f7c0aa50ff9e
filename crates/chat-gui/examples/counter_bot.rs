//! Counter bot example driven by the in-memory transport.
//!
//! Opens a counter window and an amount picker, taps through them the way a
//! chat user would and prints every message the bot displays.
//!
//! Run with: cargo run -p chat-gui --example counter_bot
//!
//! Configuration via .env file or environment variables:
//!   SQLITE_PATH  - Window store (default: in-memory)
//!   RUST_LOG     - Log filter (default: info)

use std::env;
use std::sync::Arc;

use chat_gui::tabs::{NumberSelectionTab, SelectionHooks};
use chat_gui::{
    async_trait, Button, ButtonPress, Gui, GuiConfig, GuiContext, Owner, Registry, TabBehavior,
    TabCore, WindowDescriptor,
};
use database::Database;
use mock_transport::MemoryTransport;
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CHAT: i64 = 1;
const USER: i64 = 42;

struct Counter;

#[async_trait]
impl TabBehavior for Counter {
    fn name(&self) -> &str {
        "Counter"
    }

    async fn build(
        &self,
        tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
        _args: &Value,
    ) -> chat_gui::Result<()> {
        tab.set("count", 0)?;
        tab.text.set_header("Counter", false);
        tab.text.set_body("Count: {count}");
        tab.keyboard.add_row([
            Button::simple("-1").callback("add").arg(-1),
            Button::simple("+1").callback("add").arg(1),
        ])?;
        tab.keyboard
            .add_row([Button::simple("Close").callback("close")])
    }

    fn text_data(&self, tab: &TabCore) -> Vec<(String, String)> {
        let count: i64 = tab.get("count").ok().flatten().unwrap_or_default();
        vec![("count".to_string(), count.to_string())]
    }

    async fn on_callback(
        &self,
        tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
        callback: &str,
        press: &ButtonPress,
    ) -> chat_gui::Result<()> {
        match callback {
            "add" => {
                let count: i64 = tab.get("count")?.unwrap_or_default();
                tab.set("count", count + press.arg_as::<i64>().unwrap_or_default())
            }
            "close" => {
                tab.close_window();
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

struct Amount;

#[async_trait]
impl SelectionHooks for Amount {
    fn name(&self) -> &str {
        "Amount"
    }

    async fn on_done(
        &self,
        tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
        value: i64,
    ) -> chat_gui::Result<()> {
        info!("Amount picked: {}", value);
        tab.close_window();
        Ok(())
    }
}

async fn tap(
    gui: &Gui,
    transport: &MemoryTransport,
    label: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let message = transport
        .latest_message(CHAT)
        .await
        .ok_or("no message displayed")?;
    let query = transport
        .press(CHAT, message.id, USER, label)
        .await
        .ok_or_else(|| format!("no button labelled {}", label))?;
    gui.handle_callback_query(&query).await?;
    show(transport, label).await;
    Ok(())
}

async fn show(transport: &MemoryTransport, action: &str) {
    let Some(message) = transport.latest_message(CHAT).await else {
        println!("[{}] (no message)\n", action);
        return;
    };
    let buttons: Vec<String> = message
        .button_grid()
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| format!("[{}]", button.text))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();
    println!("[{}]\n{}\n{}\n", action, message.text, buttons.join("\n"));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (searches current dir and parents)
    let _ = dotenvy::dotenv();

    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = GuiConfig::from_env()?;
    if env::var("SQLITE_PATH").is_err() {
        config.sqlite_url = "sqlite::memory:".to_string();
    }

    let db = Database::connect(&config.sqlite_url).await?;
    db.migrate().await?;

    let mut registry = Registry::new();
    registry.register_window(WindowDescriptor::new("CounterWindow").tab(Counter))?;
    registry.register_window(
        WindowDescriptor::new("AmountWindow").tab(NumberSelectionTab::new(Amount)),
    )?;
    println!("Window kinds: {:?}", registry.window_names());

    let transport = Arc::new(MemoryTransport::new());
    let gui = Gui::new(db, transport.clone(), registry, config);

    gui.open_window("CounterWindow", CHAT, Owner::User(USER), None, &Value::Null)
        .await?;
    show(&transport, "open").await;
    for label in ["+1", "+1", "-1"] {
        tap(&gui, &transport, label).await?;
    }
    tap(&gui, &transport, "Close").await?;

    gui.open_window(
        "AmountWindow",
        CHAT,
        Owner::User(USER),
        None,
        &json!({ "initial_value": 10, "min_value": 0, "max_value": 100 }),
    )
    .await?;
    show(&transport, "open").await;
    for label in [">", "+10", "+10", "<", "-1", "Done"] {
        tap(&gui, &transport, label).await?;
    }

    Ok(())
}
