//! Integration tests for the paginated and selection tabs.
//!
//!   cargo test -p chat-gui --test tabs

mod common;

use chat_gui::tabs::{format_utc_offset, NumberSelectionTab, SelectionHooks, TimeZoneSelectionTab};
use chat_gui::{
    async_trait, GuiContext, Owner, PageInfo, PageSource, Paginated, PaginatorMode, Registry,
    Result, TabBehavior, TabCore, WindowDescriptor,
};
use common::{labels, Harness};
use database::{ButtonRecord, ButtonTable};
use serde_json::{json, Value};

const CHAT: i64 = 200;
const USER: i64 = 9;

/// Ten pages of ten numbers.
struct Numbers;

#[async_trait]
impl TabBehavior for Numbers {
    fn name(&self) -> &str {
        "Numbers"
    }
}

#[async_trait]
impl PageSource for Numbers {
    async fn set_page(
        &self,
        tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
        page: u32,
    ) -> Result<PageInfo> {
        let first = (page - 1) * 10 + 1;
        tab.text
            .set_body(format!("Numbers {} to {}", first, first + 9));
        Ok(PageInfo {
            total_pages: Some(10),
            ..PageInfo::default()
        })
    }
}

/// An endless feed scrolled with previous/next buttons.
struct Feed;

#[async_trait]
impl TabBehavior for Feed {
    fn name(&self) -> &str {
        "Feed"
    }
}

#[async_trait]
impl PageSource for Feed {
    fn mode(&self) -> PaginatorMode {
        PaginatorMode::NoPages
    }

    async fn set_next_page(&self, tab: &mut TabCore, _ctx: &mut GuiContext<'_>) -> Result<PageInfo> {
        let position = tab.get::<i64>("position")?.unwrap_or(-1) + 1;
        self.show(tab, position)
    }

    async fn set_previous_page(
        &self,
        tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
    ) -> Result<PageInfo> {
        let position = tab.get::<i64>("position")?.unwrap_or_default() - 1;
        self.show(tab, position)
    }
}

impl Feed {
    fn show(&self, tab: &mut TabCore, position: i64) -> Result<PageInfo> {
        tab.set("position", position)?;
        tab.text.set_body(format!("Post #{}", position));
        Ok(PageInfo {
            total_pages: None,
            is_first_page: position == 0,
            is_last_page: position == 2,
        })
    }
}

struct Amount;

#[async_trait]
impl SelectionHooks for Amount {
    fn name(&self) -> &str {
        "Amount"
    }

    async fn on_done(&self, tab: &mut TabCore, _ctx: &mut GuiContext<'_>, _value: i64) -> Result<()> {
        tab.close_window();
        Ok(())
    }
}

struct TimeZone;

#[async_trait]
impl SelectionHooks for TimeZone {
    fn name(&self) -> &str {
        "TimeZone"
    }

    async fn on_done(&self, tab: &mut TabCore, _ctx: &mut GuiContext<'_>, value: i64) -> Result<()> {
        tab.text
            .set_header(format!("Saved {}", format_utc_offset(value)), true);
        Ok(())
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register_window(WindowDescriptor::new("ListWindow").tab(Paginated(Numbers)))
        .unwrap();
    registry
        .register_window(WindowDescriptor::new("FeedWindow").tab(Paginated(Feed)))
        .unwrap();
    registry
        .register_window(
            WindowDescriptor::new("AmountWindow").tab(NumberSelectionTab::new(Amount)),
        )
        .unwrap();
    registry
        .register_window(
            WindowDescriptor::new("TimeZoneWindow").tab(TimeZoneSelectionTab::new(TimeZone)),
        )
        .unwrap();
    registry
}

async fn open(harness: &Harness, name: &str, args: Value) -> i64 {
    harness
        .gui
        .open_window(name, CHAT, Owner::Anyone, None, &args)
        .await
        .unwrap()
}

mod pagination_tests {
    use super::*;

    #[tokio::test]
    async fn test_first_page() {
        let harness = Harness::new(registry()).await;
        open(&harness, "ListWindow", Value::Null).await;

        assert_eq!(harness.text(CHAT).await, "Numbers 1 to 10\n\nPage 1 / 10.");
        assert_eq!(harness.labels(CHAT).await, labels(&[&["2", "3", "4", "10"]]));
    }

    #[tokio::test]
    async fn test_open_on_middle_page() {
        let harness = Harness::new(registry()).await;
        open(&harness, "ListWindow", json!({ "page_number": 5 })).await;

        assert_eq!(harness.text(CHAT).await, "Numbers 41 to 50\n\nPage 5 / 10.");
        assert_eq!(
            harness.labels(CHAT).await,
            labels(&[&["6", "7", "8", "10"], &["1", "2", "3", "4"]])
        );
    }

    #[tokio::test]
    async fn test_navigate_to_last_page() {
        let harness = Harness::new(registry()).await;
        let window_id = open(&harness, "ListWindow", Value::Null).await;

        harness.press(CHAT, USER, "4").await.unwrap();
        assert_eq!(
            harness.labels(CHAT).await,
            labels(&[&["5", "6", "7", "10"], &["1", "2", "3"]])
        );

        harness.press(CHAT, USER, "10").await.unwrap();
        assert_eq!(harness.text(CHAT).await, "Numbers 91 to 100\n\nPage 10 / 10.");
        assert_eq!(harness.labels(CHAT).await, labels(&[&["1", "7", "8", "9"]]));

        // Old page buttons are gone from the store.
        let mut conn = harness.conn().await;
        let stored = database::button::count_buttons(&mut conn, ButtonTable::Simple, window_id)
            .await
            .unwrap();
        assert_eq!(stored, 4);
    }

    #[tokio::test]
    async fn test_scrolling_mode() {
        let harness = Harness::new(registry()).await;
        open(&harness, "FeedWindow", Value::Null).await;
        assert_eq!(harness.text(CHAT).await, "Post #0");
        assert_eq!(harness.labels(CHAT).await, labels(&[&[">"]]));

        harness.press(CHAT, USER, ">").await.unwrap();
        assert_eq!(harness.labels(CHAT).await, labels(&[&["<", ">"]]));

        harness.press(CHAT, USER, ">").await.unwrap();
        assert_eq!(harness.text(CHAT).await, "Post #2");
        assert_eq!(harness.labels(CHAT).await, labels(&[&["<"]]));

        harness.press(CHAT, USER, "<").await.unwrap();
        assert_eq!(harness.text(CHAT).await, "Post #1");
    }
}

mod number_selection_tests {
    use super::*;

    async fn value_buttons(harness: &Harness, window_id: i64) -> Vec<ButtonRecord> {
        let message = harness.transport.latest_message(CHAT).await.unwrap();
        let tokens: Vec<Vec<u8>> = message.button_grid()[0]
            .iter()
            .filter_map(|button| button.callback_data.clone())
            .collect();
        let mut conn = harness.conn().await;
        database::button::get_buttons_by_tokens(&mut conn, ButtonTable::Simple, window_id, &tokens)
            .await
            .unwrap()
    }

    fn arg_of(buttons: &[ButtonRecord], name: &str) -> Option<String> {
        buttons
            .iter()
            .find(|button| button.name.as_deref() == Some(name))
            .and_then(|button| button.arg.clone())
    }

    #[tokio::test]
    async fn test_step_shifts_value_and_neighbours() {
        let harness = Harness::new(registry()).await;
        let window_id = open(
            &harness,
            "AmountWindow",
            json!({ "initial_value": 5, "min_value": 0, "max_value": 7 }),
        )
        .await;
        assert_eq!(harness.text(CHAT).await, "5");
        assert_eq!(
            harness.labels(CHAT).await,
            labels(&[&["-1", "Reset", "+1"], &["<", "Done", ">"]])
        );

        harness.press(CHAT, USER, "+1").await.unwrap();
        assert_eq!(harness.text(CHAT).await, "6");
        let buttons = value_buttons(&harness, window_id).await;
        assert_eq!(arg_of(&buttons, "previous_value").as_deref(), Some("5"));
        assert_eq!(arg_of(&buttons, "next_value").as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn test_bounds_and_step_changes() {
        let harness = Harness::new(registry()).await;
        let window_id = open(
            &harness,
            "AmountWindow",
            json!({ "initial_value": 5, "min_value": 0, "max_value": 7 }),
        )
        .await;

        harness.press(CHAT, USER, "+1").await.unwrap();
        harness.press(CHAT, USER, "+1").await.unwrap();
        harness.press(CHAT, USER, "+1").await.unwrap();
        assert_eq!(harness.text(CHAT).await, "7");

        harness.press(CHAT, USER, ">").await.unwrap();
        assert_eq!(
            harness.labels(CHAT).await,
            labels(&[&["-10", "Reset", "+10"], &["<", "Done", ">"]])
        );
        let buttons = value_buttons(&harness, window_id).await;
        assert_eq!(arg_of(&buttons, "previous_value").as_deref(), Some("-3"));
        assert_eq!(arg_of(&buttons, "next_value").as_deref(), Some("17"));

        harness.press(CHAT, USER, "-10").await.unwrap();
        assert_eq!(harness.text(CHAT).await, "0");

        harness.press(CHAT, USER, "Reset").await.unwrap();
        assert_eq!(harness.text(CHAT).await, "5");

        harness.press(CHAT, USER, "<").await.unwrap();
        assert_eq!(harness.labels(CHAT).await[0], vec!["-1", "Reset", "+1"]);
    }

    #[tokio::test]
    async fn test_done_closes_window() {
        let harness = Harness::new(registry()).await;
        open(&harness, "AmountWindow", Value::Null).await;

        harness.press(CHAT, USER, "Done").await.unwrap();
        assert_eq!(harness.window_count(CHAT).await, 0);
        assert_eq!(harness.transport.message_count(CHAT).await, 0);
    }
}

mod time_zone_tests {
    use super::*;

    #[tokio::test]
    async fn test_select_page_and_done() {
        let harness = Harness::new(registry()).await;
        open(&harness, "TimeZoneWindow", json!({ "start_offset": 19800 })).await;

        assert_eq!(harness.text(CHAT).await, "UTC+05:30");
        assert_eq!(
            harness.labels(CHAT).await,
            labels(&[
                &["UTC+03:30", "UTC+04:00", "UTC+04:30"],
                &["UTC+05:00", "☑ UTC+05:30", "UTC+05:45"],
                &["UTC+06:00", "UTC+06:30", "UTC+07:00"],
                &["<", "Done", ">"],
            ])
        );

        harness.press(CHAT, USER, "UTC+04:00").await.unwrap();
        let grid = harness.labels(CHAT).await;
        assert_eq!(grid[0][1], "☑ UTC+04:00");
        assert_eq!(grid[1][1], "UTC+05:30");
        assert_eq!(harness.text(CHAT).await, "UTC+04:00");

        harness.press(CHAT, USER, ">").await.unwrap();
        let grid = harness.labels(CHAT).await;
        assert_eq!(grid[0], vec!["UTC+08:00", "UTC+08:45", "UTC+09:00"]);
        assert!(grid.iter().flatten().all(|label| !label.starts_with('☑')));

        harness.press(CHAT, USER, "Done").await.unwrap();
        let text = harness.text(CHAT).await;
        assert!(text.starts_with("Saved +04:00\n"), "{}", text);

        // The header was one-time.
        harness.press(CHAT, USER, "<").await.unwrap();
        assert_eq!(harness.text(CHAT).await, "UTC+04:00");
    }

    #[tokio::test]
    async fn test_paging_wraps_around() {
        let harness = Harness::new(registry()).await;
        open(&harness, "TimeZoneWindow", json!({ "start_offset": -43200 })).await;

        harness.press(CHAT, USER, "<").await.unwrap();
        let grid = harness.labels(CHAT).await;
        assert_eq!(grid[0][0], "UTC+09:00");
        assert_eq!(grid[2][2], "UTC+14:00");
    }
}
