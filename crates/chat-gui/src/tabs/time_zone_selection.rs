//! Pick a UTC offset from a paged 3-wide grid.
//!
//! Build argument: `start_offset` in seconds (default 0). The page holding
//! it is shown first; paging wraps around both ends.

use async_trait::async_trait;
use serde_json::Value;

use super::{required_arg, SelectionHooks};
use crate::button::{Button, ButtonPress};
use crate::context::GuiContext;
use crate::error::{GuiError, Result};
use crate::keyboard::KeyboardLayout;
use crate::tab::{TabBehavior, TabCore};

/// Offsets shown per page.
pub const PAGE_SIZE: usize = 9;

const SELECTED_OFFSET: &str = "selected_time_zone_offset";
const TIME_ZONE_BUTTON: &str = "time_zone_button";

/// UTC offsets in use, in seconds.
pub const TIME_ZONE_OFFSETS: [i64; 38] = [
    -43200, -39600, -36000, -34200, -32400, -28800, -25200, -21600, -18000, -14400, -12600,
    -10800, -7200, -3600, 0, 3600, 7200, 10800, 12600, 14400, 16200, 18000, 19800, 20700, 21600,
    23400, 25200, 28800, 31500, 32400, 34200, 36000, 37800, 39600, 43200, 45900, 46800, 50400,
];

/// Format an offset in seconds as `±HH:MM`.
pub fn format_utc_offset(offset: i64) -> String {
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.abs();
    format!("{}{:02}:{:02}", sign, offset / 3600, offset % 3600 / 60)
}

fn label(offset: i64) -> String {
    format!("UTC{}", format_utc_offset(offset))
}

/// Start of the page holding `offset`; unknown offsets map to the first page.
fn page_start_of(offset: i64) -> usize {
    let index = TIME_ZONE_OFFSETS
        .iter()
        .position(|o| *o == offset)
        .unwrap_or(0);
    index / PAGE_SIZE * PAGE_SIZE
}

/// Offsets on the page starting at `start`, wrapping around.
fn page(start: usize) -> Vec<i64> {
    (0..PAGE_SIZE)
        .map(|i| TIME_ZONE_OFFSETS[(start + i) % TIME_ZONE_OFFSETS.len()])
        .collect()
}

fn neighbours(start: usize) -> (usize, usize) {
    let len = TIME_ZONE_OFFSETS.len();
    ((start + len - PAGE_SIZE % len) % len, (start + PAGE_SIZE) % len)
}

pub struct TimeZoneSelectionTab<H> {
    hooks: H,
}

impl<H: SelectionHooks> TimeZoneSelectionTab<H> {
    pub fn new(hooks: H) -> Self {
        Self { hooks }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Currently selected offset in seconds.
    pub fn selected_offset(tab: &TabCore) -> Result<i64> {
        Ok(tab.get(SELECTED_OFFSET)?.unwrap_or_default())
    }

    async fn set_page(
        &self,
        tab: &mut TabCore,
        ctx: &mut GuiContext<'_>,
        start: usize,
    ) -> Result<()> {
        tab.keyboard.clear(ctx).await?;
        let selected = Self::selected_offset(tab)?;
        for offset in page(start) {
            tab.keyboard.add_button(
                Button::single_select(label(offset))
                    .name(TIME_ZONE_BUTTON)
                    .callback("on_time_zone_selected")
                    .arg(offset)
                    .checked(offset == selected),
            );
        }

        let (previous, next) = neighbours(start);
        tab.keyboard.add_button(
            Button::simple("<")
                .callback("on_change_page")
                .arg(previous),
        );
        tab.keyboard.add_button(
            Button::simple(self.hooks.done_label())
                .name("done")
                .callback("on_done_btn"),
        );
        tab.keyboard
            .add_button(Button::simple(">").callback("on_change_page").arg(next));
        Ok(())
    }
}

#[async_trait]
impl<H: SelectionHooks> TabBehavior for TimeZoneSelectionTab<H> {
    fn name(&self) -> &str {
        self.hooks.name()
    }

    fn layout(&self) -> KeyboardLayout {
        KeyboardLayout::Grid { width: 3 }
    }

    async fn build(&self, tab: &mut TabCore, ctx: &mut GuiContext<'_>, args: &Value) -> Result<()> {
        let start_offset = args
            .get("start_offset")
            .and_then(Value::as_i64)
            .unwrap_or_default();
        tab.set(SELECTED_OFFSET, start_offset)?;
        tab.text.set_body("{selected_time_zone}");
        self.set_page(tab, ctx, page_start_of(start_offset)).await?;
        self.hooks.on_build(tab, ctx, args).await
    }

    fn text_data(&self, tab: &TabCore) -> Vec<(String, String)> {
        let offset = Self::selected_offset(tab).unwrap_or_default();
        vec![("selected_time_zone".to_string(), label(offset))]
    }

    async fn on_callback(
        &self,
        tab: &mut TabCore,
        ctx: &mut GuiContext<'_>,
        callback: &str,
        press: &ButtonPress,
    ) -> Result<()> {
        match callback {
            "on_time_zone_selected" => {
                let offset = required_arg(press)?;
                tab.set(SELECTED_OFFSET, offset)?;
                self.hooks.on_value_selected(tab, ctx, offset).await
            }
            "on_change_page" => {
                let start = usize::try_from(required_arg(press)?)
                    .ok()
                    .filter(|start| *start < TIME_ZONE_OFFSETS.len())
                    .ok_or_else(|| {
                        GuiError::InvalidArgument(format!("bad page start {:?}", press.arg))
                    })?;
                self.set_page(tab, ctx, start).await
            }
            "on_done_btn" => {
                let offset = Self::selected_offset(tab)?;
                self.hooks.on_done(tab, ctx, offset).await
            }
            _ => Err(GuiError::UnknownCallback {
                tab: self.name().to_string(),
                callback: callback.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_utc_offset() {
        assert_eq!(format_utc_offset(0), "+00:00");
        assert_eq!(format_utc_offset(19800), "+05:30");
        assert_eq!(format_utc_offset(20700), "+05:45");
        assert_eq!(format_utc_offset(-34200), "-09:30");
        assert_eq!(label(-43200), "UTC-12:00");
    }

    #[test]
    fn test_offsets_sorted_and_unique() {
        assert!(TIME_ZONE_OFFSETS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_page_start_of() {
        assert_eq!(page_start_of(0), 9);
        assert_eq!(page_start_of(-43200), 0);
        assert_eq!(page_start_of(50400), 36);
        assert_eq!(page_start_of(12345), 0);
    }

    #[test]
    fn test_pages_wrap_around() {
        let last = page(36);
        assert_eq!(last.len(), PAGE_SIZE);
        assert_eq!(&last[..2], &[46800, 50400]);
        assert_eq!(last[2], -43200);

        assert_eq!(neighbours(0), (29, 9));
        assert_eq!(neighbours(36), (27, 7));
        assert_eq!(neighbours(7), (36, 16));
    }
}
