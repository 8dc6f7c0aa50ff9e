//! Reusable tab kinds.

mod number_selection;
mod time_zone_selection;

pub use number_selection::NumberSelectionTab;
pub use time_zone_selection::{format_utc_offset, TimeZoneSelectionTab, TIME_ZONE_OFFSETS};

use async_trait::async_trait;
use serde_json::Value;

use crate::button::Button;
use crate::context::GuiContext;
use crate::error::{GuiError, Result};
use crate::tab::TabCore;

/// Application hooks of the selection tabs.
#[async_trait]
pub trait SelectionHooks: Send + Sync {
    /// Tab kind name.
    fn name(&self) -> &str;

    fn done_label(&self) -> &str {
        "Done"
    }

    /// Called once the tab is built, e.g. to set a header.
    async fn on_build(
        &self,
        _tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
        _args: &Value,
    ) -> Result<()> {
        Ok(())
    }

    /// Called whenever the selection changes.
    async fn on_value_selected(
        &self,
        _tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
        _value: i64,
    ) -> Result<()> {
        Ok(())
    }

    /// Called when the Done button is tapped.
    async fn on_done(&self, tab: &mut TabCore, ctx: &mut GuiContext<'_>, value: i64)
        -> Result<()>;
}

fn named<'a>(tab: &'a mut TabCore, name: &str) -> Result<&'a mut Button> {
    tab.keyboard
        .button_mut(name)
        .ok_or_else(|| GuiError::Reconstruction(format!("{} button is missing", name)))
}

fn required_arg(press: &crate::button::ButtonPress) -> Result<i64> {
    press
        .arg_as::<i64>()
        .ok_or_else(|| GuiError::InvalidArgument(format!("bad button argument {:?}", press.arg)))
}
