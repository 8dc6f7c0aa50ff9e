//! Pick an integer with -step/+step buttons and an adjustable step.
//!
//! ```text
//! [-step] [Reset] [+step]
//! [  <  ] [ Done] [  >  ]
//! ```
//!
//! Build arguments: `initial_value` (default 0), `min_value`, `max_value`,
//! `step` (default 1).

use async_trait::async_trait;
use serde_json::Value;

use super::{named, required_arg, SelectionHooks};
use crate::button::{Button, ButtonPress};
use crate::context::GuiContext;
use crate::error::{GuiError, Result};
use crate::tab::{TabBehavior, TabCore};

const INITIAL_VALUE: &str = "initial_value";
const MIN_VALUE: &str = "min_value";
const MAX_VALUE: &str = "max_value";
const SELECTED_VALUE: &str = "selected_value";
const STEP: &str = "step";

const PREVIOUS_VALUE_BUTTON: &str = "previous_value";
const NEXT_VALUE_BUTTON: &str = "next_value";
const DECREASE_STEP_BUTTON: &str = "decrease_step";
const INCREASE_STEP_BUTTON: &str = "increase_step";

pub struct NumberSelectionTab<H> {
    hooks: H,
}

impl<H: SelectionHooks> NumberSelectionTab<H> {
    pub const MAX_STEP: i64 = 10_000_000_000;

    pub fn new(hooks: H) -> Self {
        Self { hooks }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Currently selected value.
    pub fn selected_value(tab: &TabCore) -> Result<i64> {
        Ok(tab.get(SELECTED_VALUE)?.unwrap_or_default())
    }

    fn step(tab: &TabCore) -> Result<i64> {
        Ok(tab.get(STEP)?.unwrap_or(1))
    }

    fn clamp(tab: &TabCore, value: i64) -> Result<i64> {
        let mut value = value;
        if let Some(min) = tab.get::<i64>(MIN_VALUE)? {
            value = value.max(min);
        }
        if let Some(max) = tab.get::<i64>(MAX_VALUE)? {
            value = value.min(max);
        }
        Ok(value)
    }

    fn shift_value_buttons(tab: &mut TabCore, value: i64, step: i64) -> Result<()> {
        named(tab, PREVIOUS_VALUE_BUTTON)?.set_arg(value.saturating_sub(step));
        named(tab, NEXT_VALUE_BUTTON)?.set_arg(value.saturating_add(step));
        Ok(())
    }

    async fn select(&self, tab: &mut TabCore, ctx: &mut GuiContext<'_>, value: i64) -> Result<()> {
        let value = Self::clamp(tab, value)?;
        if value == Self::selected_value(tab)? {
            return Ok(());
        }
        tab.set(SELECTED_VALUE, value)?;
        let step = Self::step(tab)?;
        Self::shift_value_buttons(tab, value, step)?;
        self.hooks.on_value_selected(tab, ctx, value).await
    }

    fn set_step(tab: &mut TabCore, step: i64) -> Result<()> {
        let step = step.clamp(1, Self::MAX_STEP);
        tab.set(STEP, step)?;
        named(tab, DECREASE_STEP_BUTTON)?.set_arg((step / 10).max(1));
        named(tab, INCREASE_STEP_BUTTON)?.set_arg(step.saturating_mul(10).min(Self::MAX_STEP));

        let value = Self::selected_value(tab)?;
        Self::shift_value_buttons(tab, value, step)?;
        named(tab, PREVIOUS_VALUE_BUTTON)?.set_text(format!("-{}", step));
        named(tab, NEXT_VALUE_BUTTON)?.set_text(format!("+{}", step));
        Ok(())
    }
}

#[async_trait]
impl<H: SelectionHooks> TabBehavior for NumberSelectionTab<H> {
    fn name(&self) -> &str {
        self.hooks.name()
    }

    async fn build(&self, tab: &mut TabCore, ctx: &mut GuiContext<'_>, args: &Value) -> Result<()> {
        let arg = |key: &str| args.get(key).and_then(Value::as_i64);
        let initial = arg(INITIAL_VALUE).unwrap_or_default();
        let step = arg(STEP).unwrap_or(1).clamp(1, Self::MAX_STEP);

        tab.set(INITIAL_VALUE, initial)?;
        tab.set(MIN_VALUE, arg(MIN_VALUE))?;
        tab.set(MAX_VALUE, arg(MAX_VALUE))?;
        tab.set(SELECTED_VALUE, initial)?;
        tab.set(STEP, step)?;
        tab.text.set_body(format!("{{{}}}", SELECTED_VALUE));

        tab.keyboard.add_row([
            Button::simple(format!("-{}", step))
                .name(PREVIOUS_VALUE_BUTTON)
                .callback("on_value_btn")
                .arg(initial - step),
            Button::simple("Reset")
                .name("reset")
                .callback("on_reset_btn")
                .arg(initial),
            Button::simple(format!("+{}", step))
                .name(NEXT_VALUE_BUTTON)
                .callback("on_value_btn")
                .arg(initial + step),
        ])?;
        tab.keyboard.add_row([
            Button::simple("<")
                .name(DECREASE_STEP_BUTTON)
                .callback("on_step_btn")
                .arg((step / 10).max(1)),
            Button::simple(self.hooks.done_label())
                .name("done")
                .callback("on_done_btn"),
            Button::simple(">")
                .name(INCREASE_STEP_BUTTON)
                .callback("on_step_btn")
                .arg(step.saturating_mul(10).min(Self::MAX_STEP)),
        ])?;

        self.hooks.on_build(tab, ctx, args).await
    }

    fn text_data(&self, tab: &TabCore) -> Vec<(String, String)> {
        let value = Self::selected_value(tab).unwrap_or_default();
        vec![(SELECTED_VALUE.to_string(), value.to_string())]
    }

    async fn on_callback(
        &self,
        tab: &mut TabCore,
        ctx: &mut GuiContext<'_>,
        callback: &str,
        press: &ButtonPress,
    ) -> Result<()> {
        match callback {
            "on_value_btn" => self.select(tab, ctx, required_arg(press)?).await,
            "on_reset_btn" => {
                let initial = tab.get::<i64>(INITIAL_VALUE)?.unwrap_or_default();
                self.select(tab, ctx, initial).await
            }
            "on_step_btn" => Self::set_step(tab, required_arg(press)?),
            "on_done_btn" => {
                let value = Self::selected_value(tab)?;
                self.hooks.on_done(tab, ctx, value).await
            }
            _ => Err(GuiError::UnknownCallback {
                tab: self.name().to_string(),
                callback: callback.to_string(),
            }),
        }
    }
}
