//! Button grids and their reconstruction from displayed messages.

use std::collections::HashMap;

use database::{platform_button, PlatformButtonRecord};
use tracing::debug;
use transport_core::{InlineButton, InlineKeyboard};

use crate::button::{Button, ButtonKind, ButtonPress};
use crate::context::{GuiContext, WindowRef};
use crate::error::{GuiError, Result};
use crate::token::Token;

/// One position in a keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// A button backed by a stored row.
    Widget(Button),
    /// A platform-native button without a payload, kept as-is.
    Native(InlineButton),
}

impl Cell {
    pub fn as_button(&self) -> Option<&Button> {
        match self {
            Cell::Widget(button) => Some(button),
            Cell::Native(_) => None,
        }
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            Cell::Widget(button) => Some(button),
            Cell::Native(_) => None,
        }
    }
}

impl From<Button> for Cell {
    fn from(button: Button) -> Self {
        Cell::Widget(button)
    }
}

impl From<InlineButton> for Cell {
    fn from(button: InlineButton) -> Self {
        Cell::Native(button)
    }
}

/// How [`Keyboard::add_button`] places buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardLayout {
    /// Append to the last row.
    #[default]
    Rows,
    /// Start a new row once the last one holds `width` buttons.
    Grid { width: usize },
}

/// An ordered grid of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    layout: KeyboardLayout,
    rows: Vec<Vec<Cell>>,
}

impl Keyboard {
    pub fn new(layout: KeyboardLayout) -> Self {
        Self {
            layout,
            rows: Vec::new(),
        }
    }

    pub fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. Empty rows are rejected.
    pub fn add_row<C: Into<Cell>>(&mut self, cells: impl IntoIterator<Item = C>) -> Result<()> {
        let row: Vec<Cell> = cells.into_iter().map(Into::into).collect();
        if row.is_empty() {
            return Err(GuiError::InvalidArgument(
                "keyboard row must not be empty".to_string(),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a button according to the keyboard layout.
    pub fn add_button(&mut self, cell: impl Into<Cell>) {
        let full = match (self.layout, self.rows.last()) {
            (_, None) => true,
            (KeyboardLayout::Grid { width }, Some(last)) => last.len() >= width,
            (KeyboardLayout::Rows, Some(_)) => false,
        };
        if full {
            self.rows.push(Vec::new());
        }
        if let Some(last) = self.rows.last_mut() {
            last.push(cell.into());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    /// Widget buttons in grid order.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.iter().filter_map(Cell::as_button)
    }

    pub fn find_buttons_by_name(&self, name: &str) -> Vec<&Button> {
        self.buttons()
            .filter(|button| button.get_name() == Some(name))
            .collect()
    }

    /// First button with this name.
    pub fn button_mut(&mut self, name: &str) -> Option<&mut Button> {
        self.rows
            .iter_mut()
            .flatten()
            .filter_map(Cell::as_button_mut)
            .find(|button| button.get_name() == Some(name))
    }

    pub fn button_at(&self, row: usize, column: usize) -> Option<&Button> {
        self.rows.get(row)?.get(column)?.as_button()
    }

    fn button_at_mut(&mut self, row: usize, column: usize) -> Option<&mut Button> {
        self.rows.get_mut(row)?.get_mut(column)?.as_button_mut()
    }

    /// Grid position of the button carrying `token`.
    pub fn position_of(&self, token: &[u8]) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter().enumerate().find_map(|(c, cell)| match cell {
                Cell::Widget(button) if button.token() == token => Some((r, c)),
                _ => None,
            })
        })
    }

    /// Remove and destroy every button named `name`. Rows left empty are
    /// dropped.
    pub async fn remove_buttons_by_name(
        &mut self,
        ctx: &mut GuiContext<'_>,
        name: &str,
    ) -> Result<usize> {
        let mut removed = 0;
        let mut kept_rows = Vec::with_capacity(self.rows.len());
        for row in std::mem::take(&mut self.rows) {
            let mut kept = Vec::with_capacity(row.len());
            for cell in row {
                match cell {
                    Cell::Widget(button) if button.get_name() == Some(name) => {
                        button.destroy(ctx).await?;
                        removed += 1;
                    }
                    cell => kept.push(cell),
                }
            }
            if !kept.is_empty() {
                kept_rows.push(kept);
            }
        }
        self.rows = kept_rows;
        Ok(removed)
    }

    /// Destroy every button.
    pub async fn clear(&mut self, ctx: &mut GuiContext<'_>) -> Result<()> {
        for button in self.buttons() {
            button.destroy(ctx).await?;
        }
        self.rows.clear();
        Ok(())
    }

    /// Apply the kind-specific state change of the button at a position and
    /// describe the press. `None` when the press does nothing.
    pub(crate) fn activate(&mut self, row: usize, column: usize) -> Option<ButtonPress> {
        let button = self.button_at(row, column)?;
        let (kind, checked) = (button.kind(), button.is_checked());
        let group = button.row().selection_group.clone();

        match kind {
            ButtonKind::Simple => {}
            ButtonKind::CheckBox => self.button_at_mut(row, column)?.set_checked(!checked),
            ButtonKind::SingleSelect => {
                if checked {
                    return None;
                }
                let sibling = self
                    .rows
                    .iter_mut()
                    .flatten()
                    .filter_map(Cell::as_button_mut)
                    .find(|b| {
                        b.kind() == ButtonKind::SingleSelect
                            && b.row().selection_group == group
                            && b.is_checked()
                    });
                if let Some(sibling) = sibling {
                    sibling.set_checked(false);
                }
                self.button_at_mut(row, column)?.set_checked(true);
            }
        }

        Some(self.button_at(row, column)?.press(row, column))
    }

    /// Persist every widget button and produce the platform grid.
    pub async fn render(
        &mut self,
        ctx: &mut GuiContext<'_>,
        window: WindowRef,
    ) -> Result<Option<InlineKeyboard>> {
        let mut grid = Vec::with_capacity(self.rows.len());
        for row in &mut self.rows {
            let mut rendered = Vec::with_capacity(row.len());
            for cell in row {
                match cell {
                    Cell::Widget(button) => rendered.push(button.render(ctx, window).await?),
                    Cell::Native(button) => rendered.push(button.clone()),
                }
            }
            grid.push(rendered);
        }
        Ok((!grid.is_empty()).then_some(grid))
    }

    /// Rebuild a keyboard from a displayed grid.
    ///
    /// Every payload-carrying cell must match exactly one stored button of
    /// `window`; otherwise the displayed grid is stale and reconstruction
    /// fails.
    pub async fn reconstruct(
        ctx: &mut GuiContext<'_>,
        window: WindowRef,
        grid: InlineKeyboard,
        layout: KeyboardLayout,
    ) -> Result<Self> {
        let mut by_kind: HashMap<ButtonKind, Vec<Vec<u8>>> = HashMap::new();
        let mut positions: HashMap<Vec<u8>, (usize, usize)> = HashMap::new();
        let mut requested = 0;

        for (r, row) in grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let Some(data) = &cell.callback_data else {
                    continue;
                };
                let token = Token::parse(data)?;
                if token.window_id() != window.id || token.window_tag() != window.tag {
                    return Err(GuiError::Reconstruction(
                        "Button belongs to another window".to_string(),
                    ));
                }
                let kind = ctx.registry.button_kind(token.button_tag()).ok_or_else(|| {
                    GuiError::Reconstruction("Button class not found".to_string())
                })?;
                by_kind.entry(kind).or_default().push(data.clone());
                positions.insert(data.clone(), (r, c));
                requested += 1;
            }
        }

        let mut fetched = Vec::with_capacity(requested);
        for (kind, tokens) in &by_kind {
            let rows =
                database::button::get_buttons_by_tokens(ctx.conn, kind.table(), window.id, tokens)
                    .await?;
            fetched.extend(rows.into_iter().map(|row| (*kind, row)));
        }
        if fetched.len() != requested {
            return Err(GuiError::Reconstruction(format!(
                "{} buttons out of {} were fetched",
                fetched.len(),
                requested
            )));
        }
        debug!(
            "Matched {} buttons for window {}",
            fetched.len(),
            window.id
        );

        let mut rows: Vec<Vec<Cell>> = grid
            .into_iter()
            .map(|row| row.into_iter().map(Cell::Native).collect())
            .collect();
        for (kind, record) in fetched {
            let Some(&(r, c)) = positions.get(&record.token) else {
                return Err(GuiError::Reconstruction(
                    "Fetched button is not on screen".to_string(),
                ));
            };
            let displayed = match &rows[r][c] {
                Cell::Native(button) => button.text.clone(),
                Cell::Widget(button) => button.text().to_string(),
            };
            rows[r][c] = Cell::Widget(Button::from_record(kind, record, &displayed));
        }

        Ok(Self { layout, rows })
    }

    /// Park the keyboard in bridge rows tagged with `tab_index`.
    pub async fn save(
        &mut self,
        ctx: &mut GuiContext<'_>,
        window: WindowRef,
        tab_index: i64,
    ) -> Result<()> {
        for row in &mut self.rows {
            let last = row.len().saturating_sub(1);
            for (i, cell) in row.iter_mut().enumerate() {
                let mut bridge = match cell {
                    Cell::Widget(button) => {
                        button.persist(ctx, window).await?;
                        PlatformButtonRecord {
                            text: button.label(),
                            token: Some(button.token().to_vec()),
                            ..PlatformButtonRecord::default()
                        }
                    }
                    Cell::Native(button) => PlatformButtonRecord {
                        text: button.text.clone(),
                        token: button.callback_data.clone(),
                        url: button.url.clone(),
                        ..PlatformButtonRecord::default()
                    },
                };
                bridge.window_id = window.id;
                bridge.tab_index = tab_index;
                bridge.last_in_row = i == last;
                platform_button::create_platform_button(ctx.conn, &mut bridge).await?;
            }
        }
        Ok(())
    }

    /// Read a parked keyboard back, consume its bridge rows and reconstruct
    /// it.
    pub async fn restore(
        ctx: &mut GuiContext<'_>,
        window: WindowRef,
        tab_index: i64,
        layout: KeyboardLayout,
    ) -> Result<Self> {
        let parked = platform_button::list_platform_buttons(ctx.conn, window.id, tab_index).await?;

        let mut grid: InlineKeyboard = Vec::new();
        let mut row = Vec::new();
        for bridge in parked {
            row.push(InlineButton {
                text: bridge.text,
                callback_data: bridge.token,
                url: bridge.url,
            });
            if bridge.last_in_row {
                grid.push(std::mem::take(&mut row));
            }
        }
        if !row.is_empty() {
            grid.push(row);
        }

        platform_button::delete_platform_buttons(ctx.conn, window.id, tab_index).await?;
        Self::reconstruct(ctx, window, grid, layout).await
    }

    /// Destroy every button.
    pub async fn destroy(&mut self, ctx: &mut GuiContext<'_>) -> Result<()> {
        self.clear(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selects() -> Keyboard {
        let mut keyboard = Keyboard::default();
        keyboard
            .add_row([
                Button::single_select("a").group("g").checked(true),
                Button::single_select("b").group("g"),
                Button::single_select("c").group("other").checked(true),
            ])
            .unwrap();
        keyboard
    }

    fn checked(keyboard: &Keyboard) -> Vec<bool> {
        keyboard.buttons().map(Button::is_checked).collect()
    }

    #[test]
    fn test_add_row_rejects_empty() {
        let mut keyboard = Keyboard::default();
        let result = keyboard.add_row(Vec::<Button>::new());
        assert!(matches!(result, Err(GuiError::InvalidArgument(_))));
    }

    #[test]
    fn test_add_button_rows_layout() {
        let mut keyboard = Keyboard::default();
        keyboard.add_button(Button::simple("a"));
        keyboard.add_button(Button::simple("b"));
        assert_eq!(keyboard.rows().len(), 1);
        assert_eq!(keyboard.rows()[0].len(), 2);
    }

    #[test]
    fn test_add_button_grid_layout() {
        let mut keyboard = Keyboard::new(KeyboardLayout::Grid { width: 3 });
        for i in 0..7 {
            keyboard.add_button(Button::simple(i.to_string()));
        }
        let widths: Vec<usize> = keyboard.rows().iter().map(Vec::len).collect();
        assert_eq!(widths, vec![3, 3, 1]);
    }

    #[test]
    fn test_find_buttons_by_name() {
        let mut keyboard = Keyboard::default();
        keyboard
            .add_row([Button::simple("1").name("page"), Button::simple("x")])
            .unwrap();
        keyboard
            .add_row([
                Cell::from(Button::simple("2").name("page")),
                Cell::from(InlineButton::url("docs", "https://example.com")),
            ])
            .unwrap();

        let found: Vec<&str> = keyboard
            .find_buttons_by_name("page")
            .into_iter()
            .map(Button::text)
            .collect();
        assert_eq!(found, vec!["1", "2"]);
        assert!(keyboard.button_mut("missing").is_none());
    }

    #[test]
    fn test_check_box_toggles() {
        let mut keyboard = Keyboard::default();
        keyboard
            .add_row([Button::check_box("sound").callback("on_sound").arg("s")])
            .unwrap();

        let press = keyboard.activate(0, 0).unwrap();
        assert_eq!(press.checked, Some(true));
        assert_eq!(press.arg.as_deref(), Some("s"));
        let press = keyboard.activate(0, 0).unwrap();
        assert_eq!(press.checked, Some(false));
    }

    #[test]
    fn test_single_select_moves_check_within_group() {
        let mut keyboard = selects();

        let press = keyboard.activate(0, 1).unwrap();
        assert_eq!(press.checked, Some(true));
        assert_eq!(checked(&keyboard), vec![false, true, true]);
    }

    #[test]
    fn test_single_select_checked_is_noop() {
        let mut keyboard = selects();
        assert!(keyboard.activate(0, 0).is_none());
        assert_eq!(checked(&keyboard), vec![true, false, true]);
    }

    #[test]
    fn test_single_select_at_most_one_per_group() {
        let mut keyboard = selects();
        for (r, c) in [(0, 1), (0, 0), (0, 1), (0, 2), (0, 1)] {
            keyboard.activate(r, c);
            let in_group = keyboard
                .buttons()
                .filter(|b| b.row().selection_group == "g" && b.is_checked())
                .count();
            assert!(in_group <= 1);
        }
    }

    #[test]
    fn test_activate_native_cell() {
        let mut keyboard = Keyboard::default();
        keyboard
            .add_row([InlineButton::url("docs", "https://example.com")])
            .unwrap();
        assert!(keyboard.activate(0, 0).is_none());
        assert!(keyboard.activate(5, 5).is_none());
    }
}
