//! Page navigation for list-like tabs.
//!
//! Wrap a [`PageSource`] in [`Paginated`] to get a [`TabBehavior`] that
//! materializes pages on demand and keeps navigation rows under them.

use async_trait::async_trait;
use serde_json::Value;

use crate::button::{Button, ButtonPress};
use crate::context::GuiContext;
use crate::error::{GuiError, Result};
use crate::keyboard::KeyboardLayout;
use crate::tab::{InputField, TabBehavior, TabCore};

/// Name shared by every navigation button.
pub const PAGE_BUTTON_NAME: &str = "page_button";

const ON_PAGE: &str = "on_page";
const ON_NEXT_PAGE: &str = "on_next_page";
const ON_PREVIOUS_PAGE: &str = "on_previous_page";

/// Tab data key holding the current page number in numbered mode.
pub const PAGE_NUMBER_KEY: &str = "page_number";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginatorMode {
    /// Numbered pages with a sliding window of page buttons.
    #[default]
    Standard,
    /// Previous/next scrolling without page numbers.
    NoPages,
}

/// Requested page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Number(u32),
    Next,
    Previous,
}

/// What a page source reports about the page it just materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageInfo {
    /// Known page count; `None` for endless lists.
    pub total_pages: Option<u32>,
    /// Only consulted in [`PaginatorMode::NoPages`].
    pub is_first_page: bool,
    /// Consulted in [`PaginatorMode::NoPages`], and in numbered mode when
    /// the page count is unknown.
    pub is_last_page: bool,
}

/// A tab whose content is split into pages.
#[async_trait]
pub trait PageSource: TabBehavior {
    fn mode(&self) -> PaginatorMode {
        PaginatorMode::Standard
    }

    /// Append a "Page N / Total." line to the body in numbered mode.
    fn add_page_info_into_text(&self) -> bool {
        true
    }

    fn page_label(&self) -> &str {
        "Page"
    }

    /// Fill the tab with page `page` (numbered mode).
    async fn set_page(
        &self,
        _tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
        _page: u32,
    ) -> Result<PageInfo> {
        Err(GuiError::NotImplemented("set_page"))
    }

    /// Fill the tab with the following page (scrolling mode).
    async fn set_next_page(&self, _tab: &mut TabCore, _ctx: &mut GuiContext<'_>) -> Result<PageInfo> {
        Err(GuiError::NotImplemented("set_next_page"))
    }

    /// Fill the tab with the preceding page (scrolling mode).
    async fn set_previous_page(
        &self,
        _tab: &mut TabCore,
        _ctx: &mut GuiContext<'_>,
    ) -> Result<PageInfo> {
        Err(GuiError::NotImplemented("set_previous_page"))
    }
}

/// Page numbers of the forward and back navigation rows.
///
/// The forward row holds the next page, up to two further pages and the
/// last page. The back row holds page 1, up to two earlier pages and the
/// previous page.
pub fn navigation_rows(
    page: u32,
    total_pages: Option<u32>,
    is_first_page: bool,
    is_last_page: bool,
) -> (Vec<u32>, Vec<u32>) {
    let mut forward = Vec::new();
    // Past u32::MAX there is nowhere to go: treat it as the last page.
    if let Some(next) = page.checked_add(1).filter(|_| !is_last_page) {
        forward.push(next);
        if let Some(total) = total_pages {
            let end = page.saturating_add(total.saturating_sub(page).min(4));
            forward.extend(page.saturating_add(2)..end);
            if next < total {
                forward.push(total);
            }
        }
    }

    let mut back = Vec::new();
    if !is_first_page && page > 1 {
        back.push(page - 1);
        for p in page.saturating_sub(3).max(2)..page - 1 {
            back.insert(back.len() - 1, p);
        }
        if page > 2 {
            back.insert(0, 1);
        }
    }

    (forward, back)
}

fn page_button(page: u32) -> Button {
    Button::simple(page.to_string())
        .name(PAGE_BUTTON_NAME)
        .callback(ON_PAGE)
        .arg(page)
}

/// Clear the keyboard, materialize `target` and rebuild the navigation rows.
pub async fn update<S: PageSource + ?Sized>(
    source: &S,
    tab: &mut TabCore,
    ctx: &mut GuiContext<'_>,
    target: PageTarget,
) -> Result<()> {
    tab.keyboard.clear(ctx).await?;

    match source.mode() {
        PaginatorMode::Standard => {
            let PageTarget::Number(page) = target else {
                return Err(GuiError::InvalidArgument(
                    "numbered pagination needs a page number".to_string(),
                ));
            };
            if page == 0 {
                return Err(GuiError::InvalidArgument(
                    "page numbers start at 1".to_string(),
                ));
            }

            let info = source.set_page(tab, ctx, page).await?;
            tab.set(PAGE_NUMBER_KEY, page)?;

            if source.add_page_info_into_text() {
                let mut line = format!("{} {}", source.page_label(), page);
                if let Some(total) = info.total_pages {
                    line.push_str(&format!(" / {}", total));
                }
                line.push('.');
                tab.text.append_to_body(&format!("\n\n{}", line));
            }

            let is_first_page = page == 1;
            let is_last_page = match info.total_pages {
                Some(total) => page == total,
                None => info.is_last_page,
            };
            let (forward, back) =
                navigation_rows(page, info.total_pages, is_first_page, is_last_page);
            if !forward.is_empty() {
                tab.keyboard.add_row(forward.into_iter().map(page_button))?;
            }
            if !back.is_empty() {
                tab.keyboard.add_row(back.into_iter().map(page_button))?;
            }
        }
        PaginatorMode::NoPages => {
            let info = match target {
                PageTarget::Previous => source.set_previous_page(tab, ctx).await?,
                _ => source.set_next_page(tab, ctx).await?,
            };

            let mut row = Vec::new();
            if !info.is_first_page {
                row.push(
                    Button::simple("<")
                        .name(PAGE_BUTTON_NAME)
                        .callback(ON_PREVIOUS_PAGE),
                );
            }
            if !info.is_last_page {
                row.push(
                    Button::simple(">")
                        .name(PAGE_BUTTON_NAME)
                        .callback(ON_NEXT_PAGE),
                );
            }
            if !row.is_empty() {
                tab.keyboard.add_row(row)?;
            }
        }
    }

    Ok(())
}

/// A [`PageSource`] driven as a tab.
///
/// Building reads an optional `page_number` argument (default 1). In
/// scrolling mode the first page is produced by `set_next_page`.
pub struct Paginated<S>(pub S);

#[async_trait]
impl<S: PageSource> TabBehavior for Paginated<S> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn input_fields(&self) -> Vec<InputField> {
        self.0.input_fields()
    }

    fn rerender_text(&self) -> bool {
        self.0.rerender_text()
    }

    fn layout(&self) -> KeyboardLayout {
        self.0.layout()
    }

    async fn build(&self, tab: &mut TabCore, ctx: &mut GuiContext<'_>, args: &Value) -> Result<()> {
        self.0.build(tab, ctx, args).await?;
        let target = match self.0.mode() {
            PaginatorMode::Standard => {
                let page = args
                    .get(PAGE_NUMBER_KEY)
                    .and_then(Value::as_u64)
                    .and_then(|p| u32::try_from(p).ok())
                    .unwrap_or(1);
                PageTarget::Number(page)
            }
            PaginatorMode::NoPages => PageTarget::Next,
        };
        update(&self.0, tab, ctx, target).await
    }

    fn text_data(&self, tab: &TabCore) -> Vec<(String, String)> {
        self.0.text_data(tab)
    }

    async fn on_callback(
        &self,
        tab: &mut TabCore,
        ctx: &mut GuiContext<'_>,
        callback: &str,
        press: &ButtonPress,
    ) -> Result<()> {
        match callback {
            ON_PAGE => {
                let page = press.arg_as::<u32>().ok_or_else(|| {
                    GuiError::InvalidArgument(format!("bad page number {:?}", press.arg))
                })?;
                update(&self.0, tab, ctx, PageTarget::Number(page)).await
            }
            ON_NEXT_PAGE => update(&self.0, tab, ctx, PageTarget::Next).await,
            ON_PREVIOUS_PAGE => update(&self.0, tab, ctx, PageTarget::Previous).await,
            _ => self.0.on_callback(tab, ctx, callback, press).await,
        }
    }

    async fn on_input(
        &self,
        tab: &mut TabCore,
        ctx: &mut GuiContext<'_>,
        field: &str,
        text: &str,
    ) -> Result<()> {
        self.0.on_input(tab, ctx, field, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(page: u32, total: u32) -> (Vec<u32>, Vec<u32>) {
        navigation_rows(page, Some(total), page == 1, page == total)
    }

    #[test]
    fn test_middle_page() {
        let (forward, back) = rows(5, 10);
        assert_eq!(forward, vec![6, 7, 8, 10]);
        assert_eq!(back, vec![1, 2, 3, 4]);

        let all: Vec<u32> = forward.iter().chain(back.iter()).copied().collect();
        assert_eq!(all.iter().filter(|p| **p == 1).count(), 1);
        assert!(all.contains(&3) || all.contains(&4));
        assert!(all.contains(&6) && all.contains(&7) && all.contains(&10));
    }

    #[test]
    fn test_first_page_has_no_back_row() {
        let (forward, back) = rows(1, 10);
        assert_eq!(forward, vec![2, 3, 4, 10]);
        assert!(back.is_empty());
    }

    #[test]
    fn test_last_page_has_no_forward_row() {
        let (forward, back) = rows(10, 10);
        assert!(forward.is_empty());
        assert_eq!(back, vec![1, 7, 8, 9]);
    }

    #[test]
    fn test_near_edges() {
        assert_eq!(rows(2, 10).1, vec![1]);
        assert_eq!(rows(3, 10).1, vec![1, 2]);
        assert_eq!(rows(9, 10).0, vec![10]);
        assert_eq!(rows(8, 10).0, vec![9, 10]);
    }

    #[test]
    fn test_single_page() {
        let (forward, back) = rows(1, 1);
        assert!(forward.is_empty());
        assert!(back.is_empty());
    }

    #[test]
    fn test_pages_stay_in_range() {
        for total in 1..=12 {
            for page in 1..=total {
                let (forward, back) = rows(page, total);
                for p in forward.iter().chain(back.iter()) {
                    assert!(*p >= 1 && *p <= total, "page {p} of {total} at {page}");
                    assert_ne!(*p, page);
                }
            }
        }
    }

    #[test]
    fn test_unknown_total() {
        let (forward, back) = navigation_rows(4, None, false, false);
        assert_eq!(forward, vec![5]);
        assert_eq!(back, vec![1, 2, 3]);

        let (forward, _) = navigation_rows(4, None, false, true);
        assert!(forward.is_empty());
    }

    #[test]
    fn test_highest_page_number_has_no_forward_row() {
        let (forward, back) = navigation_rows(u32::MAX, None, false, false);
        assert!(forward.is_empty());
        assert_eq!(back, vec![1, u32::MAX - 3, u32::MAX - 2, u32::MAX - 1]);

        let (forward, _) = navigation_rows(u32::MAX - 1, Some(u32::MAX), false, false);
        assert_eq!(forward, vec![u32::MAX]);
    }
}
