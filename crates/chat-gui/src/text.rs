//! Message text composition.

use database::{text as rows, TextRecord};

use crate::context::GuiContext;
use crate::error::{GuiError, Result};

/// Width of the rule printed under a header.
pub const HEADER_RULE_WIDTH: usize = 60;

/// Rendered in place of an empty body; the platform rejects empty texts.
pub const EMPTY_BODY: &str = ".";

/// The header and body of one tab's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    row: TextRecord,
}

impl Text {
    /// Create the text row of a freshly built tab.
    pub async fn build(
        ctx: &mut GuiContext<'_>,
        window_id: i64,
        tab_index: i64,
        tab_id: i64,
    ) -> Result<Self> {
        let mut row = TextRecord {
            window_id,
            tab_index,
            tab_id,
            ..TextRecord::default()
        };
        rows::create_text(ctx.conn, &mut row).await?;
        Ok(Self { row })
    }

    /// Load the text row of an existing tab.
    pub async fn reconstruct(
        ctx: &mut GuiContext<'_>,
        window_id: i64,
        tab_index: i64,
        tab_id: i64,
    ) -> Result<Self> {
        let row = rows::get_text(ctx.conn, window_id, tab_index, tab_id)
            .await?
            .ok_or_else(|| GuiError::Reconstruction("Text not found".to_string()))?;
        Ok(Self { row })
    }

    pub fn row(&self) -> &TextRecord {
        &self.row
    }

    pub fn header(&self) -> Option<&str> {
        self.row.header.as_deref()
    }

    pub fn body(&self) -> &str {
        self.row.body.as_deref().unwrap_or_default()
    }

    /// Set the header. A one-time header is cleared after the next render.
    pub fn set_header(&mut self, header: impl Into<String>, one_time: bool) {
        self.row.header = Some(header.into());
        self.row.one_time_header = one_time;
    }

    pub fn clear_header(&mut self) {
        self.row.header = None;
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.row.body = Some(body.into());
    }

    pub fn prepend_to_body(&mut self, text: &str) {
        self.row.body = Some(format!("{}{}", text, self.body()));
    }

    pub fn append_to_body(&mut self, text: &str) {
        self.row.body = Some(format!("{}{}", self.body(), text));
    }

    /// Fragment shown under the body while an input field is focused.
    pub fn set_input_field_text(&mut self, text: Option<String>) {
        self.row.input_field_text = text;
    }

    /// Compose the message text, substituting `{key}` placeholders.
    pub fn compose(&self, data: &[(String, String)]) -> String {
        let mut text = String::new();
        if let Some(header) = self.row.header.as_deref().filter(|h| !h.is_empty()) {
            text.push_str(header);
            text.push('\n');
            text.push_str(&"-".repeat(HEADER_RULE_WIDTH));
            text.push('\n');
        }

        let body: Vec<&str> = [self.row.body.as_deref(), self.row.input_field_text.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if body.is_empty() {
            text.push_str(EMPTY_BODY);
        } else {
            text.push_str(&body.join("\n"));
        }

        substitute(&text, data)
    }

    /// Compose the text, retire a one-time header and store the row.
    pub async fn render(
        &mut self,
        ctx: &mut GuiContext<'_>,
        data: &[(String, String)],
    ) -> Result<String> {
        let text = self.compose(data);
        if self.row.one_time_header {
            self.row.header = None;
        }
        self.save(ctx).await?;
        Ok(text)
    }

    pub async fn save(&self, ctx: &mut GuiContext<'_>) -> Result<()> {
        rows::update_text(ctx.conn, &self.row).await?;
        Ok(())
    }

    pub async fn destroy(&self, ctx: &mut GuiContext<'_>) -> Result<()> {
        rows::delete_text(ctx.conn, self.row.id).await?;
        Ok(())
    }
}

/// Replace `{key}` placeholders in one left-to-right pass. Substituted
/// values are never scanned again; unknown keys are left as they are.
fn substitute(template: &str, data: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            data.iter()
                .find(|(k, _)| k == key)
                .map(|(_, value)| (value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text() -> Text {
        Text {
            row: TextRecord::default(),
        }
    }

    #[test]
    fn test_empty_body_renders_dot() {
        assert_eq!(text().compose(&[]), ".");
    }

    #[test]
    fn test_header_and_body() {
        let mut text = text();
        text.set_header("Settings", true);
        text.set_body("Pick one");
        text.set_input_field_text(Some("Enter a name".to_string()));

        let expected = format!("Settings\n{}\nPick one\nEnter a name", "-".repeat(60));
        assert_eq!(text.compose(&[]), expected);
    }

    #[test]
    fn test_header_only() {
        let mut text = text();
        text.set_header("Title", false);
        assert_eq!(text.compose(&[]), format!("Title\n{}\n.", "-".repeat(60)));
    }

    #[test]
    fn test_body_edits() {
        let mut text = text();
        text.append_to_body("middle");
        text.prepend_to_body("start ");
        text.append_to_body(" end");
        assert_eq!(text.body(), "start middle end");
    }

    #[test]
    fn test_placeholders() {
        let mut text = text();
        text.set_body("Value: {selected_value} ({selected_value})");
        let data = vec![("selected_value".to_string(), "5".to_string())];
        assert_eq!(text.compose(&data), "Value: 5 (5)");
    }

    #[test]
    fn test_substituted_values_are_not_expanded() {
        let mut text = text();
        text.set_body("Count: {count}\nName: {name}");
        let data = vec![
            ("name".to_string(), "{count}".to_string()),
            ("count".to_string(), "3".to_string()),
        ];
        assert_eq!(text.compose(&data), "Count: 3\nName: {count}");
    }

    #[test]
    fn test_unknown_and_unclosed_placeholders_stay() {
        let mut text = text();
        text.set_body("{missing} {a} {open");
        let data = vec![("a".to_string(), "1".to_string())];
        assert_eq!(text.compose(&data), "{missing} 1 {open");
    }
}
