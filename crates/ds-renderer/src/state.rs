//! Per-construct state used while walking markdown events.

use std::collections::HashMap;

use pulldown_cmark::{Alignment, HeadingLevel};

/// Heading in the page outline.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    /// Heading level (2-6; the page title is never part of the outline).
    pub level: u8,
    /// Plain heading text.
    pub title: String,
    /// Anchor id, unique within the page.
    pub id: String,
}

/// Heading being collected between its start and end events.
#[derive(Debug)]
pub(crate) struct OpenHeading {
    pub level: u8,
    /// Plain text for the outline and anchor id.
    pub text: String,
    /// Inline HTML for the rendered heading.
    pub html: String,
}

impl OpenHeading {
    pub fn new(level: HeadingLevel) -> Self {
        Self {
            level: level as u8,
            text: String::new(),
            html: String::new(),
        }
    }
}

/// Fenced or indented code block being collected.
#[derive(Debug, Default)]
pub(crate) struct OpenCode {
    pub lang: Option<String>,
    pub source: String,
}

impl OpenCode {
    /// Takes the language from a fence info string such as `surql title="x"`.
    pub fn fenced(info: &str) -> Self {
        let lang = info
            .split(|c: char| c.is_whitespace() || c == '{' || c == ',')
            .next()
            .filter(|lang| !lang.is_empty())
            .map(ToOwned::to_owned);
        Self {
            lang,
            source: String::new(),
        }
    }
}

/// Image whose alt text is still being collected.
#[derive(Debug)]
pub(crate) struct OpenImage {
    pub src: String,
    pub title: String,
    pub alt: String,
}

/// Position inside the current table.
#[derive(Debug, Default)]
pub(crate) struct TableCursor {
    alignments: Vec<Alignment>,
    in_head: bool,
    column: usize,
}

impl TableCursor {
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.column = 0;
    }

    pub fn set_head(&mut self, in_head: bool) {
        self.in_head = in_head;
    }

    pub fn start_row(&mut self) {
        self.column = 0;
    }

    /// Cell tag name and optional `style` attribute for the next cell.
    pub fn next_cell(&mut self) -> (&'static str, &'static str) {
        let tag = if self.in_head { "th" } else { "td" };
        let style = match self.alignments.get(self.column) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        };
        self.column += 1;
        (tag, style)
    }

    pub fn cell_tag(&self) -> &'static str {
        if self.in_head { "th" } else { "td" }
    }
}

/// Anchor id allocator keeping ids unique within a page.
#[derive(Debug, Default)]
pub(crate) struct HeadingIds {
    seen: HashMap<String, usize>,
}

impl HeadingIds {
    /// Slugifies `text`, appending `-1`, `-2`, ... to repeats.
    pub fn allocate(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;
        id
    }
}

/// Convert text to a URL-safe anchor id.
///
/// Lowercases alphanumerics, maps whitespace, `-` and `_` to single
/// dashes and drops everything else.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }
    slug
}

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("SELECT statement"), "select-statement");
        assert_eq!(slugify("  Leading  spaces  "), "leading-spaces");
        assert_eq!(slugify("snake_case name"), "snake-case-name");
        assert_eq!(slugify("What's new?"), "whats-new");
        assert_eq!(slugify("Ünïcode"), "ünïcode");
    }

    #[test]
    fn test_slugify_symbols_only() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_heading_ids_deduplicate() {
        let mut ids = HeadingIds::default();
        assert_eq!(ids.allocate("Example"), "example");
        assert_eq!(ids.allocate("Example"), "example-1");
        assert_eq!(ids.allocate("example"), "example-2");
        assert_eq!(ids.allocate("Other"), "other");
    }

    #[test]
    fn test_fence_info_language() {
        assert_eq!(OpenCode::fenced("surql").lang.as_deref(), Some("surql"));
        assert_eq!(
            OpenCode::fenced(r#"rust title="main.rs""#).lang.as_deref(),
            Some("rust")
        );
        assert_eq!(OpenCode::fenced("js{1,3}").lang.as_deref(), Some("js"));
        assert_eq!(OpenCode::fenced("").lang, None);
    }

    #[test]
    fn test_table_cursor_alignment() {
        let mut table = TableCursor::default();
        table.start(vec![Alignment::None, Alignment::Right]);
        table.set_head(true);
        table.start_row();
        assert_eq!(table.next_cell(), ("th", ""));
        assert_eq!(table.next_cell(), ("th", r#" style="text-align:right""#));
        table.set_head(false);
        table.start_row();
        assert_eq!(table.next_cell(), ("td", ""));
        assert_eq!(table.cell_tag(), "td");
    }
}
