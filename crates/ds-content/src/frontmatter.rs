//! YAML frontmatter: splitting it from the body and parsing the docs schema.

use serde::{Deserialize, Serialize};

/// Frontmatter fields accepted on a documentation page.
///
/// Unknown fields are rejected so that typos such as `sidebar_postion`
/// fail the build instead of being silently ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sort key within the sidebar level; absent sorts as `0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_position: Option<f64>,
    /// Sidebar text, overriding `title`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_label: Option<String>,
    /// Hide the in-page heading outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_page_headings: Option<bool>,
    /// Render the page without the sidebar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_sidebar: Option<bool>,
}

/// A file opened a frontmatter block with `---` but never closed it.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Unterminated;

/// Split a file into its frontmatter block (if any) and body.
///
/// The block must start on the very first line (after an optional BOM)
/// with a line consisting of `---` and end at the next such line.
pub(crate) fn split(contents: &str) -> Result<(Option<&str>, &str), Unterminated> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);

    let Some(rest) = strip_delimiter_line(contents) else {
        return Ok((None, contents));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }

    Err(Unterminated)
}

/// If `s` starts with a `---` line, return what follows it.
fn strip_delimiter_line(s: &str) -> Option<&str> {
    let rest = s.strip_prefix("---")?;
    let line_end = rest.find('\n').map_or(rest.len(), |i| i + 1);
    rest[..line_end].trim().is_empty().then(|| &rest[line_end..])
}

/// Parse the shared docs schema. An empty block yields all-default fields.
pub(crate) fn parse_docs(yaml: &str) -> Result<Frontmatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_str(yaml)
}
