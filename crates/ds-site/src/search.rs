//! Search records extracted from rendered pages.

use ds_content::Collection;
use ds_renderer::{BlockKind, TextBlock};
use serde::Serialize;

/// One searchable block of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchRecord {
    /// Page URL, with the nearest heading anchor as fragment.
    pub url: String,
    pub title: String,
    pub collection: Collection,
    /// Enclosing H2 and H3 texts, outermost first.
    pub hierarchy: Vec<String>,
    pub content: String,
    pub kind: BlockKind,
}

/// Turn the text blocks of one page into records.
#[must_use]
pub fn page_records(
    page_url: &str,
    title: &str,
    collection: Collection,
    blocks: Vec<TextBlock>,
) -> Vec<SearchRecord> {
    let mut h2: Option<String> = None;
    let mut h3: Option<String> = None;

    blocks
        .into_iter()
        .filter_map(|block| {
            if block.kind == BlockKind::Heading {
                match block.level {
                    1 => return None,
                    2 => {
                        h2 = Some(block.text.clone());
                        h3 = None;
                    }
                    3 => h3 = Some(block.text.clone()),
                    _ => {}
                }
            }
            let url = match &block.anchor {
                Some(anchor) => format!("{page_url}#{anchor}"),
                None => page_url.to_owned(),
            };
            Some(SearchRecord {
                url,
                title: title.to_owned(),
                collection,
                hierarchy: h2.iter().chain(h3.iter()).cloned().collect(),
                content: block.text,
                kind: block.kind,
            })
        })
        .collect()
}
