//! `_category_.json` sidecars: group labels and positions per directory.

use serde::{Deserialize, Serialize};

/// Display metadata for one directory of a collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_position: Option<f64>,
}

impl CategoryMeta {
    /// Parse a category file.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for invalid JSON, non-numeric positions,
    /// non-string labels or unknown keys.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
