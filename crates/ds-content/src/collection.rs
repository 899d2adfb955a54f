//! Documentation collections.
//!
//! A collection is one documentation section or one SDK. The set is closed:
//! adding a collection means adding a variant here, and the compiler then
//! points at every `match` that needs a decision (schema, prefix, label).

use std::fmt;

use serde::{Serialize, Serializer};

use crate::frontmatter::{self, Frontmatter};

/// A documentation collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Surrealdb,
    Surrealql,
    Surrealist,
    Surrealml,
    Cloud,
    Integrations,
    Tutorials,
    SdkRust,
    SdkJavascript,
    SdkPython,
    SdkGolang,
    SdkDotnet,
    SdkJava,
    SdkPhp,
}

impl Collection {
    /// Every collection, in navigation order.
    pub const ALL: [Self; 14] = [
        Self::Surrealdb,
        Self::Surrealql,
        Self::Surrealist,
        Self::Surrealml,
        Self::Cloud,
        Self::Integrations,
        Self::Tutorials,
        Self::SdkRust,
        Self::SdkJavascript,
        Self::SdkPython,
        Self::SdkGolang,
        Self::SdkDotnet,
        Self::SdkJava,
        Self::SdkPhp,
    ];

    /// Directory name under the content root.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Surrealdb => "doc-surrealdb",
            Self::Surrealql => "doc-surrealql",
            Self::Surrealist => "doc-surrealist",
            Self::Surrealml => "doc-surrealml",
            Self::Cloud => "doc-cloud",
            Self::Integrations => "doc-integrations",
            Self::Tutorials => "doc-tutorials",
            Self::SdkRust => "doc-sdk-rust",
            Self::SdkJavascript => "doc-sdk-javascript",
            Self::SdkPython => "doc-sdk-python",
            Self::SdkGolang => "doc-sdk-golang",
            Self::SdkDotnet => "doc-sdk-dotnet",
            Self::SdkJava => "doc-sdk-java",
            Self::SdkPhp => "doc-sdk-php",
        }
    }

    /// URL prefix below the site base path, without slashes at either end.
    #[must_use]
    pub fn url_prefix(self) -> &'static str {
        match self {
            Self::Surrealdb => "surrealdb",
            Self::Surrealql => "surrealql",
            Self::Surrealist => "surrealist",
            Self::Surrealml => "surrealml",
            Self::Cloud => "cloud",
            Self::Integrations => "integrations",
            Self::Tutorials => "tutorials",
            Self::SdkRust => "sdk/rust",
            Self::SdkJavascript => "sdk/javascript",
            Self::SdkPython => "sdk/python",
            Self::SdkGolang => "sdk/golang",
            Self::SdkDotnet => "sdk/dotnet",
            Self::SdkJava => "sdk/java",
            Self::SdkPhp => "sdk/php",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Surrealdb => "SurrealDB",
            Self::Surrealql => "SurrealQL",
            Self::Surrealist => "Surrealist",
            Self::Surrealml => "SurrealML",
            Self::Cloud => "Cloud",
            Self::Integrations => "Integrations",
            Self::Tutorials => "Tutorials",
            Self::SdkRust => "Rust SDK",
            Self::SdkJavascript => "JavaScript SDK",
            Self::SdkPython => "Python SDK",
            Self::SdkGolang => "Go SDK",
            Self::SdkDotnet => ".NET SDK",
            Self::SdkJava => "Java SDK",
            Self::SdkPhp => "PHP SDK",
        }
    }

    /// Look up a collection by its content directory name.
    #[must_use]
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.dir_name() == name)
    }

    /// Look up a collection by its exact URL prefix.
    #[must_use]
    pub fn from_url_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.url_prefix() == prefix)
    }

    /// Parse and validate a frontmatter block against this collection's schema.
    ///
    /// # Errors
    ///
    /// Returns the YAML error for malformed YAML, wrong field types or
    /// unknown fields.
    pub fn parse_frontmatter(self, yaml: &str) -> Result<Frontmatter, serde_yaml::Error> {
        match self {
            Self::Surrealdb
            | Self::Surrealql
            | Self::Surrealist
            | Self::Surrealml
            | Self::Cloud
            | Self::Integrations
            | Self::Tutorials
            | Self::SdkRust
            | Self::SdkJavascript
            | Self::SdkPython
            | Self::SdkGolang
            | Self::SdkDotnet
            | Self::SdkJava
            | Self::SdkPhp => frontmatter::parse_docs(yaml),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_dir_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(
                Collection::from_dir_name(collection.dir_name()),
                Some(collection)
            );
        }
    }

    #[test]
    fn test_url_prefixes_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(
                Collection::from_url_prefix(collection.url_prefix()),
                Some(collection)
            );
        }
    }

    #[test]
    fn test_prefixes_are_unique() {
        let prefixes: HashSet<_> = Collection::ALL.iter().map(|c| c.url_prefix()).collect();

        assert_eq!(prefixes.len(), Collection::ALL.len());
    }

    #[test]
    fn test_unknown_names() {
        assert_eq!(Collection::from_dir_name("doc-unknown"), None);
        assert_eq!(Collection::from_dir_name("surrealql"), None);
        assert_eq!(Collection::from_url_prefix("sdk"), None);
    }

    #[test]
    fn test_sdk_prefix_is_nested() {
        assert_eq!(Collection::SdkRust.dir_name(), "doc-sdk-rust");
        assert_eq!(Collection::SdkRust.url_prefix(), "sdk/rust");
    }

    #[test]
    fn test_display_and_serialize_use_dir_name() {
        assert_eq!(Collection::Cloud.to_string(), "doc-cloud");
        assert_eq!(
            serde_json::to_value(Collection::SdkPython).unwrap(),
            serde_json::json!("doc-sdk-python")
        );
    }
}
