//! Configuration management for the docs site.
//!
//! Parses `docsite.toml` with serde and discovers it in the current directory
//! or any parent. CLI arguments are applied on top via [`CliSettings`].
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [site]
//! base_path = "/docs"
//! site_url = "https://surrealdb.com"
//! content_dir = "content"
//! default_collection = "surrealdb"
//! edit_url_base = "https://github.com/surrealdb/docs.surrealdb.com/edit/main/src/content"
//!
//! [redirects]
//! "docs/integration/sdks" = "/docs/surrealdb/integration/sdks"
//!
//! [search]
//! url = "${SEARCH_URL}"
//! namespace = "docs"
//! database = "search"
//! username = "${SEARCH_USER:-root}"
//! password = "${SEARCH_PASS}"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` expands to the value of VAR and fails if it is unset;
//! `${VAR:-default}` falls back to `default`. Expanded fields:
//! - `server.host`
//! - `site.site_url`
//! - `site.edit_url_base`
//! - every `search.*` string

mod expand;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ds_content::Collection;
use serde::Deserialize;

use crate::expand::{expand_env, expand_opt};

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "docsite.toml";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Override the content root.
    pub content_dir: Option<PathBuf>,
    pub live_reload_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// Site section as written in TOML.
    site: SiteConfigRaw,
    pub live_reload: LiveReloadConfig,
    /// Legacy path to target URL.
    pub redirects: HashMap<String, String>,
    /// Search indexing endpoint (optional section).
    pub search: Option<SearchConfig>,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    base_path: Option<String>,
    site_url: Option<String>,
    content_dir: Option<String>,
    default_collection: Option<String>,
    edit_url_base: Option<String>,
}

/// Resolved site configuration.
#[derive(Debug)]
pub struct SiteConfig {
    /// URL path all pages live under, without trailing slash.
    pub base_path: String,
    pub site_url: String,
    /// Absolute content root holding the `doc-*` directories.
    pub content_dir: PathBuf,
    pub default_collection: Collection,
    pub edit_url_base: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_path: "/docs".to_owned(),
            site_url: "http://localhost:8080".to_owned(),
            content_dir: PathBuf::from("content"),
            default_collection: Collection::Surrealdb,
            edit_url_base: None,
        }
    }
}

/// Live reload configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LiveReloadConfig {
    /// Rebuild the site when content changes.
    pub enabled: bool,
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Search indexing endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    /// HTTP endpoint accepting record batches.
    pub url: String,
    pub namespace: String,
    pub database: String,
    #[serde(default = "default_search_table")]
    pub table: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Records per request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl SearchConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or malformed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.url, "search.url")?;
        require_http_url(&self.url, "search.url")?;
        require_non_empty(&self.namespace, "search.namespace")?;
        require_non_empty(&self.database, "search.database")?;
        require_non_empty(&self.table, "search.table")?;
        require_identifier(&self.table, "search.table")?;
        if self.batch_size == 0 {
            return Err(ConfigError::Validation(
                "search.batch_size must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.url = expand_env(&self.url, "search.url")?;
        self.namespace = expand_env(&self.namespace, "search.namespace")?;
        self.database = expand_env(&self.database, "search.database")?;
        self.table = expand_env(&self.table, "search.table")?;
        expand_opt(&mut self.username, "search.username")?;
        expand_opt(&mut self.password, "search.password")?;
        Ok(())
    }
}

fn default_search_table() -> String {
    "page".to_owned()
}

fn default_batch_size() -> usize {
    100
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path, e.g. `search.password`.
        field: String,
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// `[A-Za-z_][A-Za-z0-9_]*`, so the value can be spliced into a query.
fn require_identifier(value: &str, field: &str) -> Result<(), ConfigError> {
    let mut chars = value.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(ConfigError::Validation(format!(
            "{field} must be an identifier (letters, digits and underscores, not starting with a digit)"
        )));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// `/docs/` and `docs` both become `/docs`; the site root is the empty string.
fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `docsite.toml` in the current directory and its parents, falling
    /// back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, or if
    /// parsing, expansion or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(content_dir) = &settings.content_dir {
            self.site_resolved.content_dir.clone_from(content_dir);
        }
        if let Some(enabled) = settings.live_reload_enabled {
            self.live_reload.enabled = enabled;
        }
    }

    /// Get the validated `[search]` section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_search(&self) -> Result<&SearchConfig, ConfigError> {
        let search = self.search.as_ref().ok_or_else(|| {
            ConfigError::Validation("[search] section required in config".to_owned())
        })?;
        search.validate()?;
        Ok(search)
    }

    /// Search for the config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfigRaw::default(),
            live_reload: LiveReloadConfig::default(),
            redirects: HashMap::new(),
            search: None,
            site_resolved: SiteConfig {
                content_dir: base.join("content"),
                ..SiteConfig::default()
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[search]` section is only checked by [`Config::require_search`],
    /// so commands that never index do not need it to be complete.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        let site = &self.site_resolved;
        require_non_empty(&site.site_url, "site.site_url")?;
        require_http_url(&site.site_url, "site.site_url")?;
        if let Some(edit_url_base) = &site.edit_url_base {
            require_http_url(edit_url_base, "site.edit_url_base")?;
        }
        for (from, to) in &self.redirects {
            if !to.starts_with('/') && !to.starts_with("http://") && !to.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "redirect target for {from:?} must be an absolute path or URL"
                )));
            }
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand_env(&self.server.host, "server.host")?;
        expand_opt(&mut self.site.site_url, "site.site_url")?;
        expand_opt(&mut self.site.edit_url_base, "site.edit_url_base")?;
        if let Some(search) = &mut self.search {
            search.expand_env_vars()?;
        }
        Ok(())
    }

    /// Turn the raw `[site]` section into [`SiteConfig`], resolving the
    /// content directory against `config_dir`.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let defaults = SiteConfig::default();
        let raw = &self.site;

        let default_collection = match raw.default_collection.as_deref() {
            Some(prefix) => Collection::from_url_prefix(prefix).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "site.default_collection {prefix:?} is not a known collection"
                ))
            })?,
            None => defaults.default_collection,
        };

        self.site_resolved = SiteConfig {
            base_path: raw
                .base_path
                .as_deref()
                .map_or(defaults.base_path, normalize_base_path),
            site_url: raw
                .site_url
                .as_deref()
                .map_or(defaults.site_url, |url| url.trim_end_matches('/').to_owned()),
            content_dir: config_dir.join(raw.content_dir.as_deref().unwrap_or("content")),
            default_collection,
            edit_url_base: raw.edit_url_base.clone(),
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/project"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site_resolved.base_path, "/docs");
        assert_eq!(
            config.site_resolved.content_dir,
            PathBuf::from("/project/content")
        );
        assert_eq!(config.site_resolved.default_collection, Collection::Surrealdb);
        assert!(config.live_reload.enabled);
        assert!(config.redirects.is_empty());
        assert!(config.search.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve(Path::new("/project")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site_resolved.base_path, "/docs");
        assert_eq!(config.site_resolved.site_url, "http://localhost:8080");
    }

    #[test]
    fn test_resolve_site_section() {
        let toml = r#"
[site]
base_path = "/documentation/"
site_url = "https://surrealdb.com/"
content_dir = "src/content"
default_collection = "sdk/rust"
edit_url_base = "https://github.com/surrealdb/docs/edit/main/src/content"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project")).unwrap();

        let site = &config.site_resolved;
        assert_eq!(site.base_path, "/documentation");
        assert_eq!(site.site_url, "https://surrealdb.com");
        assert_eq!(site.content_dir, PathBuf::from("/project/src/content"));
        assert_eq!(site.default_collection, Collection::SdkRust);
        assert_eq!(
            site.edit_url_base.as_deref(),
            Some("https://github.com/surrealdb/docs/edit/main/src/content")
        );
    }

    #[test]
    fn test_root_base_path() {
        let mut config: Config = toml::from_str("[site]\nbase_path = \"/\"\n").unwrap();
        config.resolve(Path::new("/project")).unwrap();
        assert_eq!(config.site_resolved.base_path, "");
    }

    #[test]
    fn test_unknown_default_collection() {
        let mut config: Config =
            toml::from_str("[site]\ndefault_collection = \"nosql\"\n").unwrap();
        let err = config.resolve(Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("nosql"));
    }

    #[test]
    fn test_parse_redirects() {
        let toml = r#"
[redirects]
"docs/integration/sdks" = "/docs/surrealdb/integration/sdks"
"docs/cloud/faq" = "/docs/cloud"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.redirects.len(), 2);
        assert_eq!(
            config.redirects.get("docs/cloud/faq").map(String::as_str),
            Some("/docs/cloud")
        );
    }

    #[test]
    fn test_relative_redirect_target_rejected() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config
            .redirects
            .insert("old".to_owned(), "docs/new".to_owned());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("old"));
    }

    #[test]
    fn test_port_zero_rejected() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.server.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_site_url_must_be_http() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[site]\nsite_url = \"surrealdb.com\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("site.site_url"));
    }

    #[test]
    fn test_search_section_defaults() {
        let toml = r#"
[search]
url = "https://search.example.com/sql"
namespace = "docs"
database = "search"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let search = config.require_search().unwrap();
        assert_eq!(search.table, "page");
        assert_eq!(search.batch_size, 100);
        assert!(search.username.is_none());
    }

    #[test]
    fn test_require_search_missing() {
        let config = Config::default_with_base(Path::new("/project"));
        let err = config.require_search().unwrap_err();
        assert!(err.to_string().contains("[search]"));
    }

    #[test]
    fn test_require_search_invalid_url() {
        let toml = r#"
[search]
url = "search.example.com"
namespace = "docs"
database = "search"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.require_search().unwrap_err();
        assert!(err.to_string().contains("search.url"));
    }

    #[test]
    fn test_search_table_must_be_identifier() {
        let search = |table: &str| SearchConfig {
            url: "https://search.example.com/sql".to_owned(),
            namespace: "docs".to_owned(),
            database: "search".to_owned(),
            table: table.to_owned(),
            username: None,
            password: None,
            batch_size: 100,
        };
        for table in ["page", "_docs", "page_v2"] {
            assert!(search(table).validate().is_ok(), "{table}");
        }
        for table in ["2page", "page; REMOVE TABLE user", "page-v2", "pagé"] {
            let err = search(table).validate().unwrap_err();
            assert!(err.to_string().contains("search.table"), "{table}");
        }
    }

    #[test]
    fn test_load_expands_search_credentials() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("DS_CONFIG_TEST_PASS", "s3cret");
            std::env::remove_var("DS_CONFIG_TEST_USER");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[search]
url = "https://search.example.com/sql"
namespace = "docs"
database = "search"
username = "${DS_CONFIG_TEST_USER:-root}"
password = "${DS_CONFIG_TEST_PASS}"
"#,
        );

        let config = Config::load(Some(&path), None).unwrap();
        let search = config.require_search().unwrap();
        assert_eq!(search.username.as_deref(), Some("root"));
        assert_eq!(search.password.as_deref(), Some("s3cret"));

        unsafe {
            std::env::remove_var("DS_CONFIG_TEST_PASS");
        }
    }

    #[test]
    fn test_load_missing_env_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("DS_CONFIG_TEST_MISSING_URL");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[site]\nsite_url = \"${DS_CONFIG_TEST_MISSING_URL}\"\n",
        );
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "site.site_url"));
    }

    #[test]
    fn test_load_resolves_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[site]\ncontent_dir = \"src/content\"\n");

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(
            config.site_resolved.content_dir,
            dir.path().join("src/content")
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::load(Some(&missing), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == missing));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[server\nport = 1");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_cli_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[server]\nhost = \"0.0.0.0\"\nport = 9000\n\n[live_reload]\nenabled = true\n",
        );
        let settings = CliSettings {
            port: Some(3000),
            content_dir: Some(PathBuf::from("/elsewhere/content")),
            live_reload_enabled: Some(false),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.site_resolved.content_dir,
            PathBuf::from("/elsewhere/content")
        );
        assert!(!config.live_reload.enabled);
    }

    #[test]
    fn test_cli_settings_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let settings = CliSettings {
            host: Some(String::new()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let nested = dir.path().join("content/doc-surrealql");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_config(&nested), Some(path));
    }

    #[test]
    fn test_discover_config_none() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        // A docsite.toml above the temp dir would be found; none is expected there.
        let found = Config::discover_config(&nested);
        assert!(found.is_none_or(|p| !p.starts_with(dir.path())));
    }
}
