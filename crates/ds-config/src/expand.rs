//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// An unset variable without a default is an error naming `field`.
/// Strings without `${` are returned as-is, so a bare `$` in a URL or
/// password survives untouched.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, Unset> {
        std::env::var(var).map(Some).map_err(|_| Unset(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.0),
    })
}

/// Expand an optional value in place.
pub(crate) fn expand_opt(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(v) = value.as_deref() {
        *value = Some(expand_env(v, field)?);
    }
    Ok(())
}

/// Variable that was referenced but not set.
struct Unset(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("DS_TEST_SIMPLE", "hello");
        }
        let result = expand_env("${DS_TEST_SIMPLE}", "test.field").unwrap();
        assert_eq!(result, "hello");
        unsafe {
            std::env::remove_var("DS_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("DS_TEST_UNSET_DEFAULT");
        }
        let result = expand_env("${DS_TEST_UNSET_DEFAULT:-root}", "search.username").unwrap();
        assert_eq!(result, "root");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("DS_TEST_MISSING");
        }
        let err = expand_env("${DS_TEST_MISSING}", "search.password").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("DS_TEST_MISSING"));
        assert!(message.contains("search.password"));
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("DS_TEST_HOST", "search.internal");
        }
        let result = expand_env("https://${DS_TEST_HOST}:8000/sql", "search.url").unwrap();
        assert_eq!(result, "https://search.internal:8000/sql");
        unsafe {
            std::env::remove_var("DS_TEST_HOST");
        }
    }

    #[test]
    fn test_bare_dollar_unchanged() {
        let result = expand_env("pa$$word", "search.password").unwrap();
        assert_eq!(result, "pa$$word");
    }

    #[test]
    fn test_expand_opt_none() {
        let mut value = None;
        expand_opt(&mut value, "site.edit_url_base").unwrap();
        assert!(value.is_none());
    }
}
