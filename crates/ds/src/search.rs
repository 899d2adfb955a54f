//! Search index client.
//!
//! Pushes search records to a SurrealDB-compatible `/sql` endpoint. The
//! table is cleared and refilled in one transaction, so a failed push
//! leaves the previous index in place.

use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use ds_config::SearchConfig;
use ds_site::SearchRecord;
use serde_json::Value;
use ureq::Agent;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Error from the search endpoint.
#[derive(Debug, thiserror::Error)]
pub(crate) enum SearchError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    /// Server returned an error status.
    #[error("HTTP error: {status} - {body}")]
    Response { status: u16, body: String },

    /// A statement in the batch failed.
    #[error("query failed: {0}")]
    Statement(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) struct SearchClient<'a> {
    agent: Agent,
    config: &'a SearchConfig,
}

impl<'a> SearchClient<'a> {
    pub(crate) fn new(config: &'a SearchConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent, config }
    }

    /// Replace the whole index with `records` in a single transaction.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request or any statement fails; the
    /// transaction is then rolled back.
    pub(crate) fn replace_all(&self, records: &[SearchRecord]) -> Result<usize, SearchError> {
        let sql = replace_statement(&self.config.table, records, self.config.batch_size)?;
        tracing::debug!(
            records = records.len(),
            bytes = sql.len(),
            "Pushing search index"
        );
        self.query(&sql)?;
        Ok(records.len())
    }

    fn query(&self, sql: &str) -> Result<(), SearchError> {
        let mut request = self
            .agent
            .post(&self.config.url)
            .header("Accept", "application/json")
            .header("Surreal-NS", &self.config.namespace)
            .header("Surreal-DB", &self.config.database);
        if let Some(auth) = basic_auth(self.config) {
            request = request.header("Authorization", &auth);
        }

        let response = request.send(sql)?;
        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(SearchError::Response {
                status,
                body: error_body,
            });
        }

        let results: Value = body.read_json()?;
        check_statements(&results)
    }
}

/// Transaction that clears `table` and inserts `records` in batches.
fn replace_statement(
    table: &str,
    records: &[SearchRecord],
    batch_size: usize,
) -> Result<String, serde_json::Error> {
    let mut sql = format!("BEGIN TRANSACTION;\nDELETE {table};\n");
    for batch in records.chunks(batch_size) {
        sql.push_str(&insert_statement(table, batch)?);
        sql.push('\n');
    }
    sql.push_str("COMMIT TRANSACTION;");
    Ok(sql)
}

/// `INSERT` statement for one batch.
fn insert_statement(table: &str, batch: &[SearchRecord]) -> Result<String, serde_json::Error> {
    Ok(format!("INSERT INTO {table} {};", serde_json::to_string(batch)?))
}

/// `Authorization` header value when a username is configured.
fn basic_auth(config: &SearchConfig) -> Option<String> {
    let username = config.username.as_deref()?;
    let password = config.password.as_deref().unwrap_or_default();
    let token = BASE64_STANDARD.encode(format!("{username}:{password}"));
    Some(format!("Basic {token}"))
}

/// The endpoint answers 200 with per-statement results; any `ERR` fails.
fn check_statements(results: &Value) -> Result<(), SearchError> {
    let Some(results) = results.as_array() else {
        return Ok(());
    };
    for result in results {
        if result.get("status").and_then(Value::as_str) == Some("ERR") {
            let detail = match result.get("result") {
                Some(Value::String(message)) => message.clone(),
                Some(other) => other.to_string(),
                None => "unknown error".to_owned(),
            };
            return Err(SearchError::Statement(detail));
        }
    }
    Ok(())
}
