//! Plain JSON API adapter.
//!
//! Handles endpoints that return either a bare array of records or a
//! wrapper object with the array at a configurable dot-path (e.g.
//! `"result.records"` for CKAN-style datastores).

use crate::{FeedError, FetchOptions};

/// Configuration for a JSON API fetch.
#[derive(Debug)]
pub struct JsonApiConfig<'a> {
    /// Endpoint URL.
    pub url: &'a str,
    /// Dot-path to the records array, `None` for a bare array body.
    pub records_path: Option<&'a str>,
    /// Human-readable feed name for logging.
    pub label: &'a str,
}

/// Resolves the records array from a response body.
///
/// # Errors
///
/// Returns [`FeedError::Config`] when the path does not lead to an
/// array.
pub fn resolve_records(
    body: serde_json::Value,
    records_path: Option<&str>,
) -> Result<Vec<serde_json::Value>, FeedError> {
    let target = match records_path {
        None => body,
        Some(path) => {
            let mut node = &body;
            for segment in path.split('.') {
                node = node.get(segment).ok_or_else(|| FeedError::Config {
                    message: format!("records path segment {segment:?} not found"),
                })?;
            }
            node.clone()
        }
    };
    match target {
        serde_json::Value::Array(records) => Ok(records),
        other => Err(FeedError::Config {
            message: format!("expected a JSON array of records, got {other}"),
        }),
    }
}

/// Fetches a JSON API endpoint and returns its records.
///
/// # Errors
///
/// Returns [`FeedError`] if the endpoint cannot be fetched, the body is
/// not JSON, or the configured records path does not lead to an array.
pub async fn fetch_json_api(
    config: &JsonApiConfig<'_>,
    options: &FetchOptions,
) -> Result<Vec<serde_json::Value>, FeedError> {
    let body: serde_json::Value = crate::http_client()?
        .get(config.url)
        .send()
        .await?
        .json()
        .await?;
    let mut records = resolve_records(body, config.records_path)?;
    log::info!("{}: fetched {} records", config.label, records.len());
    if let Some(limit) = options.limit {
        records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_bare_array() {
        let body = serde_json::json!([{"a": 1}, {"a": 2}]);
        let records = resolve_records(body, None).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn resolves_nested_path() {
        let body = serde_json::json!({"result": {"records": [{"a": 1}]}});
        let records = resolve_records(body, Some("result.records")).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_path_segment_is_an_error() {
        let body = serde_json::json!({"result": {}});
        assert!(resolve_records(body, Some("result.records")).is_err());
    }

    #[test]
    fn non_array_target_is_an_error() {
        let body = serde_json::json!({"records": {"a": 1}});
        assert!(resolve_records(body, Some("records")).is_err());
    }
}
