#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Relief data feed definitions and wire-format adapters.
//!
//! Each feed is described by a TOML config embedded at compile time (see
//! [`registry`]). A single generic implementation per wire format (RSS,
//! `GeoJSON`, plain JSON APIs) handles all feeds, so onboarding a new
//! provider means writing a config file, not code.

pub mod feed_def;
pub mod geojson_source;
pub mod json_api;
pub mod normalize;
pub mod registry;
pub mod rss;

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Timeout for feed fetches. A hung provider must not stall a full
/// sync run.
pub(crate) const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Shorter timeout for per-item detail API calls, which degrade a
/// single item on failure.
pub(crate) const DETAIL_TIMEOUT: Duration = Duration::from_secs(20);

/// Builds the HTTP client used by all fetchers.
pub(crate) fn http_client() -> Result<reqwest::Client, FeedError> {
    Ok(reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?)
}

/// Errors that can occur while fetching or adapting feed data.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML parsing failed.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Feed config parsing failed.
    #[error("Feed config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Configuration for fetching data from a feed.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Only keep items newer than this timestamp. Items without a
    /// parseable timestamp are kept.
    pub since: Option<DateTime<Utc>>,
    /// Maximum number of items to fetch.
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_client_builds_with_request_timeout() {
        assert!(http_client().is_ok());
        assert!(DETAIL_TIMEOUT <= FETCH_TIMEOUT);
    }
}
