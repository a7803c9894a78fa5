#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! AI chat assistant over the search indexes.
//!
//! A user question is routed to the right index by a small LLM call,
//! the index is searched, and a second LLM call summarizes the top hit
//! into a conversational answer. Every LLM failure degrades to a fixed
//! fallback string; the assistant never surfaces a raw provider error
//! to the user.

pub mod providers;
pub mod router;
pub mod summarizer;

/// Errors that can occur during AI operations.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The LLM provider returned an error.
    #[error("Provider error: {message}")]
    Provider {
        /// Error message from the provider.
        message: String,
    },

    /// Missing or invalid configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what is misconfigured.
        message: String,
    },

    /// Searching the index failed.
    #[error(transparent)]
    Index(#[from] relief_map_index::IndexError),
}
