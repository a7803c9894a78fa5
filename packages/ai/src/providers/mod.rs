//! LLM provider abstraction and implementations.
//!
//! The assistant only needs single-turn completions (route a query,
//! summarize a hit), so the trait is a plain system + user prompt pair.

pub mod openrouter;

use crate::AiError;

/// Default model when `AI_MODEL` is not set.
const DEFAULT_MODEL: &str = "mistralai/mistral-small-3.2-24b-instruct:free";

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Sends a single-turn completion request.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails.
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, AiError>;
}

/// Creates an LLM provider from environment variables.
///
/// Requires `OPENROUTER_API_KEY`. The model defaults to a free-tier
/// Mistral and can be overridden with `AI_MODEL`.
///
/// # Errors
///
/// Returns [`AiError::Config`] if no API key is configured.
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, AiError> {
    let api_key = std::env::var("OPENROUTER_API_KEY").map_err(|_| AiError::Config {
        message: "OPENROUTER_API_KEY environment variable not set".to_string(),
    })?;
    let model = std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    log::info!("Using OpenRouter model {model}");
    Ok(Box::new(openrouter::OpenRouterProvider::new(api_key, model)))
}
