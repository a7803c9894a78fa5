//! `OpenRouter` provider implementation (OpenAI-compatible chat API).

use serde::{Deserialize, Serialize};

use super::LlmProvider;
use crate::AiError;

/// Referer sent with every request, required by `OpenRouter` for
/// free-tier usage accounting.
const DEFAULT_REFERER: &str = "https://relief-map.org";

/// `OpenRouter` API provider.
pub struct OpenRouterProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenRouterProvider {
    /// Creates a new `OpenRouter` provider.
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl LlmProvider for OpenRouterProvider {
    async fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, AiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            max_tokens: 1024,
        };

        let referer =
            std::env::var("RELIEF_MAP_REFERER").unwrap_or_else(|_| DEFAULT_REFERER.to_string());

        let resp = self
            .client
            .post("https://openrouter.ai/api/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", referer)
            .header("X-Title", "Relief Finder AI Chat")
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: ApiError = serde_json::from_str(&body).unwrap_or_else(|_| ApiError {
                error: ApiErrorDetail {
                    message: format!("HTTP {status}: {body}"),
                },
            });
            return Err(AiError::Provider {
                message: err.error.message,
            });
        }

        let response: ChatResponse = serde_json::from_str(&body)?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AiError::Provider {
                message: "Empty completion from OpenRouter".to_string(),
            })?;

        Ok(content.trim().to_string())
    }
}
