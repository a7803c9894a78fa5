//! The chat pipeline: route, search, summarize.

use std::sync::Arc;

use relief_map_index::SearchIndex;

use crate::AiError;
use crate::providers::LlmProvider;
use crate::router::{TargetIndex, route_query};

/// System prompt template for the summarization call.
const RESPONSE_PROMPT: &str = include_str!("../prompts/response_prompt.txt");

/// Hits requested from the index; only the top hit is summarized, the
/// rest are margin for index-side ranking noise.
const HITS_PER_PAGE: usize = 5;

/// Reply when the routed index has no matching documents.
pub const NO_RESULTS_MESSAGE: &str = "No results found for your query.";

/// Reply when a hit exists but the summarization call failed.
pub const SUMMARY_FAILED_MESSAGE: &str = "We found data, but couldn't generate a summary.";

/// Fills the response prompt template.
#[must_use]
pub fn render_response_prompt(index_name: &str, query: &str, top_result_json: &str) -> String {
    RESPONSE_PROMPT
        .replace("{{index_name}}", index_name)
        .replace("{{query}}", query)
        .replace("{{top_result_json}}", top_result_json)
}

/// The assistant: an LLM provider plus the two published indexes.
pub struct ChatAssistant {
    provider: Box<dyn LlmProvider>,
    disaster_index: Arc<dyn SearchIndex>,
    shelter_index: Arc<dyn SearchIndex>,
}

impl ChatAssistant {
    /// Creates an assistant over the given provider and indexes.
    #[must_use]
    pub fn new(
        provider: Box<dyn LlmProvider>,
        disaster_index: Arc<dyn SearchIndex>,
        shelter_index: Arc<dyn SearchIndex>,
    ) -> Self {
        Self {
            provider,
            disaster_index,
            shelter_index,
        }
    }

    /// Answers a user question.
    ///
    /// Routing and summarization failures degrade to fixed fallback
    /// strings; only index failures surface as errors.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Index`] if the routed index cannot be
    /// searched.
    pub async fn answer(&self, query: &str) -> Result<String, AiError> {
        let target = route_query(self.provider.as_ref(), query).await;
        let index: &dyn SearchIndex = match target {
            TargetIndex::Disasters => self.disaster_index.as_ref(),
            TargetIndex::Shelters => self.shelter_index.as_ref(),
        };

        let hits = index.search(query, HITS_PER_PAGE)?;
        let Some(top_hit) = hits.first() else {
            log::info!("No hits in {} for query", target.name());
            return Ok(NO_RESULTS_MESSAGE.to_string());
        };

        let prompt = render_response_prompt(target.name(), query, &top_hit.to_string());
        match self.provider.complete(&prompt, query).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                log::warn!("Summarization failed: {e}");
                Ok(SUMMARY_FAILED_MESSAGE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::FixedProvider;
    use relief_map_index::{MemoryIndex, shelter_settings};

    fn shelter_index_with_doc() -> Arc<MemoryIndex> {
        let index = MemoryIndex::new();
        index.apply_settings(&shelter_settings()).unwrap();
        index
            .save_objects(&[serde_json::json!({
                "objectID": "Camp A|12 Main St",
                "name": "Camp A",
                "address": "12 Main St",
                "hasBed": true,
                "availableSpaces": 40,
            })])
            .unwrap();
        Arc::new(index)
    }

    #[test]
    fn template_placeholders_are_filled() {
        let prompt = render_response_prompt("relief_shelters", "beds?", "{\"name\":\"Camp A\"}");
        assert!(prompt.contains("relief_shelters"));
        assert!(prompt.contains("beds?"));
        assert!(prompt.contains("Camp A"));
        assert!(!prompt.contains("{{"));
    }

    #[tokio::test]
    async fn empty_index_yields_no_results_message() {
        let assistant = ChatAssistant::new(
            Box::new(FixedProvider("relief_shelters")),
            Arc::new(MemoryIndex::new()),
            Arc::new(MemoryIndex::new()),
        );
        let answer = assistant.answer("where can I sleep").await.unwrap();
        assert_eq!(answer, NO_RESULTS_MESSAGE);
    }

    #[tokio::test]
    async fn hit_is_summarized_by_the_provider() {
        let assistant = ChatAssistant::new(
            Box::new(FixedProvider("Camp A on 12 Main St has beds available.")),
            Arc::new(MemoryIndex::new()),
            shelter_index_with_doc(),
        );
        let answer = assistant.answer("Camp A beds").await.unwrap();
        assert_eq!(answer, "Camp A on 12 Main St has beds available.");
    }

    #[tokio::test]
    async fn provider_failure_after_hit_degrades_to_fallback() {
        // FixedProvider("") fails every call: routing falls back to
        // shelters, then summarization fails over the found hit.
        let assistant = ChatAssistant::new(
            Box::new(FixedProvider("")),
            Arc::new(MemoryIndex::new()),
            shelter_index_with_doc(),
        );
        let answer = assistant.answer("Camp A beds").await.unwrap();
        assert_eq!(answer, SUMMARY_FAILED_MESSAGE);
    }
}
