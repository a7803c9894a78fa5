//! Query routing: which index should answer this question?
//!
//! A small LLM call picks between the two indexes. When the provider
//! fails or answers with something unrecognizable, routing falls back
//! to the shelter index — someone asking an unclassifiable question is
//! more likely looking for help than for alert data.

use relief_map_index::{DISASTER_INDEX, SHELTER_INDEX};

use crate::providers::LlmProvider;

/// System prompt for the routing call.
const ROUTER_PROMPT: &str = include_str!("../prompts/router_prompt.txt");

/// The index a query was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetIndex {
    /// Relief shelter index (the fallback).
    #[default]
    Shelters,
    /// Disaster alert index.
    Disasters,
}

impl TargetIndex {
    /// Returns the index name as published.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shelters => SHELTER_INDEX,
            Self::Disasters => DISASTER_INDEX,
        }
    }
}

/// Interprets a routing completion. Unrecognized answers route to
/// shelters.
#[must_use]
pub fn parse_route(response: &str) -> TargetIndex {
    let lowered = response.to_lowercase();
    if lowered.contains(DISASTER_INDEX) || lowered.contains("disaster") {
        TargetIndex::Disasters
    } else {
        TargetIndex::Shelters
    }
}

/// Routes a query by asking the provider which index fits.
///
/// Provider failures are logged and fall back to the shelter index
/// rather than failing the chat request.
pub async fn route_query(provider: &dyn LlmProvider, query: &str) -> TargetIndex {
    match provider.complete(ROUTER_PROMPT, query).await {
        Ok(response) => parse_route(&response),
        Err(e) => {
            log::warn!("Routing call failed, defaulting to shelters: {e}");
            TargetIndex::default()
        }
    }
}

/// A provider stub for tests: always answers with a fixed string.
#[cfg(test)]
pub(crate) struct FixedProvider(pub &'static str);

#[cfg(test)]
#[async_trait::async_trait]
impl LlmProvider for FixedProvider {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, crate::AiError> {
        if self.0.is_empty() {
            return Err(crate::AiError::Provider {
                message: "stub failure".to_string(),
            });
        }
        Ok(self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_index_names() {
        assert_eq!(parse_route("disaster_alerts"), TargetIndex::Disasters);
        assert_eq!(parse_route("relief_shelters"), TargetIndex::Shelters);
    }

    #[test]
    fn parses_verbose_answers() {
        assert_eq!(
            parse_route("The best index is disaster_alerts."),
            TargetIndex::Disasters
        );
        assert_eq!(
            parse_route("I would search relief_shelters for this."),
            TargetIndex::Shelters
        );
    }

    #[test]
    fn unrecognized_answer_defaults_to_shelters() {
        assert_eq!(parse_route("42"), TargetIndex::Shelters);
    }

    #[tokio::test]
    async fn provider_failure_defaults_to_shelters() {
        let provider = FixedProvider("");
        assert_eq!(
            route_query(&provider, "where can I sleep tonight").await,
            TargetIndex::Shelters
        );
    }

    #[tokio::test]
    async fn routes_disaster_questions() {
        let provider = FixedProvider("disaster_alerts");
        assert_eq!(
            route_query(&provider, "any earthquakes near me").await,
            TargetIndex::Disasters
        );
    }

    #[test]
    fn names_match_published_indexes() {
        assert_eq!(TargetIndex::Shelters.name(), "relief_shelters");
        assert_eq!(TargetIndex::Disasters.name(), "disaster_alerts");
    }
}
