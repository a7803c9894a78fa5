#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Search-index publishing.
//!
//! Canonical records are shaped into flat JSON search documents (see
//! [`document`]) and pushed through the [`SearchIndex`] seam. The hosted
//! search service is an external collaborator; [`MemoryIndex`] stands in
//! for it in tests and local runs.

pub mod document;

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Index name for disaster alert documents.
pub const DISASTER_INDEX: &str = "disaster_alerts";
/// Index name for relief shelter documents.
pub const SHELTER_INDEX: &str = "relief_shelters";

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A previous panic left the index lock poisoned.
    #[error("index lock poisoned")]
    Poisoned,

    /// A document was missing its `objectID`.
    #[error("document has no objectID: {document}")]
    MissingObjectId {
        /// The offending document.
        document: String,
    },
}

/// Sort direction for a custom ranking criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingDirection {
    /// Higher values rank first.
    Desc,
    /// Lower values rank first.
    Asc,
}

/// One attribute in the custom ranking chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingCriterion {
    /// Document attribute to compare.
    pub attribute: String,
    /// Sort direction.
    pub direction: RankingDirection,
}

/// Relevance configuration applied to an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSettings {
    /// Attributes matched against the query, in priority order.
    pub searchable_attributes: Vec<String>,
    /// Attributes exposed for faceted filtering.
    pub attributes_for_faceting: Vec<String>,
    /// Tie-break ordering among equally relevant hits.
    pub custom_ranking: Vec<RankingCriterion>,
}

/// Relevance settings for the disaster alert index: text match over the
/// alert fields, facet by category, newest first among equal matches.
#[must_use]
pub fn disaster_settings() -> IndexSettings {
    IndexSettings {
        searchable_attributes: vec![
            "title".to_string(),
            "description".to_string(),
            "location".to_string(),
            "disasterType".to_string(),
        ],
        attributes_for_faceting: vec!["disasterType".to_string()],
        custom_ranking: vec![RankingCriterion {
            attribute: "disaster_time_timestamp".to_string(),
            direction: RankingDirection::Desc,
        }],
    }
}

/// Relevance settings for the shelter index: text match over identity
/// and services, facet by capability flags, most available space first.
#[must_use]
pub fn shelter_settings() -> IndexSettings {
    IndexSettings {
        searchable_attributes: vec![
            "name".to_string(),
            "address".to_string(),
            "source".to_string(),
        ],
        attributes_for_faceting: vec![
            "hasBed".to_string(),
            "hasFood".to_string(),
            "hasWater".to_string(),
            "hasMedical".to_string(),
            "acceptsFamilies".to_string(),
            "isOpen".to_string(),
        ],
        custom_ranking: vec![
            RankingCriterion {
                attribute: "availableSpaces".to_string(),
                direction: RankingDirection::Desc,
            },
            RankingCriterion {
                attribute: "totalSpaces".to_string(),
                direction: RankingDirection::Asc,
            },
        ],
    }
}

/// A search index holding flat JSON documents keyed by `objectID`.
///
/// Saving a document with an existing `objectID` replaces it, so
/// publishing is idempotent.
pub trait SearchIndex: Send + Sync {
    /// Upserts a batch of documents.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if a document lacks an `objectID` or the
    /// index cannot be written.
    fn save_objects(&self, documents: &[serde_json::Value]) -> Result<(), IndexError>;

    /// Applies relevance settings to the index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the index cannot be configured.
    fn apply_settings(&self, settings: &IndexSettings) -> Result<(), IndexError>;

    /// Runs a text query, returning at most `hits_per_page` documents.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the index cannot be read.
    fn search(&self, query: &str, hits_per_page: usize)
        -> Result<Vec<serde_json::Value>, IndexError>;

    /// Number of documents currently in the index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the index cannot be read.
    fn len(&self) -> Result<usize, IndexError>;

    /// Whether the index holds no documents.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if the index cannot be read.
    fn is_empty(&self) -> Result<bool, IndexError> {
        Ok(self.len()? == 0)
    }
}

/// In-memory search index used by tests and local runs.
///
/// Ranking is deliberately simple: hits are scored by how many query
/// tokens appear in the searchable attributes (substring match,
/// case-insensitive), then ordered by the custom ranking chain.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    inner: Mutex<MemoryIndexInner>,
}

#[derive(Debug, Default)]
struct MemoryIndexInner {
    documents: HashMap<String, serde_json::Value>,
    settings: IndexSettings,
}

impl MemoryIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Number of query tokens found in the document's searchable attributes.
fn score(document: &serde_json::Value, tokens: &[String], searchable: &[String]) -> usize {
    let haystack: String = searchable
        .iter()
        .filter_map(|attr| document.get(attr))
        .filter_map(serde_json::Value::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    tokens.iter().filter(|t| haystack.contains(t.as_str())).count()
}

/// Compares two documents by the custom ranking chain.
fn compare_by_ranking(
    a: &serde_json::Value,
    b: &serde_json::Value,
    ranking: &[RankingCriterion],
) -> std::cmp::Ordering {
    for criterion in ranking {
        let left = a
            .get(&criterion.attribute)
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);
        let right = b
            .get(&criterion.attribute)
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(0.0);
        let ordering = match criterion.direction {
            RankingDirection::Desc => right.total_cmp(&left),
            RankingDirection::Asc => left.total_cmp(&right),
        };
        if ordering != std::cmp::Ordering::Equal {
            return ordering;
        }
    }
    std::cmp::Ordering::Equal
}

impl SearchIndex for MemoryIndex {
    fn save_objects(&self, documents: &[serde_json::Value]) -> Result<(), IndexError> {
        let mut inner = self.inner.lock().map_err(|_| IndexError::Poisoned)?;
        for document in documents {
            let id = document
                .get("objectID")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| IndexError::MissingObjectId {
                    document: document.to_string(),
                })?;
            inner.documents.insert(id.to_string(), document.clone());
        }
        Ok(())
    }

    fn apply_settings(&self, settings: &IndexSettings) -> Result<(), IndexError> {
        let mut inner = self.inner.lock().map_err(|_| IndexError::Poisoned)?;
        inner.settings = settings.clone();
        Ok(())
    }

    fn search(
        &self,
        query: &str,
        hits_per_page: usize,
    ) -> Result<Vec<serde_json::Value>, IndexError> {
        let inner = self.inner.lock().map_err(|_| IndexError::Poisoned)?;
        let tokens: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(String::from)
            .collect();

        let mut hits: Vec<(usize, &serde_json::Value)> = inner
            .documents
            .values()
            .map(|doc| (score(doc, &tokens, &inner.settings.searchable_attributes), doc))
            .filter(|(s, _)| *s > 0 || tokens.is_empty())
            .collect();

        hits.sort_by(|(score_a, doc_a), (score_b, doc_b)| {
            score_b
                .cmp(score_a)
                .then_with(|| compare_by_ranking(doc_a, doc_b, &inner.settings.custom_ranking))
        });

        Ok(hits
            .into_iter()
            .take(hits_per_page)
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    fn len(&self) -> Result<usize, IndexError> {
        let inner = self.inner.lock().map_err(|_| IndexError::Poisoned)?;
        Ok(inner.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &str, timestamp: i64) -> serde_json::Value {
        serde_json::json!({
            "objectID": id,
            "title": title,
            "disaster_time_timestamp": timestamp,
        })
    }

    fn index_with_docs() -> MemoryIndex {
        let index = MemoryIndex::new();
        index.apply_settings(&disaster_settings()).unwrap();
        index
            .save_objects(&[
                doc("1", "Earthquake in Papua New Guinea", 100),
                doc("2", "Flooding in Sindh, Pakistan", 300),
                doc("3", "Earthquake aftershocks continue", 200),
            ])
            .unwrap();
        index
    }

    #[test]
    fn save_is_idempotent_by_object_id() {
        let index = index_with_docs();
        index
            .save_objects(&[doc("1", "Earthquake in Papua New Guinea", 100)])
            .unwrap();
        assert_eq!(index.len().unwrap(), 3);
    }

    #[test]
    fn document_without_object_id_is_rejected() {
        let index = MemoryIndex::new();
        let bad = serde_json::json!({"title": "no id"});
        assert!(index.save_objects(&[bad]).is_err());
    }

    #[test]
    fn search_matches_query_tokens() {
        let index = index_with_docs();
        let hits = index.search("earthquake", 10).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn equal_matches_order_by_custom_ranking() {
        let index = index_with_docs();
        let hits = index.search("earthquake", 10).unwrap();
        // Both hits match one token; the newer timestamp ranks first.
        assert_eq!(hits[0]["objectID"], "3");
        assert_eq!(hits[1]["objectID"], "1");
    }

    #[test]
    fn hits_per_page_truncates() {
        let index = index_with_docs();
        let hits = index.search("earthquake", 1).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn unmatched_query_returns_nothing() {
        let index = index_with_docs();
        assert!(index.search("volcano", 10).unwrap().is_empty());
    }
}
