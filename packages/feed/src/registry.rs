//! Feed registry — loads all feed definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/feed/feeds/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a new feed is as simple
//! as creating a new TOML file and adding it to the list below.

use crate::feed_def::{parse_feed_toml, FeedDefinition};

/// TOML configs embedded at compile time.
const FEED_TOMLS: &[(&str, &str)] = &[
    // ── Disaster feeds ───────────────────────────────────────────────
    ("gdacs", include_str!("../feeds/gdacs.toml")),
    ("reliefweb", include_str!("../feeds/reliefweb.toml")),
    // ── Shelter feeds ────────────────────────────────────────────────
    ("dc_shelters", include_str!("../feeds/dc_shelters.toml")),
    ("hdx_pakistan", include_str!("../feeds/hdx_pakistan.toml")),
];

/// Total number of configured feeds (used in tests).
#[cfg(test)]
const EXPECTED_FEED_COUNT: usize = 4;

/// Returns all configured feed definitions, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time
/// guarantee since the configs are embedded).
#[must_use]
pub fn all_feeds() -> Vec<FeedDefinition> {
    FEED_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_feed_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the feed definitions enabled for this run.
///
/// An explicit comma-separated `filter` of feed IDs wins; otherwise the
/// `RELIEF_MAP_FEEDS` env var is consulted; otherwise all configured
/// feeds are returned.
#[must_use]
pub fn enabled_feeds(filter: Option<String>) -> Vec<FeedDefinition> {
    let feeds = all_feeds();
    let Some(filter) = filter.or_else(|| std::env::var("RELIEF_MAP_FEEDS").ok()) else {
        return feeds;
    };
    let wanted: Vec<&str> = filter.split(',').map(str::trim).collect();
    feeds
        .into_iter()
        .filter(|feed| wanted.contains(&feed.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed_def::{FeedKind, FetcherConfig};

    #[test]
    fn loads_all_feeds() {
        assert_eq!(all_feeds().len(), EXPECTED_FEED_COUNT);
    }

    #[test]
    fn feed_ids_are_unique() {
        let feeds = all_feeds();
        let mut ids: Vec<&str> = feeds.iter().map(|f| f.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EXPECTED_FEED_COUNT);
    }

    #[test]
    fn all_feeds_have_required_fields() {
        for feed in &all_feeds() {
            assert!(!feed.id.is_empty(), "feed id is empty");
            assert!(!feed.name.is_empty(), "feed name is empty");
        }
    }

    #[test]
    fn shelter_feeds_map_identity_fields() {
        for feed in all_feeds().iter().filter(|f| f.kind == FeedKind::Shelter) {
            assert!(!feed.fields.name.is_empty(), "{}: no name fields", feed.id);
            assert!(
                !feed.fields.address.is_empty(),
                "{}: no address fields",
                feed.id
            );
        }
    }

    #[test]
    fn explicit_filter_selects_feeds() {
        let feeds = enabled_feeds(Some("gdacs, dc_shelters".to_string()));
        let ids: Vec<&str> = feeds.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["gdacs", "dc_shelters"]);
    }

    #[test]
    fn gdacs_uses_detail_api() {
        let feeds = all_feeds();
        let gdacs = feeds.iter().find(|f| f.id == "gdacs").unwrap();
        let FetcherConfig::Rss { detail_api, .. } = &gdacs.fetcher else {
            panic!("gdacs should be an RSS feed");
        };
        let template = detail_api.as_deref().unwrap();
        assert!(template.contains("{eventtype}"));
        assert!(template.contains("{eventid}"));
    }
}
