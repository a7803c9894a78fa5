#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Ingestion orchestration: fetch, normalize, reconcile, publish.
//!
//! One sync run per feed flows raw items through the adapters, fills
//! gaps with the heuristic extractors, merges fill-only into the store,
//! and republishes the search index. A failing feed never aborts a
//! `sync_all` run; its error is logged and the remaining feeds proceed.

use chrono::{DateTime, Duration, Utc};
use relief_map_disaster_models::{DisasterRecord, DisasterType};
use relief_map_extract::{
    classify_disaster, extract_coordinates, extract_population, extract_time, CategoryKeywords,
};
use relief_map_feed::feed_def::{FeedDefinition, FeedKind, FetcherConfig};
use relief_map_feed::geojson_source::{fetch_geojson, GeoJsonConfig};
use relief_map_feed::json_api::{fetch_json_api, JsonApiConfig};
use relief_map_feed::normalize::{normalize_disaster, normalize_shelter};
use relief_map_feed::rss::{fetch_rss, RssConfig};
use relief_map_feed::{FeedError, FetchOptions};
use relief_map_feed_models::SyncStats;
use relief_map_index::document::{disaster_document, shelter_document};
use relief_map_index::{disaster_settings, shelter_settings, IndexError, SearchIndex};
use relief_map_reconcile::store::{RecordStore, StoreError};
use relief_map_reconcile::{reconcile, ReconcileOutcome, Reconcilable};
use relief_map_shelter_models::ShelterRecord;

/// RSS alert feeds only look back this far; older channel items are
/// retired events.
const RSS_LOOKBACK_DAYS: i64 = 30;

/// Per-run cap on per-record field-fill log lines.
const FIELD_LOG_LIMIT: u64 = 20;

/// Errors that can occur during an ingest run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Fetching or adapting feed data failed.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The search index failed.
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Everything a sync run writes to: both record stores and both indexes.
pub struct IngestTargets<'a> {
    /// Disaster record store.
    pub disaster_store: &'a dyn RecordStore<DisasterRecord>,
    /// Shelter record store.
    pub shelter_store: &'a dyn RecordStore<ShelterRecord>,
    /// Disaster search index.
    pub disaster_index: &'a dyn SearchIndex,
    /// Shelter search index.
    pub shelter_index: &'a dyn SearchIndex,
}

/// Synchronizes one feed end to end and republishes its index.
///
/// `limit` caps the number of raw items fetched (useful for testing a
/// feed without pulling its whole backlog).
///
/// # Errors
///
/// Returns [`IngestError`] if the feed cannot be fetched or the store
/// or index cannot be written. Individual malformed items are counted,
/// not fatal.
pub async fn sync_feed(
    feed: &FeedDefinition,
    targets: &IngestTargets<'_>,
    limit: Option<u64>,
) -> Result<SyncStats, IngestError> {
    let now = Utc::now();
    let keywords = CategoryKeywords::default();
    let mut stats = SyncStats::default();

    log::info!("Syncing feed {} ({})", feed.id, feed.name);

    match (&feed.fetcher, feed.kind) {
        (FetcherConfig::Rss { url, detail_api }, FeedKind::Disaster) => {
            let options = FetchOptions {
                since: Some(now - Duration::days(RSS_LOOKBACK_DAYS)),
                limit,
            };
            let config = RssConfig {
                url,
                detail_api: detail_api.as_deref(),
                label: &feed.name,
            };
            let raw_records = fetch_rss(&config, &options).await?;
            for raw in &raw_records {
                match normalize_disaster(raw, &keywords, now) {
                    Some(record) => apply(
                        targets.disaster_store,
                        record,
                        now,
                        &mut stats,
                        &feed.id,
                    )?,
                    None => stats.malformed += 1,
                }
            }
        }
        (FetcherConfig::Rss { .. }, FeedKind::Shelter) => {
            return Err(FeedError::Config {
                message: format!("{}: RSS shelter feeds are not supported", feed.id),
            }
            .into());
        }
        (fetcher, kind) => {
            let options = FetchOptions {
                since: None,
                limit,
            };
            let records = match fetcher {
                FetcherConfig::GeoJson { url } => {
                    let config = GeoJsonConfig {
                        url,
                        label: &feed.name,
                    };
                    fetch_geojson(&config, &options).await?
                }
                FetcherConfig::JsonApi { url, records_path } => {
                    let config = JsonApiConfig {
                        url,
                        records_path: records_path.as_deref(),
                        label: &feed.name,
                    };
                    fetch_json_api(&config, &options).await?
                }
                FetcherConfig::Rss { .. } => unreachable!("handled above"),
            };

            let attribution = feed.attribution.as_deref().unwrap_or(&feed.name);
            for record in &records {
                match kind {
                    FeedKind::Disaster => {
                        let raw = feed.fields.map_disaster(record);
                        match normalize_disaster(&raw, &keywords, now) {
                            Some(record) => apply(
                                targets.disaster_store,
                                record,
                                now,
                                &mut stats,
                                &feed.id,
                            )?,
                            None => stats.malformed += 1,
                        }
                    }
                    FeedKind::Shelter => {
                        let raw = feed.fields.map_shelter(record);
                        match normalize_shelter(&raw, attribution, now) {
                            Some(record) => apply(
                                targets.shelter_store,
                                record,
                                now,
                                &mut stats,
                                &feed.id,
                            )?,
                            None => stats.malformed += 1,
                        }
                    }
                }
            }
        }
    }

    match feed.kind {
        FeedKind::Disaster => publish_disasters(targets.disaster_store, targets.disaster_index)?,
        FeedKind::Shelter => publish_shelters(targets.shelter_store, targets.shelter_index)?,
    }

    log::info!(
        "{}: {} added, {} updated, {} skipped, {} malformed",
        feed.id,
        stats.added,
        stats.updated,
        stats.skipped,
        stats.malformed
    );
    Ok(stats)
}

/// Reconciles one normalized record and updates the run counters.
fn apply<R, S>(
    store: &S,
    record: R,
    now: DateTime<Utc>,
    stats: &mut SyncStats,
    feed_id: &str,
) -> Result<(), StoreError>
where
    R: Reconcilable,
    S: RecordStore<R> + ?Sized,
{
    match reconcile(store, record, now)? {
        ReconcileOutcome::Created => stats.added += 1,
        ReconcileOutcome::Updated { fields } => {
            stats.updated += 1;
            if stats.updated <= FIELD_LOG_LIMIT {
                log::debug!("{feed_id}: filled {fields:?}");
            }
        }
        ReconcileOutcome::Skipped => stats.skipped += 1,
    }
    Ok(())
}

/// Synchronizes every given feed, isolating per-feed failures.
///
/// # Errors
///
/// Returns [`IngestError`] only for store or index failures; feed-level
/// fetch errors are logged and excluded from the merged stats.
pub async fn sync_all(
    feeds: &[FeedDefinition],
    targets: &IngestTargets<'_>,
    limit: Option<u64>,
) -> Result<SyncStats, IngestError> {
    let mut merged = SyncStats::default();
    for feed in feeds {
        match sync_feed(feed, targets, limit).await {
            Ok(stats) => merged.merge(stats),
            Err(IngestError::Feed(e)) => {
                log::error!("Feed {} failed, continuing: {e}", feed.id);
            }
            Err(e) => return Err(e),
        }
    }
    log::info!(
        "Sync complete: {} added, {} updated, {} skipped, {} malformed",
        merged.added,
        merged.updated,
        merged.skipped,
        merged.malformed
    );
    Ok(merged)
}

/// Publishes all indexable disasters and applies the index settings.
///
/// # Errors
///
/// Returns [`IngestError`] if the store cannot be read or the index
/// cannot be written.
pub fn publish_disasters(
    store: &dyn RecordStore<DisasterRecord>,
    index: &dyn SearchIndex,
) -> Result<(), IngestError> {
    let documents: Vec<serde_json::Value> = store
        .all()?
        .iter()
        .filter(|r| r.is_indexable())
        .map(disaster_document)
        .collect();
    index.apply_settings(&disaster_settings())?;
    index.save_objects(&documents)?;
    log::info!("Published {} disaster documents", documents.len());
    Ok(())
}

/// Publishes all indexable shelters and applies the index settings.
///
/// # Errors
///
/// Returns [`IngestError`] if the store cannot be read or the index
/// cannot be written.
pub fn publish_shelters(
    store: &dyn RecordStore<ShelterRecord>,
    index: &dyn SearchIndex,
) -> Result<(), IngestError> {
    let documents: Vec<serde_json::Value> = store
        .all()?
        .iter()
        .filter(|r| r.is_indexable())
        .map(shelter_document)
        .collect();
    index.apply_settings(&shelter_settings())?;
    index.save_objects(&documents)?;
    log::info!("Published {} shelter documents", documents.len());
    Ok(())
}

/// Counters for one enhancement pass over stored disasters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhanceStats {
    /// Records examined.
    pub examined: u64,
    /// Records that gained at least one field.
    pub enriched: u64,
    /// Coordinate pairs filled.
    pub coordinates_filled: u64,
    /// Event times filled.
    pub times_filled: u64,
    /// Population figures filled.
    pub populations_filled: u64,
    /// Categories resolved from `Unknown`.
    pub categories_filled: u64,
}

/// Re-runs the extractors over every stored disaster, filling fields a
/// feed run left blank. Stored values are never overwritten, so the
/// pass is idempotent: a second run enriches nothing.
///
/// # Errors
///
/// Returns [`IngestError`] if the store cannot be read or written.
pub fn enhance_disasters(
    store: &dyn RecordStore<DisasterRecord>,
    keywords: &CategoryKeywords,
    now: DateTime<Utc>,
) -> Result<EnhanceStats, IngestError> {
    let mut stats = EnhanceStats::default();

    for mut record in store.all()? {
        stats.examined += 1;
        let text = [
            Some(record.title.as_str()),
            record.description.as_deref(),
            Some(record.location.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        let mut changed = false;

        if record.latitude.is_none() || record.longitude.is_none() {
            if let Some((lat, lon)) = extract_coordinates(&text) {
                record.latitude = Some(lat);
                record.longitude = Some(lon);
                stats.coordinates_filled += 1;
                changed = true;
            }
        }
        if record.disaster_time.is_none() {
            if let Some(time) = extract_time(&text) {
                record.disaster_time = Some(time);
                stats.times_filled += 1;
                changed = true;
            }
        }
        if record.population_affected == 0 {
            let population = extract_population(&text);
            if population > 0 {
                record.population_affected = population;
                stats.populations_filled += 1;
                changed = true;
            }
        }
        if record.disaster_type == DisasterType::Unknown {
            let classified = classify_disaster(&text, keywords);
            if classified != DisasterType::Unknown {
                record.disaster_type = classified;
                stats.categories_filled += 1;
                changed = true;
            }
        }

        if changed {
            stats.enriched += 1;
            record.updated_at = now;
            let key = record.key();
            store.update(&key, record)?;
        }
    }

    log::info!(
        "Enhanced {}/{} disasters ({} coords, {} times, {} populations, {} categories)",
        stats.enriched,
        stats.examined,
        stats.coordinates_filled,
        stats.times_filled,
        stats.populations_filled,
        stats.categories_filled
    );
    Ok(stats)
}

/// How complete the stored disaster data is, field by field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Total stored records.
    pub total: u64,
    /// Records without a coordinate pair.
    pub missing_coordinates: u64,
    /// Records without an event time.
    pub missing_time: u64,
    /// Records with a zero population figure.
    pub missing_population: u64,
    /// Records still categorized `Unknown`.
    pub unknown_category: u64,
    /// Records without a description.
    pub missing_description: u64,
}

/// Tallies field coverage across the stored disasters.
///
/// # Errors
///
/// Returns [`IngestError`] if the store cannot be read.
pub fn coverage_report(
    store: &dyn RecordStore<DisasterRecord>,
) -> Result<CoverageReport, IngestError> {
    let mut report = CoverageReport::default();
    for record in store.all()? {
        report.total += 1;
        if record.latitude.is_none() || record.longitude.is_none() {
            report.missing_coordinates += 1;
        }
        if record.disaster_time.is_none() {
            report.missing_time += 1;
        }
        if record.population_affected == 0 {
            report.missing_population += 1;
        }
        if record.disaster_type == DisasterType::Unknown {
            report.unknown_category += 1;
        }
        if record.description.as_deref().is_none_or(str::is_empty) {
            report.missing_description += 1;
        }
    }
    Ok(report)
}
