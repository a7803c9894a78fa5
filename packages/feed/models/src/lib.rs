#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Intermediate record shapes produced by feed adapters.
//!
//! Adapters translate each wire format (RSS, GeoJSON, JSON APIs) into
//! these raw shapes; normalization then lifts them into the canonical
//! models. Raw shapes keep everything optional so a sparse feed item
//! survives until normalization decides whether it is usable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A disaster alert as an adapter saw it, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDisasterRecord {
    /// Alert title.
    pub title: Option<String>,
    /// Longer description or summary text.
    pub description: Option<String>,
    /// Free-text location.
    pub location: Option<String>,
    /// Source-reported category code or phrase.
    pub category: Option<String>,
    /// Source-reported affected population.
    pub population_affected: Option<u64>,
    /// Source-reported event time.
    pub disaster_time: Option<DateTime<Utc>>,
    /// Source-reported latitude.
    pub latitude: Option<f64>,
    /// Source-reported longitude.
    pub longitude: Option<f64>,
}

/// A shelter entry as an adapter saw it, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawShelterRecord {
    /// Facility name.
    pub name: Option<String>,
    /// Street address or locality.
    pub address: Option<String>,
    /// Latitude.
    pub latitude: Option<f64>,
    /// Longitude.
    pub longitude: Option<f64>,
    /// Free-text list of offered services, scanned for capability
    /// keywords during normalization.
    pub services: Option<String>,
    /// Total capacity.
    pub total_spaces: Option<u32>,
    /// Available capacity.
    pub available_spaces: Option<u32>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Attribution string for the producing feed.
    pub source: Option<String>,
}

/// Counters accumulated over one feed synchronization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    /// Records created in the store.
    pub added: u64,
    /// Existing records that gained at least one field.
    pub updated: u64,
    /// Records that matched an existing key but added nothing.
    pub skipped: u64,
    /// Feed items dropped before reconciliation (missing identity
    /// fields, unparseable shapes).
    pub malformed: u64,
}

impl SyncStats {
    /// Total feed items this run touched.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.added + self.updated + self.skipped + self.malformed
    }

    /// Folds another run's counters into this one.
    pub fn merge(&mut self, other: Self) {
        self.added += other.added;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.malformed += other.malformed;
    }
}
