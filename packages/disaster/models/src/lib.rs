#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Disaster taxonomy types and the canonical disaster alert record.
//!
//! Every disaster feed (GDACS, ReliefWeb, etc.) normalizes its
//! source-specific shape into [`DisasterRecord`] before storage and
//! indexing. The [`DisasterType`] codes follow the GDACS two-letter
//! event-type convention.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Canonical disaster category, using GDACS-style two-letter codes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    Default,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DisasterType {
    /// Earthquake
    Eq,
    /// Flood
    Fl,
    /// Wildfire / forest fire
    Wf,
    /// Tropical cyclone (hurricane, typhoon)
    Tc,
    /// Volcanic activity
    Vo,
    /// Drought
    Dr,
    /// Landslide / mudslide
    Ls,
    /// Tsunami
    Ts,
    /// Category could not be determined
    #[default]
    Unknown,
}

impl DisasterType {
    /// Returns a human-readable label for this category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eq => "Earthquake",
            Self::Fl => "Flood",
            Self::Wf => "Wildfire",
            Self::Tc => "Tropical Cyclone",
            Self::Vo => "Volcano",
            Self::Dr => "Drought",
            Self::Ls => "Landslide",
            Self::Ts => "Tsunami",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns all concrete (non-`Unknown`) categories, in the order used
    /// for classifier tie-breaking.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Eq,
            Self::Fl,
            Self::Wf,
            Self::Tc,
            Self::Vo,
            Self::Dr,
            Self::Ls,
            Self::Ts,
        ]
    }
}

/// Identity key for a disaster record.
///
/// `(title, location)` is a chosen uniqueness rule, not a derived one:
/// two genuinely distinct events that share both strings collapse into a
/// single stored record. That collision is accepted and documented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisasterKey {
    /// Alert title as reported by the feed.
    pub title: String,
    /// Free-text location string.
    pub location: String,
}

/// A disaster alert normalized to the canonical schema.
///
/// All feeds produce this type after adapter mapping and enrichment.
/// Coordinates are optional — alerts without a precise position are still
/// stored and indexed. `latitude`/`longitude` are always both present or
/// both absent; that pairing is enforced at extraction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisasterRecord {
    /// Alert title (required, non-empty for indexability).
    pub title: String,
    /// Longer description, when the feed provides one.
    pub description: Option<String>,
    /// Free-text location; may embed coordinates like `"(-6.08, 142.66)"`.
    pub location: String,
    /// Mapped disaster category.
    pub disaster_type: DisasterType,
    /// Number of people affected. `0` doubles as "unknown" — the source
    /// data does not distinguish the two.
    pub population_affected: u64,
    /// When the disaster occurred (distinct from when the record was
    /// created).
    pub disaster_time: Option<DateTime<Utc>>,
    /// Latitude (WGS84), in `[-90, 90]`.
    pub latitude: Option<f64>,
    /// Longitude (WGS84), in `[-180, 180]`.
    pub longitude: Option<f64>,
    /// When this record was first stored.
    pub created_at: DateTime<Utc>,
    /// When this record was last enriched.
    pub updated_at: DateTime<Utc>,
}

impl DisasterRecord {
    /// Returns the identity key used for reconciliation.
    #[must_use]
    pub fn key(&self) -> DisasterKey {
        DisasterKey {
            title: self.title.clone(),
            location: self.location.clone(),
        }
    }

    /// Whether this record qualifies for the search index.
    #[must_use]
    pub fn is_indexable(&self) -> bool {
        !self.title.is_empty() && !self.location.is_empty()
    }
}
