#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::struct_excessive_bools)]

//! Canonical relief shelter record.
//!
//! Shelter feeds (DC Open Data GeoJSON, HDX, provincial portals) all
//! converge on [`ShelterRecord`]. Unlike disaster alerts, shelters always
//! carry coordinates — a shelter a person cannot navigate to is useless.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity key for a shelter record.
///
/// `(name, address)` is a chosen uniqueness rule; distinct facilities
/// sharing both strings merge into one stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShelterKey {
    /// Facility name.
    pub name: String,
    /// Street address or locality string.
    pub address: String,
}

/// Contact information for a shelter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterContact {
    /// Phone number, empty when unknown.
    #[serde(default)]
    pub phone: String,
    /// Email address, empty when unknown.
    #[serde(default)]
    pub email: String,
    /// Website URL, empty when unknown.
    #[serde(default)]
    pub website: String,
}

/// Services and accommodations a shelter offers.
///
/// Flags default to `false`; feeds that assert a capability flip the
/// corresponding flag during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterCapabilities {
    /// Sleeping space available.
    pub has_bed: bool,
    /// Meals provided.
    pub has_food: bool,
    /// Drinking water available.
    pub has_water: bool,
    /// On-site medical services.
    pub has_medical: bool,
    /// Showers available.
    pub has_shower: bool,
    /// Laundry facilities.
    pub has_laundry: bool,
    /// Wheelchair accessible.
    pub wheelchair_accessible: bool,
    /// Accepts family groups.
    pub accepts_families: bool,
    /// Accepts single men.
    pub accepts_men: bool,
    /// Accepts single women.
    pub accepts_women: bool,
    /// Accepts pets.
    pub accepts_pets: bool,
    /// Case management services.
    pub has_case_management: bool,
    /// Mental health services.
    pub has_mental_health: bool,
    /// Substance abuse services.
    pub has_substance_abuse: bool,
}

/// A relief shelter normalized to the canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterRecord {
    /// Facility name (required).
    pub name: String,
    /// Street address (required; may embed coordinates as a fallback).
    pub address: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Services and accommodations.
    #[serde(default)]
    pub capabilities: ShelterCapabilities,
    /// Open around the clock.
    pub is_24_7: bool,
    /// Currently operating.
    pub is_open: bool,
    /// Designated emergency shelter.
    pub is_emergency: bool,
    /// Total capacity. `0` means unknown.
    pub total_spaces: u32,
    /// Currently available capacity. `0` means unknown or full;
    /// `available_spaces <= total_spaces` is desired but not enforced.
    pub available_spaces: u32,
    /// Daily opening time, when not 24/7.
    pub hours_open: Option<NaiveTime>,
    /// Daily closing time, when not 24/7.
    pub hours_close: Option<NaiveTime>,
    /// Contact details.
    #[serde(default)]
    pub contact: ShelterContact,
    /// Which feed produced this record.
    pub source: String,
    /// When this record was first stored.
    pub created_at: DateTime<Utc>,
    /// When this record was last enriched.
    pub updated_at: DateTime<Utc>,
}

impl ShelterRecord {
    /// Returns the identity key used for reconciliation.
    #[must_use]
    pub fn key(&self) -> ShelterKey {
        ShelterKey {
            name: self.name.clone(),
            address: self.address.clone(),
        }
    }

    /// Whether this record qualifies for the search index.
    #[must_use]
    pub fn is_indexable(&self) -> bool {
        !self.name.is_empty() && !self.address.is_empty()
    }
}
