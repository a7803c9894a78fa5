//! Raw-to-canonical record normalization.
//!
//! Lifts adapter output into the canonical models, running the heuristic
//! extractors over whatever text the feed supplied to fill fields the
//! feed itself left blank. Records missing their identity fields are
//! rejected here (the caller counts them as malformed).

use chrono::{DateTime, Utc};
use relief_map_disaster_models::{DisasterRecord, DisasterType};
use relief_map_extract::{
    classify_disaster, extract_coordinates, extract_population, extract_time, CategoryKeywords,
};
use relief_map_feed_models::{RawDisasterRecord, RawShelterRecord};
use relief_map_shelter_models::{ShelterCapabilities, ShelterContact, ShelterRecord};

/// Normalizes a raw disaster record into the canonical model.
///
/// Returns `None` when the record has no title. Feed-supplied values
/// always win over extracted ones; extraction only fills gaps.
#[must_use]
pub fn normalize_disaster(
    raw: &RawDisasterRecord,
    keywords: &CategoryKeywords,
    now: DateTime<Utc>,
) -> Option<DisasterRecord> {
    let title = raw.title.as_deref()?.trim().to_string();
    if title.is_empty() {
        return None;
    }

    let location = raw
        .location
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| "Unknown".to_string(), String::from);

    // Combined haystack for the extractors.
    let text = [
        Some(title.as_str()),
        raw.description.as_deref(),
        Some(location.as_str()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ");

    let disaster_type = raw
        .category
        .as_deref()
        .and_then(|code| code.parse::<DisasterType>().ok())
        .unwrap_or_else(|| classify_disaster(&text, keywords));

    let population_affected = raw
        .population_affected
        .unwrap_or_else(|| extract_population(&text));

    let disaster_time = raw.disaster_time.or_else(|| extract_time(&text));

    let (latitude, longitude) = match (raw.latitude, raw.longitude) {
        (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
        _ => extract_coordinates(&text).map_or((None, None), |(lat, lon)| (Some(lat), Some(lon))),
    };

    Some(DisasterRecord {
        title,
        description: raw.description.clone(),
        location,
        disaster_type,
        population_affected,
        disaster_time,
        latitude,
        longitude,
        created_at: now,
        updated_at: now,
    })
}

/// Baseline capabilities assumed when a feed says nothing about services.
///
/// A general-population relief shelter is presumed to offer beds, food,
/// and water and to accept everyone; feeds that enumerate services
/// override this baseline entirely.
fn baseline_capabilities() -> ShelterCapabilities {
    ShelterCapabilities {
        has_bed: true,
        has_food: true,
        has_water: true,
        accepts_families: true,
        accepts_men: true,
        accepts_women: true,
        ..ShelterCapabilities::default()
    }
}

/// Scans a free-text services list for capability keywords.
///
/// Single keywords match on whole tokens ("women" must not match via
/// "men"); multi-word phrases match on substring containment.
fn scan_capabilities(services: &str) -> ShelterCapabilities {
    let lowered = services.to_lowercase();
    let tokens: std::collections::BTreeSet<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let word = |needles: &[&str]| needles.iter().any(|n| tokens.contains(n));
    let phrase = |needles: &[&str]| needles.iter().any(|n| lowered.contains(n));
    ShelterCapabilities {
        has_bed: word(&["bed", "beds", "sleeping", "overnight"]),
        has_food: word(&["food", "meal", "meals"]),
        has_water: word(&["water"]),
        has_medical: word(&["medical", "clinic", "healthcare"]) || phrase(&["health care"]),
        has_shower: word(&["shower", "showers"]),
        has_laundry: word(&["laundry"]),
        wheelchair_accessible: word(&["wheelchair", "accessible"]),
        accepts_families: word(&["family", "families"]),
        accepts_men: word(&["men", "male", "males"]),
        accepts_women: word(&["women", "female", "females"]),
        accepts_pets: word(&["pet", "pets"]),
        has_case_management: phrase(&["case management"]),
        has_mental_health: word(&["counseling"]) || phrase(&["mental health"]),
        has_substance_abuse: word(&["substance", "addiction", "detox"]),
    }
}

/// Normalizes a raw shelter record into the canonical model.
///
/// Returns `None` when the record lacks a name or any way to place it on
/// a map (explicit coordinates, or coordinates recoverable from the
/// address text). A missing address is synthesized from the coordinates
/// so the identity key stays populated.
#[must_use]
pub fn normalize_shelter(
    raw: &RawShelterRecord,
    default_source: &str,
    now: DateTime<Utc>,
) -> Option<ShelterRecord> {
    let name = raw.name.as_deref()?.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let address = raw
        .address
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    let (latitude, longitude) = match (raw.latitude, raw.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => extract_coordinates(address.as_deref().unwrap_or_default())?,
    };

    let address = address.unwrap_or_else(|| format!("({latitude}, {longitude})"));

    let capabilities = raw
        .services
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map_or_else(baseline_capabilities, scan_capabilities);

    let services_lower = raw.services.as_deref().unwrap_or_default().to_lowercase();
    let is_24_7 = services_lower.contains("24/7") || services_lower.contains("24 hour");
    let is_emergency = services_lower.contains("emergency");

    let source = raw
        .source
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(default_source);
    let source = if source.is_empty() { "Unknown" } else { source };

    Some(ShelterRecord {
        name,
        address,
        latitude,
        longitude,
        capabilities,
        is_24_7,
        is_open: true,
        is_emergency,
        total_spaces: raw.total_spaces.unwrap_or(0),
        available_spaces: raw.available_spaces.unwrap_or(0),
        hours_open: None,
        hours_close: None,
        contact: ShelterContact {
            phone: raw.phone.clone().unwrap_or_default(),
            email: raw.email.clone().unwrap_or_default(),
            website: raw.website.clone().unwrap_or_default(),
        },
        source: source.to_string(),
        created_at: now,
        updated_at: now,
    })
}
