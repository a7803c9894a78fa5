//! Config-driven relief data feed definition.
//!
//! [`FeedDefinition`] captures everything unique about a provider in a
//! serializable config struct: which wire format to fetch, and how its
//! field names map onto the raw record shapes. One generic
//! implementation per wire format handles every feed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use relief_map_feed_models::{RawDisasterRecord, RawShelterRecord};
use serde::Deserialize;

// ── Top-level feed definition ────────────────────────────────────────────

/// A complete, config-driven relief data feed definition.
///
/// Loaded from TOML files at compile time and used as the sole feed
/// implementation.
#[derive(Debug, Deserialize)]
pub struct FeedDefinition {
    /// Unique identifier (e.g., `"gdacs"`).
    pub id: String,
    /// Human-readable name (e.g., `"GDACS Global Alerts"`).
    pub name: String,
    /// Whether this feed produces disasters or shelters.
    pub kind: FeedKind,
    /// Attribution string stored on records from this feed.
    #[serde(default)]
    pub attribution: Option<String>,
    /// How to fetch raw data from the provider.
    pub fetcher: FetcherConfig,
    /// Field name mappings for JSON-shaped records.
    #[serde(default)]
    pub fields: FieldMapping,
}

/// The record family a feed produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    /// Disaster alerts.
    Disaster,
    /// Relief shelters.
    Shelter,
}

// ── Fetcher config ───────────────────────────────────────────────────────

/// How to fetch raw data from the provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetcherConfig {
    /// RSS 2.0 feed (GDACS-style, with an optional per-event detail API).
    Rss {
        /// Feed URL.
        url: String,
        /// Detail API URL template with `{eventtype}` and `{eventid}`
        /// placeholders, queried per item when the item carries both IDs.
        detail_api: Option<String>,
    },
    /// `GeoJSON` `FeatureCollection` endpoint.
    GeoJson {
        /// Endpoint URL.
        url: String,
    },
    /// Plain JSON API returning an array of records.
    JsonApi {
        /// Endpoint URL.
        url: String,
        /// Dot-path to the records array. `None` when the response body
        /// is a bare array.
        records_path: Option<String>,
    },
}

// ── Field mapping ────────────────────────────────────────────────────────

/// Maps provider-specific JSON field names to raw record fields.
///
/// Every entry is a fallback chain: field names are tried in order and
/// the first non-empty value wins. Unused chains stay empty — a disaster
/// feed never fills `services`, a shelter feed never fills `title`.
#[derive(Debug, Default, Deserialize)]
pub struct FieldMapping {
    /// Alert title (disaster feeds).
    #[serde(default)]
    pub title: Vec<String>,
    /// Description or summary text.
    #[serde(default)]
    pub description: Vec<String>,
    /// Free-text location (disaster feeds).
    #[serde(default)]
    pub location: Vec<String>,
    /// Source-reported category code (disaster feeds).
    #[serde(default)]
    pub category: Vec<String>,
    /// Event timestamp, parsed as an ISO 8601 date or datetime.
    #[serde(default)]
    pub time: Vec<String>,
    /// Facility name (shelter feeds).
    #[serde(default)]
    pub name: Vec<String>,
    /// Street address (shelter feeds).
    #[serde(default)]
    pub address: Vec<String>,
    /// Latitude, accepted as a JSON number or numeric string.
    #[serde(default)]
    pub latitude: Vec<String>,
    /// Longitude, accepted as a JSON number or numeric string.
    #[serde(default)]
    pub longitude: Vec<String>,
    /// Free-text services list (shelter feeds).
    #[serde(default)]
    pub services: Vec<String>,
    /// Total capacity (shelter feeds).
    #[serde(default)]
    pub total_spaces: Vec<String>,
    /// Available capacity (shelter feeds).
    #[serde(default)]
    pub available_spaces: Vec<String>,
    /// Phone number (shelter feeds).
    #[serde(default)]
    pub phone: Vec<String>,
    /// Email address (shelter feeds).
    #[serde(default)]
    pub email: Vec<String>,
    /// Website URL (shelter feeds).
    #[serde(default)]
    pub website: Vec<String>,
}

// ── JSON value helpers ───────────────────────────────────────────────────

/// Resolves a field name against a JSON object. Dots descend into
/// nested objects (`"fields.primary_country.name"`).
fn get_value<'a>(record: &'a serde_json::Value, field: &str) -> Option<&'a serde_json::Value> {
    let mut node = record;
    for segment in field.split('.') {
        node = node.get(segment)?;
    }
    Some(node)
}

/// Gets a string value from a JSON object by field name.
fn get_str<'a>(record: &'a serde_json::Value, field: &str) -> Option<&'a str> {
    get_value(record, field)?.as_str()
}

/// Gets a numeric value from a JSON object, accepting either a JSON
/// number or a numeric string.
fn get_number(record: &serde_json::Value, field: &str) -> Option<f64> {
    let value = get_value(record, field)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

/// Tries each field name in order and returns the first non-empty string.
fn first_str(record: &serde_json::Value, fields: &[String]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| get_str(record, f))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}

/// Tries each field name in order and returns the first parseable number.
fn first_number(record: &serde_json::Value, fields: &[String]) -> Option<f64> {
    fields.iter().find_map(|f| get_number(record, f))
}

/// Parses an ISO 8601 date or datetime string, treating naive values as
/// UTC.
#[must_use]
pub fn parse_feed_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

impl FieldMapping {
    /// Maps one JSON record into a raw disaster record.
    #[must_use]
    pub fn map_disaster(&self, record: &serde_json::Value) -> RawDisasterRecord {
        let (latitude, longitude) = self.coordinates(record);
        RawDisasterRecord {
            title: first_str(record, &self.title),
            description: first_str(record, &self.description),
            location: first_str(record, &self.location),
            category: first_str(record, &self.category),
            population_affected: None,
            disaster_time: first_str(record, &self.time)
                .as_deref()
                .and_then(parse_feed_date),
            latitude,
            longitude,
        }
    }

    /// Maps one JSON record into a raw shelter record.
    #[must_use]
    pub fn map_shelter(&self, record: &serde_json::Value) -> RawShelterRecord {
        let (latitude, longitude) = self.coordinates(record);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let as_u32 = |v: f64| -> u32 { v.max(0.0) as u32 };
        RawShelterRecord {
            name: first_str(record, &self.name),
            address: first_str(record, &self.address),
            latitude,
            longitude,
            services: first_str(record, &self.services),
            total_spaces: first_number(record, &self.total_spaces).map(as_u32),
            available_spaces: first_number(record, &self.available_spaces).map(as_u32),
            phone: first_str(record, &self.phone),
            email: first_str(record, &self.email),
            website: first_str(record, &self.website),
            source: None,
        }
    }

    /// Extracts a coordinate pair, rejecting zero and out-of-range values.
    fn coordinates(&self, record: &serde_json::Value) -> (Option<f64>, Option<f64>) {
        let latitude = first_number(record, &self.latitude);
        let longitude = first_number(record, &self.longitude);
        match (latitude, longitude) {
            (Some(lat), Some(lng))
                if lat != 0.0
                    && lng != 0.0
                    && (-90.0..=90.0).contains(&lat)
                    && (-180.0..=180.0).contains(&lng) =>
            {
                (Some(lat), Some(lng))
            }
            _ => (None, None),
        }
    }
}

/// Parses a [`FeedDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_feed_toml(toml_str: &str) -> Result<FeedDefinition, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shelter_mapping() -> FieldMapping {
        FieldMapping {
            name: vec!["facility_name".to_string(), "name".to_string()],
            address: vec!["address".to_string()],
            latitude: vec!["lat".to_string()],
            longitude: vec!["lng".to_string()],
            services: vec!["services_offered".to_string()],
            total_spaces: vec!["capacity".to_string()],
            phone: vec!["phone".to_string()],
            ..FieldMapping::default()
        }
    }

    #[test]
    fn maps_shelter_with_fallback_chain() {
        let record = serde_json::json!({
            "facility_name": "",
            "name": "Harbor Light Center",
            "address": "2100 New York Ave NE",
            "lat": 38.916,
            "lng": -76.983,
            "capacity": 150,
        });
        let raw = shelter_mapping().map_shelter(&record);
        assert_eq!(raw.name.as_deref(), Some("Harbor Light Center"));
        assert_eq!(raw.total_spaces, Some(150));
        assert!((raw.latitude.unwrap() - 38.916).abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_string_coordinates() {
        let record = serde_json::json!({
            "name": "Camp A", "address": "x", "lat": "24.86", "lng": "67.01"
        });
        let raw = shelter_mapping().map_shelter(&record);
        assert!((raw.latitude.unwrap() - 24.86).abs() < f64::EPSILON);
        assert!((raw.longitude.unwrap() - 67.01).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_zero_coordinates() {
        let record = serde_json::json!({
            "name": "Camp A", "address": "x", "lat": 0.0, "lng": -76.9
        });
        let raw = shelter_mapping().map_shelter(&record);
        assert!(raw.latitude.is_none());
        assert!(raw.longitude.is_none());
    }

    #[test]
    fn maps_disaster_with_iso_time() {
        let mapping = FieldMapping {
            title: vec!["title".to_string()],
            location: vec!["country".to_string()],
            time: vec!["date".to_string()],
            ..FieldMapping::default()
        };
        let record = serde_json::json!({
            "title": "Flooding in Sindh",
            "country": "Pakistan",
            "date": "2025-07-25T14:30:00Z",
        });
        let raw = mapping.map_disaster(&record);
        assert_eq!(raw.title.as_deref(), Some("Flooding in Sindh"));
        assert_eq!(
            raw.disaster_time.unwrap().to_string(),
            "2025-07-25 14:30:00 UTC"
        );
    }

    #[test]
    fn dot_paths_descend_into_nested_objects() {
        let mapping = FieldMapping {
            title: vec!["fields.name".to_string()],
            location: vec!["fields.primary_country.name".to_string()],
            ..FieldMapping::default()
        };
        let record = serde_json::json!({
            "fields": {
                "name": "Pakistan: Floods - Jul 2025",
                "primary_country": {"name": "Pakistan"},
            }
        });
        let raw = mapping.map_disaster(&record);
        assert_eq!(raw.title.as_deref(), Some("Pakistan: Floods - Jul 2025"));
        assert_eq!(raw.location.as_deref(), Some("Pakistan"));
    }

    #[test]
    fn parses_feed_date_variants() {
        assert!(parse_feed_date("2025-07-25T14:30:00Z").is_some());
        assert!(parse_feed_date("2025-07-25T14:30:00.000").is_some());
        assert!(parse_feed_date("2025-07-25 14:30:00").is_some());
        assert!(parse_feed_date("2025-07-25").is_some());
        assert!(parse_feed_date("not a date").is_none());
    }

    #[test]
    fn parses_minimal_feed_toml() {
        let toml_str = r#"
            id = "test_feed"
            name = "Test Feed"
            kind = "shelter"

            [fetcher]
            type = "json_api"
            url = "https://example.org/shelters.json"

            [fields]
            name = ["name"]
            address = ["address"]
        "#;
        let def = parse_feed_toml(toml_str).unwrap();
        assert_eq!(def.id, "test_feed");
        assert_eq!(def.kind, FeedKind::Shelter);
        assert!(matches!(
            def.fetcher,
            FetcherConfig::JsonApi {
                records_path: None,
                ..
            }
        ));
    }
}
