//! Canonical-record to search-document shaping.
//!
//! Documents are flat JSON objects with a deterministic `objectID`
//! derived from the record's identity key, so republishing the same
//! record overwrites its previous document instead of duplicating it.

use chrono::{DateTime, Utc};
use relief_map_disaster_models::DisasterRecord;
use relief_map_extract::extract_coordinates;
use relief_map_shelter_models::ShelterRecord;

/// Formats the three time representations the index carries: ISO 8601
/// (or null), a display string (or `"Unknown"`), and an epoch-seconds
/// ranking field (or `0`).
fn time_fields(time: Option<DateTime<Utc>>) -> (serde_json::Value, String, i64) {
    time.map_or_else(
        || (serde_json::Value::Null, "Unknown".to_string(), 0),
        |t| {
            (
                serde_json::json!(t.to_rfc3339()),
                t.format("%Y-%m-%d %H:%M:%S").to_string(),
                t.timestamp(),
            )
        },
    )
}

/// Builds the `_geoloc` field when a position is known, falling back to
/// a coordinate pair embedded in the given text (e.g. a location string
/// like `"Papua New Guinea (-6.08, 142.66)"`).
fn geoloc(
    latitude: Option<f64>,
    longitude: Option<f64>,
    fallback_text: &str,
) -> serde_json::Value {
    let pair = match (latitude, longitude) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        _ => extract_coordinates(fallback_text),
    };
    pair.map_or(serde_json::Value::Null, |(lat, lng)| {
        serde_json::json!({"lat": lat, "lng": lng})
    })
}

/// Shapes a disaster record into its search document.
#[must_use]
pub fn disaster_document(record: &DisasterRecord) -> serde_json::Value {
    let object_id = format!("{}|{}", record.title, record.location);
    let (iso, display, timestamp) = time_fields(record.disaster_time);
    serde_json::json!({
        "objectID": object_id,
        "id": object_id,
        "title": record.title,
        "description": record.description,
        "location": record.location,
        "disasterType": record.disaster_type.to_string(),
        "disasterTypeLabel": record.disaster_type.label(),
        "populationAffected": record.population_affected,
        "disaster_time": iso,
        "disaster_time_str": display,
        "disaster_time_timestamp": timestamp,
        "_geoloc": geoloc(record.latitude, record.longitude, &record.location),
    })
}

/// Shapes a shelter record into its search document.
#[must_use]
pub fn shelter_document(record: &ShelterRecord) -> serde_json::Value {
    let object_id = format!("{}|{}", record.name, record.address);
    let caps = &record.capabilities;
    serde_json::json!({
        "objectID": object_id,
        "id": object_id,
        "name": record.name,
        "address": record.address,
        "hasBed": caps.has_bed,
        "hasFood": caps.has_food,
        "hasWater": caps.has_water,
        "hasMedical": caps.has_medical,
        "hasShower": caps.has_shower,
        "hasLaundry": caps.has_laundry,
        "wheelchairAccessible": caps.wheelchair_accessible,
        "acceptsFamilies": caps.accepts_families,
        "acceptsMen": caps.accepts_men,
        "acceptsWomen": caps.accepts_women,
        "acceptsPets": caps.accepts_pets,
        "hasCaseManagement": caps.has_case_management,
        "hasMentalHealth": caps.has_mental_health,
        "hasSubstanceAbuse": caps.has_substance_abuse,
        "is247": record.is_24_7,
        "isOpen": record.is_open,
        "isEmergency": record.is_emergency,
        "totalSpaces": record.total_spaces,
        "availableSpaces": record.available_spaces,
        "phone": record.contact.phone,
        "email": record.contact.email,
        "website": record.contact.website,
        "source": record.source,
        "_geoloc": geoloc(Some(record.latitude), Some(record.longitude), &record.address),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use relief_map_disaster_models::DisasterType;
    use relief_map_shelter_models::{ShelterCapabilities, ShelterContact};

    fn disaster() -> DisasterRecord {
        DisasterRecord {
            title: "EQ 6.1 M".to_string(),
            description: Some("Strong earthquake".to_string()),
            location: "Papua New Guinea (-6.08, 142.66)".to_string(),
            disaster_type: DisasterType::Eq,
            population_affected: 120_000,
            disaster_time: Some(Utc.with_ymd_and_hms(2025, 7, 25, 14, 30, 0).unwrap()),
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn disaster_document_derives_time_fields() {
        let doc = disaster_document(&disaster());
        assert_eq!(doc["disaster_time_str"], "2025-07-25 14:30:00");
        assert_eq!(doc["disaster_time_timestamp"], 1_753_453_800);
        assert!(doc["disaster_time"].as_str().unwrap().starts_with("2025-07-25T14:30:00"));
    }

    #[test]
    fn disaster_document_without_time_uses_sentinels() {
        let mut record = disaster();
        record.disaster_time = None;
        let doc = disaster_document(&record);
        assert_eq!(doc["disaster_time_str"], "Unknown");
        assert_eq!(doc["disaster_time_timestamp"], 0);
        assert!(doc["disaster_time"].is_null());
    }

    #[test]
    fn disaster_geoloc_falls_back_to_location_text() {
        let doc = disaster_document(&disaster());
        let geo = &doc["_geoloc"];
        assert!((geo["lat"].as_f64().unwrap() - -6.08).abs() < f64::EPSILON);
        assert!((geo["lng"].as_f64().unwrap() - 142.66).abs() < f64::EPSILON);
    }

    #[test]
    fn disaster_object_id_is_deterministic() {
        let a = disaster_document(&disaster());
        let b = disaster_document(&disaster());
        assert_eq!(a["objectID"], b["objectID"]);
        assert_eq!(a["objectID"], a["id"]);
    }

    #[test]
    fn shelter_document_flattens_capabilities() {
        let record = ShelterRecord {
            name: "Camp A".to_string(),
            address: "12 Main St".to_string(),
            latitude: 27.7,
            longitude: 68.85,
            capabilities: ShelterCapabilities {
                has_bed: true,
                has_medical: true,
                ..ShelterCapabilities::default()
            },
            is_24_7: true,
            is_open: true,
            is_emergency: false,
            total_spaces: 200,
            available_spaces: 50,
            hours_open: None,
            hours_close: None,
            contact: ShelterContact::default(),
            source: "HDX".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let doc = shelter_document(&record);
        assert_eq!(doc["objectID"], "Camp A|12 Main St");
        assert_eq!(doc["hasBed"], true);
        assert_eq!(doc["hasMedical"], true);
        assert_eq!(doc["hasFood"], false);
        assert_eq!(doc["availableSpaces"], 50);
        assert!((doc["_geoloc"]["lat"].as_f64().unwrap() - 27.7).abs() < f64::EPSILON);
    }
}
