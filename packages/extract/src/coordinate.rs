//! Coordinate extraction from free text.
//!
//! Tries three shapes in order, returning the first valid pair:
//! parenthesized `(lat, lon)`, a bare `lat, lon` pair, then labeled
//! `lat: .. lon: ..` fields in either order.

use regex::Regex;
use std::sync::LazyLock;

static PARENTHESIZED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((-?\d+\.?\d*),\s*(-?\d+\.?\d*)\)").expect("valid regex"));

static BARE_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+\.\d+),\s*(-?\d+\.\d+)").expect("valid regex"));

static LABELED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)lat(?:itude)?[:\s]+(-?\d+\.?\d*)[,;\s]+lon(?:g(?:itude)?)?[:\s]+(-?\d+\.?\d*)",
    )
    .expect("valid regex")
});

/// Extracts a `(latitude, longitude)` pair from free text.
///
/// Each pattern's first match is validated against WGS84 range
/// (`[-90, 90]` latitude, `[-180, 180]` longitude). A pattern whose
/// match is out of range or unparseable is rejected and extraction
/// falls through to the next pattern; `None` when every pattern fails.
#[must_use]
pub fn extract_coordinates(text: &str) -> Option<(f64, f64)> {
    for re in [&*PARENTHESIZED_RE, &*BARE_PAIR_RE, &*LABELED_RE] {
        let Some(caps) = re.captures(text) else {
            continue;
        };
        let (Some(lat), Some(lon)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let (Ok(lat), Ok(lon)) = (
            lat.as_str().parse::<f64>(),
            lon.as_str().parse::<f64>(),
        ) else {
            continue;
        };
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
            return Some((lat, lon));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_parenthesized_pair() {
        let (lat, lon) = extract_coordinates("Papua New Guinea (-6.08, 142.66)").unwrap();
        assert!((lat - -6.08).abs() < f64::EPSILON);
        assert!((lon - 142.66).abs() < f64::EPSILON);
    }

    #[test]
    fn extracts_bare_pair() {
        let (lat, lon) = extract_coordinates("epicenter at 24.86, 67.01 offshore").unwrap();
        assert!((lat - 24.86).abs() < f64::EPSILON);
        assert!((lon - 67.01).abs() < f64::EPSILON);
    }

    #[test]
    fn extracts_labeled_pair() {
        let (lat, lon) = extract_coordinates("Latitude: 35.5, Longitude: -120.7").unwrap();
        assert!((lat - 35.5).abs() < f64::EPSILON);
        assert!((lon - -120.7).abs() < f64::EPSILON);
    }

    #[test]
    fn labeled_pair_is_case_insensitive() {
        assert!(extract_coordinates("LAT: 10.0 LON: 20.0").is_some());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(extract_coordinates("(91.0, 10.0)").is_none());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(extract_coordinates("(45.0, 181.0)").is_none());
    }

    #[test]
    fn out_of_range_match_falls_through_to_later_pattern() {
        // The parenthesized pair is invalid; the labeled pattern still
        // recovers the good pair.
        let (lat, lon) =
            extract_coordinates("Latitude: 35.5, Longitude: -120.7 near (95.0, 10.0)").unwrap();
        assert!((lat - 35.5).abs() < f64::EPSILON);
        assert!((lon - -120.7).abs() < f64::EPSILON);
    }

    #[test]
    fn none_when_every_pattern_rejects() {
        // The invalid parenthesized pair is also each pattern's first
        // bare-pair match, so nothing valid is left to fall through to.
        assert!(extract_coordinates("(95.0, 10.0) offshore").is_none());
    }

    #[test]
    fn no_coordinates_in_plain_text() {
        assert!(extract_coordinates("Severe flooding in Sindh province").is_none());
    }

    #[test]
    fn accepts_boundary_values() {
        let (lat, lon) = extract_coordinates("(-90.0, 180.0)").unwrap();
        assert!((lat - -90.0).abs() < f64::EPSILON);
        assert!((lon - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn accepts_integer_coordinates_in_parentheses() {
        let (lat, lon) = extract_coordinates("(7, 127)").unwrap();
        assert!((lat - 7.0).abs() < f64::EPSILON);
        assert!((lon - 127.0).abs() < f64::EPSILON);
    }
}
