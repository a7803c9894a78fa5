//! Event-time extraction from free text.
//!
//! Feeds report timestamps in several house styles. Each style is a
//! `(locator regex, chrono format)` pair; the first pattern that both
//! matches and parses under its paired format wins. All naive
//! timestamps are treated as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

struct TimePattern {
    locator: Regex,
    format: &'static str,
    date_only: bool,
}

static PATTERNS: LazyLock<Vec<TimePattern>> = LazyLock::new(|| {
    vec![
        // GDACS style: 25/07/2025 14:30 UTC
        TimePattern {
            locator: Regex::new(r"(\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}) UTC")
                .expect("valid regex"),
            format: "%d/%m/%Y %H:%M",
            date_only: false,
        },
        // US style with seconds and meridiem: 7/25/2025 2:30:00 PM
        TimePattern {
            locator: Regex::new(r"(\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}:\d{2} [AP]M)")
                .expect("valid regex"),
            format: "%m/%d/%Y %I:%M:%S %p",
            date_only: false,
        },
        // Narrative prefix: On 25/07/2025 14:30
        TimePattern {
            locator: Regex::new(r"On (\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2})")
                .expect("valid regex"),
            format: "%d/%m/%Y %H:%M",
            date_only: false,
        },
        TimePattern {
            locator: Regex::new(r"On (\d{1,2}/\d{1,2}/\d{4})").expect("valid regex"),
            format: "%d/%m/%Y",
            date_only: true,
        },
        TimePattern {
            locator: Regex::new(r"From (\d{1,2}/\d{1,2}/\d{4})").expect("valid regex"),
            format: "%d/%m/%Y",
            date_only: true,
        },
        // ISO 8601 datetime
        TimePattern {
            locator: Regex::new(r"(\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2})")
                .expect("valid regex"),
            format: "%Y-%m-%dT%H:%M:%S",
            date_only: false,
        },
        // ISO 8601 date
        TimePattern {
            locator: Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("valid regex"),
            format: "%Y-%m-%d",
            date_only: true,
        },
    ]
});

/// Extracts an event timestamp from free text.
///
/// Date-only matches resolve to midnight UTC. A located timestamp that
/// fails to parse (e.g. `31/02/2025`) is rejected and extraction moves
/// on to the next pattern; `None` when every pattern fails.
#[must_use]
pub fn extract_time(text: &str) -> Option<DateTime<Utc>> {
    for pattern in PATTERNS.iter() {
        let Some(caps) = pattern.locator.captures(text) else {
            continue;
        };
        let Some(found) = caps.get(1) else {
            continue;
        };
        let mut raw = found.as_str().to_string();
        if pattern.format.contains('T') {
            raw = raw.replacen(' ', "T", 1);
        }
        let parsed = if pattern.date_only {
            NaiveDate::parse_from_str(&raw, pattern.format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        } else {
            NaiveDateTime::parse_from_str(&raw, pattern.format).ok()
        };
        if let Some(naive) = parsed {
            return Some(naive.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_gdacs_utc_style() {
        let dt = extract_time("Event detected 25/07/2025 14:30 UTC in region").unwrap();
        assert_eq!(dt.to_string(), "2025-07-25 14:30:00 UTC");
    }

    #[test]
    fn extracts_us_meridiem_style() {
        let dt = extract_time("Updated 7/25/2025 2:30:00 PM").unwrap();
        assert_eq!(dt.to_string(), "2025-07-25 14:30:00 UTC");
    }

    #[test]
    fn extracts_on_date_prefix() {
        let dt = extract_time("On 25/07/2025 the river crested").unwrap();
        assert_eq!(dt.to_string(), "2025-07-25 00:00:00 UTC");
    }

    #[test]
    fn extracts_from_date_prefix() {
        let dt = extract_time("From 01/08/2025 onwards").unwrap();
        assert_eq!(dt.to_string(), "2025-08-01 00:00:00 UTC");
    }

    #[test]
    fn extracts_iso_datetime() {
        let dt = extract_time("issued 2025-07-25T14:30:00Z").unwrap();
        assert_eq!(dt.to_string(), "2025-07-25 14:30:00 UTC");
    }

    #[test]
    fn extracts_iso_date() {
        let dt = extract_time("report of 2025-07-25").unwrap();
        assert_eq!(dt.to_string(), "2025-07-25 00:00:00 UTC");
    }

    #[test]
    fn gdacs_style_wins_over_iso() {
        let dt = extract_time("25/07/2025 14:30 UTC (also 2025-01-01)").unwrap();
        assert_eq!(dt.to_string(), "2025-07-25 14:30:00 UTC");
    }

    #[test]
    fn extracts_single_digit_day_and_month() {
        let dt = extract_time("On 5/7/2025 the dam failed").unwrap();
        assert_eq!(dt.to_string(), "2025-07-05 00:00:00 UTC");

        let dt = extract_time("5/7/2025 09:04 UTC").unwrap();
        assert_eq!(dt.to_string(), "2025-07-05 09:04:00 UTC");
    }

    #[test]
    fn impossible_date_yields_none() {
        assert!(extract_time("On 31/02/2025 nothing happened").is_none());
    }

    #[test]
    fn impossible_date_falls_through_to_later_pattern() {
        let dt = extract_time("On 31/02/2025 report dated 2025-03-01").unwrap();
        assert_eq!(dt.to_string(), "2025-03-01 00:00:00 UTC");
    }

    #[test]
    fn no_timestamp_in_plain_text() {
        assert!(extract_time("Severe flooding reported across the region").is_none());
    }
}
