//! Affected-population extraction from free text.
//!
//! Matches phrasings like "2.3 million affected", "15 thousand displaced",
//! or "Population affected: 50000". When several figures appear, the
//! largest wins. Returns `0` when no figure is found, so callers cannot
//! distinguish "nobody affected" from "not reported".

use regex::Regex;
use std::sync::LazyLock;

struct PopulationPattern {
    locator: Regex,
    multiplier: f64,
}

static PATTERNS: LazyLock<Vec<PopulationPattern>> = LazyLock::new(|| {
    vec![
        PopulationPattern {
            locator: Regex::new(r"(?i)([\d,]+(?:\.\d+)?)\s*million(?:\s+(?:people\s+)?affect)?")
                .expect("valid regex"),
            multiplier: 1_000_000.0,
        },
        PopulationPattern {
            locator: Regex::new(r"(?i)([\d,]+(?:\.\d+)?)\s*thousand(?:\s+(?:people\s+)?affect)?")
                .expect("valid regex"),
            multiplier: 1_000.0,
        },
        PopulationPattern {
            locator: Regex::new(r"(?i)affecting\s+([\d,]+)\s+(?:people|persons)")
                .expect("valid regex"),
            multiplier: 1.0,
        },
        PopulationPattern {
            locator: Regex::new(r"(?i)([\d,]+)\s+(?:people|persons)\s+affected")
                .expect("valid regex"),
            multiplier: 1.0,
        },
        PopulationPattern {
            locator: Regex::new(r"(?i)([\d,]+)\s+(?:people\s+)?displaced").expect("valid regex"),
            multiplier: 1.0,
        },
        PopulationPattern {
            locator: Regex::new(r"(?i)([\d,]+)\s+deaths?").expect("valid regex"),
            multiplier: 1.0,
        },
        PopulationPattern {
            locator: Regex::new(r"(?i)([\d,]+)\s+in\s+MMI").expect("valid regex"),
            multiplier: 1.0,
        },
        PopulationPattern {
            locator: Regex::new(r"(?i)population\s+affected.*?(\d[\d,]*)").expect("valid regex"),
            multiplier: 1.0,
        },
    ]
});

/// Extracts the affected-population count from free text.
///
/// All matching figures across all patterns are considered and the
/// maximum is returned; figures are never summed, since feeds routinely
/// restate the same count in more than one phrasing.
#[must_use]
pub fn extract_population(text: &str) -> u64 {
    let mut best: u64 = 0;
    for pattern in PATTERNS.iter() {
        for caps in pattern.locator.captures_iter(text) {
            let Some(raw) = caps.get(1) else {
                continue;
            };
            let cleaned = raw.as_str().replace(',', "");
            if let Ok(value) = cleaned.parse::<f64>() {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let count = (value * pattern.multiplier).round() as u64;
                best = best.max(count);
            }
        }
    }
    best
}
