//! Keyword-based disaster categorization.
//!
//! Scores each category by how many of its keywords appear in the text
//! (distinct keywords, not occurrences). The highest score wins; ties
//! break toward the earlier-declared category, so broad terms like
//! "fire" cannot outrank a specific earlier match.

use relief_map_disaster_models::DisasterType;

/// Keyword table driving [`classify_disaster`].
///
/// The default table covers the GDACS event types. Feeds with unusual
/// vocabulary can supply their own table.
#[derive(Debug, Clone)]
pub struct CategoryKeywords {
    entries: Vec<(DisasterType, Vec<&'static str>)>,
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        Self {
            entries: vec![
                (
                    DisasterType::Eq,
                    vec!["earthquake", "magnitude", "seismic", "tremor", "quake"],
                ),
                (
                    DisasterType::Fl,
                    vec!["flood", "flooding", "inundation", "overflow"],
                ),
                (
                    DisasterType::Wf,
                    vec!["forest fire", "wildfire", "fire alert", "bushfire", "fire"],
                ),
                (
                    DisasterType::Tc,
                    vec![
                        "cyclone",
                        "hurricane",
                        "typhoon",
                        "tropical storm",
                        "tropical depression",
                    ],
                ),
                (
                    DisasterType::Vo,
                    vec!["volcanic", "eruption", "volcano", "ash cloud", "lava"],
                ),
                (
                    DisasterType::Dr,
                    vec!["drought", "dry spell", "water shortage"],
                ),
                (
                    DisasterType::Ls,
                    vec!["landslide", "mudslide", "slope failure"],
                ),
                (
                    DisasterType::Ts,
                    vec!["tsunami", "tidal wave", "seismic wave"],
                ),
            ],
        }
    }
}

impl CategoryKeywords {
    /// Builds a table from explicit `(category, keywords)` entries.
    /// Declaration order is the tie-break order.
    #[must_use]
    pub const fn new(entries: Vec<(DisasterType, Vec<&'static str>)>) -> Self {
        Self { entries }
    }

    /// Returns the table entries in declaration order.
    #[must_use]
    pub fn entries(&self) -> &[(DisasterType, Vec<&'static str>)] {
        &self.entries
    }
}

/// Classifies alert text into a [`DisasterType`].
///
/// Matching is case-insensitive substring containment. Returns
/// [`DisasterType::Unknown`] when no keyword from any category appears.
#[must_use]
pub fn classify_disaster(text: &str, keywords: &CategoryKeywords) -> DisasterType {
    let lowered = text.to_lowercase();
    let mut best = DisasterType::Unknown;
    let mut best_score = 0usize;
    for (category, words) in keywords.entries() {
        let score = words.iter().filter(|word| lowered.contains(*word)).count();
        if score > best_score {
            best = *category;
            best_score = score;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> DisasterType {
        classify_disaster(text, &CategoryKeywords::default())
    }

    #[test]
    fn classifies_earthquake() {
        assert_eq!(
            classify("M 6.1 earthquake, magnitude revised upward"),
            DisasterType::Eq
        );
    }

    #[test]
    fn classifies_flood() {
        assert_eq!(classify("Flash flooding across Sindh"), DisasterType::Fl);
    }

    #[test]
    fn classifies_wildfire() {
        assert_eq!(classify("Bushfire alert issued"), DisasterType::Wf);
    }

    #[test]
    fn classifies_cyclone() {
        assert_eq!(
            classify("Tropical Storm Iona strengthening into a typhoon"),
            DisasterType::Tc
        );
    }

    #[test]
    fn classifies_volcano() {
        assert_eq!(classify("Ash cloud from the eruption"), DisasterType::Vo);
    }

    #[test]
    fn classifies_drought() {
        assert_eq!(classify("prolonged dry spell and water shortage"), DisasterType::Dr);
    }

    #[test]
    fn classifies_landslide() {
        assert_eq!(classify("mudslide after heavy rain"), DisasterType::Ls);
    }

    #[test]
    fn tsunami_outscores_earthquake_on_keyword_count() {
        // "seismic" scores one for Eq; "tsunami" + "seismic wave" score two
        // for Ts.
        assert_eq!(
            classify("tsunami warning after seismic wave detected"),
            DisasterType::Ts
        );
    }

    #[test]
    fn tie_breaks_toward_earlier_category() {
        // One keyword each for Eq ("tremor") and Fl ("flood"); Eq is
        // declared first.
        assert_eq!(classify("tremor then flood"), DisasterType::Eq);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("EARTHQUAKE"), DisasterType::Eq);
    }

    #[test]
    fn unknown_without_keywords() {
        assert_eq!(classify("Situation report, week 30"), DisasterType::Unknown);
    }

    #[test]
    fn custom_table_is_honored() {
        let table = CategoryKeywords::new(vec![(DisasterType::Fl, vec!["monsoon"])]);
        assert_eq!(
            classify_disaster("monsoon season begins", &table),
            DisasterType::Fl
        );
    }
}
