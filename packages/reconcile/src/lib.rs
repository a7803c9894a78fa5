#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Fill-only record reconciliation.
//!
//! Re-running an ingest must never degrade stored data: an incoming
//! record only ever adds information to an existing one, field by field.
//! A field that already holds a value keeps it, even when the incoming
//! record disagrees. `updated_at` is touched only when at least one
//! field actually changed, so timestamps reflect real enrichment.

pub mod store;

use chrono::{DateTime, Utc};
use relief_map_disaster_models::{DisasterKey, DisasterRecord, DisasterType};
use relief_map_shelter_models::{ShelterKey, ShelterRecord};

use store::{RecordStore, StoreError};

/// A record type that can be merged fill-only against a stored copy.
pub trait Reconcilable {
    /// Identity key type for this record family.
    type Key;

    /// Returns the identity key for this record.
    fn key(&self) -> Self::Key;

    /// Copies values from `incoming` into fields of `self` that are
    /// currently missing, returning the names of the fields that were
    /// filled. Populated fields are never overwritten.
    fn fill_missing(&mut self, incoming: &Self) -> Vec<&'static str>;

    /// Marks this record as modified at `now`.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// What happened to one incoming record during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No record with this key existed; the incoming record was stored.
    Created,
    /// An existing record gained the named fields.
    Updated {
        /// Names of the fields that were filled.
        fields: Vec<&'static str>,
    },
    /// An existing record matched but had nothing left to fill.
    Skipped,
}

/// Reconciles one incoming record against the store.
///
/// # Errors
///
/// Returns [`StoreError`] if the store cannot be read or written.
pub fn reconcile<R, S>(
    store: &S,
    incoming: R,
    now: DateTime<Utc>,
) -> Result<ReconcileOutcome, StoreError>
where
    R: Reconcilable,
    S: RecordStore<R> + ?Sized,
{
    let key = incoming.key();
    match store.find_by_key(&key)? {
        None => {
            store.create(incoming)?;
            Ok(ReconcileOutcome::Created)
        }
        Some(mut existing) => {
            let fields = existing.fill_missing(&incoming);
            if fields.is_empty() {
                Ok(ReconcileOutcome::Skipped)
            } else {
                existing.touch(now);
                store.update(&key, existing)?;
                Ok(ReconcileOutcome::Updated { fields })
            }
        }
    }
}

impl Reconcilable for DisasterRecord {
    type Key = DisasterKey;

    fn key(&self) -> DisasterKey {
        Self::key(self)
    }

    fn fill_missing(&mut self, incoming: &Self) -> Vec<&'static str> {
        let mut filled = Vec::new();

        if self.description.as_deref().is_none_or(str::is_empty) {
            if let Some(description) = incoming
                .description
                .as_deref()
                .filter(|s| !s.is_empty())
            {
                self.description = Some(description.to_string());
                filled.push("description");
            }
        }
        if self.disaster_type == DisasterType::Unknown
            && incoming.disaster_type != DisasterType::Unknown
        {
            self.disaster_type = incoming.disaster_type;
            filled.push("disaster_type");
        }
        if self.population_affected == 0 && incoming.population_affected > 0 {
            self.population_affected = incoming.population_affected;
            filled.push("population_affected");
        }
        if self.disaster_time.is_none() {
            if let Some(time) = incoming.disaster_time {
                self.disaster_time = Some(time);
                filled.push("disaster_time");
            }
        }
        if self.latitude.is_none() || self.longitude.is_none() {
            if let (Some(lat), Some(lon)) = (incoming.latitude, incoming.longitude) {
                self.latitude = Some(lat);
                self.longitude = Some(lon);
                filled.push("coordinates");
            }
        }

        filled
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Reconcilable for ShelterRecord {
    type Key = ShelterKey;

    fn key(&self) -> ShelterKey {
        Self::key(self)
    }

    fn fill_missing(&mut self, incoming: &Self) -> Vec<&'static str> {
        let mut filled = Vec::new();

        if self.total_spaces == 0 && incoming.total_spaces > 0 {
            self.total_spaces = incoming.total_spaces;
            filled.push("total_spaces");
        }
        if self.available_spaces == 0 && incoming.available_spaces > 0 {
            self.available_spaces = incoming.available_spaces;
            filled.push("available_spaces");
        }
        if self.contact.phone.is_empty() && !incoming.contact.phone.is_empty() {
            self.contact.phone = incoming.contact.phone.clone();
            filled.push("phone");
        }
        if self.contact.email.is_empty() && !incoming.contact.email.is_empty() {
            self.contact.email = incoming.contact.email.clone();
            filled.push("email");
        }
        if self.contact.website.is_empty() && !incoming.contact.website.is_empty() {
            self.contact.website = incoming.contact.website.clone();
            filled.push("website");
        }
        if self.hours_open.is_none() && self.hours_close.is_none() {
            if let (Some(open), Some(close)) = (incoming.hours_open, incoming.hours_close) {
                self.hours_open = Some(open);
                self.hours_close = Some(close);
                filled.push("hours");
            }
        }
        if self.source == "Unknown" && incoming.source != "Unknown" && !incoming.source.is_empty()
        {
            self.source = incoming.source.clone();
            filled.push("source");
        }

        // Capabilities only ever gain: a flag already set stays set.
        let mut capabilities_filled = false;
        let mine = &mut self.capabilities;
        let theirs = &incoming.capabilities;
        for (current, new) in [
            (&mut mine.has_bed, theirs.has_bed),
            (&mut mine.has_food, theirs.has_food),
            (&mut mine.has_water, theirs.has_water),
            (&mut mine.has_medical, theirs.has_medical),
            (&mut mine.has_shower, theirs.has_shower),
            (&mut mine.has_laundry, theirs.has_laundry),
            (&mut mine.wheelchair_accessible, theirs.wheelchair_accessible),
            (&mut mine.accepts_families, theirs.accepts_families),
            (&mut mine.accepts_men, theirs.accepts_men),
            (&mut mine.accepts_women, theirs.accepts_women),
            (&mut mine.accepts_pets, theirs.accepts_pets),
            (&mut mine.has_case_management, theirs.has_case_management),
            (&mut mine.has_mental_health, theirs.has_mental_health),
            (&mut mine.has_substance_abuse, theirs.has_substance_abuse),
        ] {
            if !*current && new {
                *current = true;
                capabilities_filled = true;
            }
        }
        if capabilities_filled {
            filled.push("capabilities");
        }
        if !self.is_24_7 && incoming.is_24_7 {
            self.is_24_7 = true;
            filled.push("is_24_7");
        }
        if !self.is_emergency && incoming.is_emergency {
            self.is_emergency = true;
            filled.push("is_emergency");
        }

        filled
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_map_shelter_models::{ShelterCapabilities, ShelterContact};
    use store::MemoryStore;

    fn disaster(title: &str) -> DisasterRecord {
        DisasterRecord {
            title: title.to_string(),
            description: None,
            location: "Pakistan".to_string(),
            disaster_type: DisasterType::Unknown,
            population_affected: 0,
            disaster_time: None,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn shelter(name: &str) -> ShelterRecord {
        ShelterRecord {
            name: name.to_string(),
            address: "12 Main St".to_string(),
            latitude: 27.7,
            longitude: 68.85,
            capabilities: ShelterCapabilities::default(),
            is_24_7: false,
            is_open: true,
            is_emergency: false,
            total_spaces: 0,
            available_spaces: 0,
            hours_open: None,
            hours_close: None,
            contact: ShelterContact::default(),
            source: "Unknown".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn first_sighting_creates() {
        let store = MemoryStore::new();
        let outcome = reconcile(&store, disaster("Flood"), Utc::now()).unwrap();
        assert_eq!(outcome, ReconcileOutcome::Created);
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[test]
    fn resighting_identical_record_skips() {
        let store = MemoryStore::new();
        reconcile(&store, disaster("Flood"), Utc::now()).unwrap();
        let outcome = reconcile(&store, disaster("Flood"), Utc::now()).unwrap();
        assert_eq!(outcome, ReconcileOutcome::Skipped);
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[test]
    fn richer_resighting_fills_gaps_only() {
        let store = MemoryStore::new();
        let mut first = disaster("Flood");
        first.population_affected = 500;
        reconcile(&store, first, Utc::now()).unwrap();

        let mut second = disaster("Flood");
        second.population_affected = 9999; // must not win
        second.disaster_type = DisasterType::Fl;
        second.latitude = Some(27.7);
        second.longitude = Some(68.85);

        let outcome = reconcile(&store, second, Utc::now()).unwrap();
        let ReconcileOutcome::Updated { fields } = outcome else {
            panic!("expected an update");
        };
        assert_eq!(fields, vec!["disaster_type", "coordinates"]);

        let stored = &store.all().unwrap()[0];
        assert_eq!(stored.population_affected, 500);
        assert_eq!(stored.disaster_type, DisasterType::Fl);
        assert!(stored.latitude.is_some());
    }

    #[test]
    fn updated_at_touched_only_on_change() {
        let store = MemoryStore::new();
        reconcile(&store, disaster("Flood"), Utc::now()).unwrap();
        let before = store.all().unwrap()[0].updated_at;

        let later = before + chrono::Duration::hours(1);
        reconcile(&store, disaster("Flood"), later).unwrap();
        assert_eq!(store.all().unwrap()[0].updated_at, before);

        let mut richer = disaster("Flood");
        richer.disaster_type = DisasterType::Fl;
        reconcile(&store, richer, later).unwrap();
        assert_eq!(store.all().unwrap()[0].updated_at, later);
    }

    #[test]
    fn fill_is_idempotent() {
        let mut sparse = disaster("Flood");
        let mut richer = disaster("Flood");
        richer.disaster_type = DisasterType::Fl;
        richer.population_affected = 100;

        let first = sparse.fill_missing(&richer);
        assert_eq!(first.len(), 2);
        let second = sparse.fill_missing(&richer);
        assert!(second.is_empty());
    }

    #[test]
    fn coordinates_fill_as_a_pair() {
        let mut sparse = disaster("Flood");
        let mut half = disaster("Flood");
        half.latitude = Some(27.7); // no longitude

        assert!(sparse.fill_missing(&half).is_empty());
        assert!(sparse.latitude.is_none());
    }

    #[test]
    fn distinct_keys_do_not_collide() {
        let store = MemoryStore::new();
        reconcile(&store, disaster("Flood"), Utc::now()).unwrap();
        let mut other = disaster("Flood");
        other.location = "India".to_string();
        let outcome = reconcile(&store, other, Utc::now()).unwrap();
        assert_eq!(outcome, ReconcileOutcome::Created);
        assert_eq!(store.all().unwrap().len(), 2);
    }

    #[test]
    fn shelter_capabilities_only_gain() {
        let store = MemoryStore::new();
        let mut first = shelter("Camp A");
        first.capabilities.has_medical = true;
        reconcile(&store, first, Utc::now()).unwrap();

        let mut second = shelter("Camp A");
        second.capabilities.has_bed = true;
        // has_medical false on the incoming record must not clear it
        let outcome = reconcile(&store, second, Utc::now()).unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Updated { .. }));

        let stored = &store.all().unwrap()[0];
        assert!(stored.capabilities.has_medical);
        assert!(stored.capabilities.has_bed);
    }

    #[test]
    fn shelter_source_upgrades_from_unknown_only() {
        let store = MemoryStore::new();
        let mut first = shelter("Camp A");
        first.source = "HDX".to_string();
        reconcile(&store, first, Utc::now()).unwrap();

        let mut second = shelter("Camp A");
        second.source = "Other Portal".to_string();
        reconcile(&store, second, Utc::now()).unwrap();
        assert_eq!(store.all().unwrap()[0].source, "HDX");
    }

    #[test]
    fn shelter_spaces_fill_from_zero() {
        let store = MemoryStore::new();
        reconcile(&store, shelter("Camp A"), Utc::now()).unwrap();

        let mut second = shelter("Camp A");
        second.total_spaces = 200;
        second.available_spaces = 150;
        let outcome = reconcile(&store, second, Utc::now()).unwrap();
        let ReconcileOutcome::Updated { fields } = outcome else {
            panic!("expected an update");
        };
        assert!(fields.contains(&"total_spaces"));
        assert!(fields.contains(&"available_spaces"));
    }
}
