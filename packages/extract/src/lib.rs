#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Heuristic field extraction from free-text alert content.
//!
//! Disaster feeds bury structured facts (coordinates, timestamps,
//! population figures, event categories) in titles, descriptions, and
//! location strings. These extractors recover them so the enrichment pass
//! can fill gaps in stored records. Every extractor is pure and
//! deterministic; the same input always yields the same output.

pub mod category;
pub mod coordinate;
pub mod population;
pub mod time;

pub use category::{classify_disaster, CategoryKeywords};
pub use coordinate::extract_coordinates;
pub use population::extract_population;
pub use time::extract_time;
