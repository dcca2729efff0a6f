//! Event activities: discovery, classification, geocoding and enrichment.

pub mod agenda;
pub mod classify;
pub mod discover;
pub mod enrich;
pub mod fallback;
pub mod geocode;

pub use agenda::agenda_context;
pub use classify::{classify, parse_assessment, ClassifyError, ModelAssessment};
pub use discover::{discover, KeywordFilter, CIVIC_KEYWORDS};
pub use enrich::{enrich_event, enrich_events};
pub use fallback::fallback_classification;
pub use geocode::geocode;
