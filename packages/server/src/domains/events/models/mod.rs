pub mod borough;
pub mod civic_event;
pub mod classification;
pub mod raw_event;
pub mod topic;

pub use borough::Borough;
pub use civic_event::{CivicEvent, Coordinates, GeoResult, DATE_TIME_FORMAT};
pub use classification::{
    limit_to_two_sentences, ClassificationResult, ImpactScore, Scored, ScoredVia,
};
pub use raw_event::{DiscoveryWindow, RawEvent};
pub use topic::Topic;
