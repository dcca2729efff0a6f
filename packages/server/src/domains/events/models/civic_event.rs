use serde::{Deserialize, Serialize};

use super::{Borough, ClassificationResult, ImpactScore, RawEvent, Topic};

/// Wire format for event times: local New York wall-clock, ISO-8601.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Resolved coordinates for an address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Geocoding outcome. `None` means the address could not be resolved.
pub type GeoResult = Option<Coordinates>;

/// The fully enriched record exposed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CivicEvent {
    pub id: String,
    pub title: String,
    pub community_impact_summary: String,
    pub date_time: String,
    pub location: String,
    pub topic: Topic,
    pub link: String,
    pub impact_score: ImpactScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borough: Option<Borough>,
}

impl CivicEvent {
    /// Combine the outputs of each pipeline stage into the final record.
    pub fn assemble(raw: RawEvent, classification: ClassificationResult, geo: GeoResult) -> Self {
        let borough = Borough::from_location(&raw.raw_location);

        Self {
            id: raw.id,
            title: raw.title,
            community_impact_summary: classification.community_impact_summary,
            date_time: raw.scheduled_at.format(DATE_TIME_FORMAT).to_string(),
            location: raw.raw_location,
            topic: classification.topic,
            link: raw.link,
            impact_score: classification.impact_score,
            latitude: geo.map(|c| c.latitude),
            longitude: geo.map(|c| c.longitude),
            borough,
        }
    }

    pub fn is_high_impact(&self) -> bool {
        self.impact_score.is_high_impact()
    }
}
