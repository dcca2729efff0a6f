//! Enrichment: classify and geocode each raw event, then assemble the public record.
//!
//! Events are processed concurrently (bounded by `enrich_concurrency`) and
//! returned in input order. Classification and geocoding cannot fail, so one
//! event never affects another. With `include_agenda`, each event's agenda
//! summary is fetched before its classification.

use futures::stream::{self, StreamExt};
use tracing::info;

use super::agenda::agenda_context;
use super::classify::classify;
use super::geocode::geocode;
use crate::domains::events::models::{CivicEvent, RawEvent, ScoredVia};
use crate::kernel::ServerDeps;

/// Enrich a single event. Classification and geocoding run concurrently.
pub async fn enrich_event(
    raw: RawEvent,
    include_agenda: bool,
    deps: &ServerDeps,
) -> (CivicEvent, ScoredVia) {
    let scoring = async {
        let agenda = if include_agenda {
            agenda_context(&raw, deps).await
        } else {
            None
        };
        classify(&raw.title, &raw.description, agenda.as_deref(), deps).await
    };
    let (scored, geo) = tokio::join!(scoring, geocode(&raw.raw_location, deps));

    (CivicEvent::assemble(raw, scored.result, geo), scored.via)
}

/// Enrich all events, preserving order and length.
pub async fn enrich_events(
    raw_events: Vec<RawEvent>,
    include_agenda: bool,
    deps: &ServerDeps,
) -> Vec<CivicEvent> {
    let total = raw_events.len();
    let concurrency = deps.settings.enrich_concurrency.max(1);

    let enriched: Vec<(CivicEvent, ScoredVia)> = stream::iter(raw_events)
        .map(|raw| enrich_event(raw, include_agenda, deps))
        .buffered(concurrency)
        .collect()
        .await;

    let fallback = enriched
        .iter()
        .filter(|(_, via)| *via == ScoredVia::Fallback)
        .count();
    let geocoded = enriched
        .iter()
        .filter(|(event, _)| event.latitude.is_some())
        .count();

    info!(total, fallback, geocoded, concurrency, include_agenda, "Enriched events");

    enriched.into_iter().map(|(event, _)| event).collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domains::events::models::Topic;
    use crate::kernel::test_dependencies::{
        sample_raw_event, MockAI, MockEventSource, MockGeocoder, TestDependencies,
    };

    #[tokio::test]
    async fn test_order_and_length_preserved_under_uneven_latency() {
        // first event's model reply is slowest, so it completes last
        let ai = MockAI::new()
            .with_delay(
                "Committee on Education",
                Duration::from_millis(100),
                r#"{"impact_score": 4, "community_impact_summary": "Schools affected.", "topic": "Education"}"#,
            )
            .with_assessment("Committee on Transportation", 3, "Bus routes change.", "Transportation")
            .with_assessment("Committee on Health", 5, "Clinics may close.", "Health/Social Services");
        let deps = TestDependencies::new().ai(ai).into_server_deps();

        let raw = vec![
            sample_raw_event("a", "Committee on Education", "", ""),
            sample_raw_event("b", "Committee on Transportation", "", ""),
            sample_raw_event("c", "Committee on Health", "", ""),
        ];

        let events = enrich_events(raw, false, &deps).await;

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(events[0].topic, Topic::Education);
        assert_eq!(events[2].impact_score.value(), 5);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let ai = MockAI::new()
            .with_error("Committee on Finance", "upstream 500")
            .with_assessment("Committee on Parks", 2, "Park hours change.", "Environment");
        let geocoder = MockGeocoder::new()
            .with_failure("Bad Address")
            .with_location("City Hall, New York, NY", 40.7130, -74.0078);
        let deps = TestDependencies::new().ai(ai).geocoder(geocoder).into_server_deps();

        let raw = vec![
            sample_raw_event("1", "Committee on Finance", "", "Bad Address"),
            sample_raw_event("2", "Committee on Parks", "", "City Hall, New York, NY"),
        ];

        let events = enrich_events(raw, false, &deps).await;

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].topic, Topic::BudgetFinance);
        assert_eq!(events[0].latitude, None);

        assert_eq!(events[1].topic, Topic::Environment);
        assert_eq!(events[1].community_impact_summary, "Park hours change.");
        assert_eq!(events[1].latitude, Some(40.7130));

        let counts = deps.classifier_stats.snapshot();
        assert_eq!((counts.model, counts.fallback), (1, 1));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let deps = TestDependencies::new().into_server_deps();
        assert!(enrich_events(Vec::new(), false, &deps).await.is_empty());
    }

    #[tokio::test]
    async fn test_agenda_summary_feeds_classification() {
        let url = "https://legistar.council.nyc.gov/View.ashx?M=A&ID=5";
        let ai = MockAI::new()
            .with_document_summary("Proposed closure of two senior centers.")
            .with_assessment(
                "senior centers",
                5,
                "Senior centers may close.",
                "Health/Social Services",
            );
        let source = MockEventSource::empty().with_agenda(url, b"%PDF-1.4");
        let deps = TestDependencies::new()
            .event_source(source)
            .ai(ai.clone())
            .into_server_deps();

        let mut raw = sample_raw_event("5", "Committee on Aging", "", "");
        raw.agenda_url = Some(url.to_string());

        let (event, via) = enrich_event(raw.clone(), true, &deps).await;
        assert_eq!(via, ScoredVia::Model);
        assert_eq!(event.topic, Topic::HealthSocialServices);

        // same event without the flag: no document request, no agenda in the prompt
        let (_, via) = enrich_event(raw, false, &deps).await;
        assert_eq!(via, ScoredVia::Fallback);
        assert_eq!(ai.documents().len(), 1);
        assert!(!ai.calls()[1].contains("Agenda highlights"));
    }
}
