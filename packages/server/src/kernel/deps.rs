//! Server dependencies for the enrichment pipeline (using traits for testability)
//!
//! This module provides the central dependency container used by every activity.
//! All external services use trait abstractions so tests can swap in mocks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::domains::events::models::ScoredVia;
use crate::kernel::{BaseAI, BaseEventSource, BaseGeocoder};

// =============================================================================
// Pipeline Settings
// =============================================================================

/// Per-call bounds for the enrichment pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Wait for the model before falling back to keyword scoring
    pub classify_timeout: Duration,
    pub geocode_timeout: Duration,
    /// Events enriched at the same time within one request
    pub enrich_concurrency: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            classify_timeout: Duration::from_secs(15),
            geocode_timeout: Duration::from_secs(10),
            enrich_concurrency: 8,
        }
    }
}

// =============================================================================
// Classifier Stats
// =============================================================================

/// Process-wide count of how events were scored, for spotting degraded mode.
#[derive(Debug, Default)]
pub struct ClassifierStats {
    model: AtomicU64,
    fallback: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassifierCounts {
    pub model: u64,
    pub fallback: u64,
}

impl ClassifierStats {
    pub fn record(&self, via: ScoredVia) {
        let counter = match via {
            ScoredVia::Model => &self.model,
            ScoredVia::Fallback => &self.fallback,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ClassifierCounts {
        ClassifierCounts {
            model: self.model.load(Ordering::Relaxed),
            fallback: self.fallback.load(Ordering::Relaxed),
        }
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to activities (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    /// Legislative directory
    pub event_source: Arc<dyn BaseEventSource>,
    /// LLM for impact analysis. `None` runs in fallback-only mode.
    pub ai: Option<Arc<dyn BaseAI>>,
    pub geocoder: Arc<dyn BaseGeocoder>,
    pub settings: PipelineSettings,
    pub classifier_stats: Arc<ClassifierStats>,
}

impl ServerDeps {
    pub fn new(
        event_source: Arc<dyn BaseEventSource>,
        ai: Option<Arc<dyn BaseAI>>,
        geocoder: Arc<dyn BaseGeocoder>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            event_source,
            ai,
            geocoder,
            settings,
            classifier_stats: Arc::new(ClassifierStats::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_stats_counts_each_path() {
        let stats = ClassifierStats::default();
        stats.record(ScoredVia::Model);
        stats.record(ScoredVia::Fallback);
        stats.record(ScoredVia::Fallback);

        assert_eq!(
            stats.snapshot(),
            ClassifierCounts {
                model: 1,
                fallback: 2
            }
        );
    }
}
