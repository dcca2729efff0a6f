// Mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use openai_client::OpenAIError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{BaseAI, BaseEventSource, BaseGeocoder, PipelineSettings, ServerDeps};
use crate::domains::events::models::{Coordinates, DiscoveryWindow, RawEvent};

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

#[derive(Debug, Clone)]
enum MockReply {
    Json(String),
    Error(String),
    RateLimited,
    Delayed(Duration, String),
}

/// LLM mock that answers by matching a fragment of the user prompt.
///
/// Prompts matching no rule fail, which sends the classifier to its fallback.
/// Clones share rules and recorded calls.
#[derive(Clone)]
pub struct MockAI {
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    calls: Arc<Mutex<Vec<String>>>,
    document_reply: Arc<Mutex<Option<MockReply>>>,
    documents: Arc<Mutex<Vec<String>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            rules: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            document_reply: Arc::new(Mutex::new(None)),
            documents: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn with_rule(self, fragment: &str, reply: MockReply) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((fragment.to_string(), reply));
        self
    }

    /// Reply with raw JSON text when the prompt contains `fragment`
    pub fn with_response(self, fragment: &str, json: &str) -> Self {
        self.with_rule(fragment, MockReply::Json(json.to_string()))
    }

    /// Reply with a well-formed assessment
    pub fn with_assessment(self, fragment: &str, score: i64, summary: &str, topic: &str) -> Self {
        let json = serde_json::json!({
            "impact_score": score,
            "community_impact_summary": summary,
            "topic": topic,
        });
        self.with_response(fragment, &json.to_string())
    }

    pub fn with_error(self, fragment: &str, message: &str) -> Self {
        self.with_rule(fragment, MockReply::Error(message.to_string()))
    }

    /// Fail the way a quota-exhausted provider does (HTTP 429)
    pub fn with_rate_limit(self, fragment: &str) -> Self {
        self.with_rule(fragment, MockReply::RateLimited)
    }

    /// Reply only after `delay`
    pub fn with_delay(self, fragment: &str, delay: Duration, json: &str) -> Self {
        self.with_rule(fragment, MockReply::Delayed(delay, json.to_string()))
    }

    /// Answer every document request with `summary`
    pub fn with_document_summary(self, summary: &str) -> Self {
        *self.document_reply.lock().unwrap() = Some(MockReply::Json(summary.to_string()));
        self
    }

    pub fn with_document_error(self, message: &str) -> Self {
        *self.document_reply.lock().unwrap() = Some(MockReply::Error(message.to_string()));
        self
    }

    /// Answer document requests with `summary` only after `delay`
    pub fn with_document_delay(self, delay: Duration, summary: &str) -> Self {
        *self.document_reply.lock().unwrap() =
            Some(MockReply::Delayed(delay, summary.to_string()));
        self
    }

    /// User prompts received so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Filenames of documents sent for summary so far
    pub fn documents(&self) -> Vec<String> {
        self.documents.lock().unwrap().clone()
    }
}

async fn play(reply: Option<MockReply>) -> Result<String> {
    match reply {
        Some(MockReply::Json(text)) => Ok(text),
        Some(MockReply::Error(message)) => Err(anyhow!(message)),
        Some(MockReply::RateLimited) => {
            Err(OpenAIError::RateLimited("quota exceeded".to_string()).into())
        }
        Some(MockReply::Delayed(delay, text)) => {
            tokio::time::sleep(delay).await;
            Ok(text)
        }
        None => Err(anyhow!("MockAI has no response for prompt")),
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn generate_structured(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
        _schema: serde_json::Value,
    ) -> Result<String> {
        self.calls.lock().unwrap().push(user_prompt.to_string());

        let reply = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(fragment, _)| user_prompt.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone());

        play(reply).await
    }

    async fn summarize_document(
        &self,
        _instructions: &str,
        filename: &str,
        _pdf: &[u8],
    ) -> Result<String> {
        self.documents.lock().unwrap().push(filename.to_string());
        let reply = self.document_reply.lock().unwrap().clone();
        play(reply).await
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// Mock Geocoder
// =============================================================================

pub struct MockGeocoder {
    known: HashMap<String, Coordinates>,
    failing: Vec<String>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self {
            known: HashMap::new(),
            failing: Vec::new(),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Resolve `address` (exact match after trimming)
    pub fn with_location(mut self, address: &str, latitude: f64, longitude: f64) -> Self {
        self.known.insert(
            address.trim().to_string(),
            Coordinates {
                latitude,
                longitude,
            },
        );
        self
    }

    /// Return a provider error for `address`
    pub fn with_failure(mut self, address: &str) -> Self {
        self.failing.push(address.trim().to_string());
        self
    }

    /// Delay every lookup
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseGeocoder for MockGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        let address = address.trim();
        self.calls.lock().unwrap().push(address.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.iter().any(|a| a == address) {
            return Err(anyhow!("geocoding provider unavailable"));
        }
        Ok(self.known.get(address).copied())
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}

// =============================================================================
// Mock Event Source
// =============================================================================

pub struct MockEventSource {
    events: Vec<RawEvent>,
    error: Option<String>,
    agendas: HashMap<String, Vec<u8>>,
    windows: Arc<Mutex<Vec<DiscoveryWindow>>>,
    agenda_requests: Arc<Mutex<Vec<String>>>,
}

impl MockEventSource {
    pub fn with_events(events: Vec<RawEvent>) -> Self {
        Self {
            events,
            error: None,
            agendas: HashMap::new(),
            windows: Arc::new(Mutex::new(Vec::new())),
            agenda_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn empty() -> Self {
        Self::with_events(Vec::new())
    }

    /// Fail every fetch, like an unreachable directory
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::empty()
        }
    }

    /// Serve `pdf` for `url`; other agenda URLs fail
    pub fn with_agenda(mut self, url: &str, pdf: &[u8]) -> Self {
        self.agendas.insert(url.to_string(), pdf.to_vec());
        self
    }

    /// Windows requested so far
    pub fn windows(&self) -> Vec<DiscoveryWindow> {
        self.windows.lock().unwrap().clone()
    }

    /// Agenda URLs requested so far
    pub fn agenda_requests(&self) -> Vec<String> {
        self.agenda_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseEventSource for MockEventSource {
    async fn fetch_events(&self, window: DiscoveryWindow) -> Result<Vec<RawEvent>> {
        self.windows.lock().unwrap().push(window);
        match &self.error {
            Some(message) => Err(anyhow!("{}", message)),
            None => Ok(self.events.clone()),
        }
    }

    async fn fetch_agenda(&self, agenda_url: &str) -> Result<Vec<u8>> {
        self.agenda_requests
            .lock()
            .unwrap()
            .push(agenda_url.to_string());
        self.agendas
            .get(agenda_url)
            .cloned()
            .ok_or_else(|| anyhow!("Agenda download returned an error: 404 Not Found"))
    }

    fn source_name(&self) -> &'static str {
        "legistar"
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Raw event scheduled at 2025-03-05 10:00 with a calendar link
pub fn sample_raw_event(id: &str, title: &str, description: &str, location: &str) -> RawEvent {
    RawEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        raw_location: location.to_string(),
        scheduled_at: NaiveDate::from_ymd_opt(2025, 3, 5)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap_or_default(),
        link: format!("https://legistar.council.nyc.gov/Calendar.aspx?ID={}", id),
        agenda_url: None,
    }
}

/// Settings with short timeouts so timeout paths run quickly in tests
pub fn fast_settings() -> PipelineSettings {
    PipelineSettings {
        classify_timeout: Duration::from_millis(200),
        geocode_timeout: Duration::from_millis(200),
        enrich_concurrency: 4,
    }
}

/// Bundle mocks into ServerDeps
pub struct TestDependencies {
    pub event_source: Arc<MockEventSource>,
    pub ai: Option<Arc<MockAI>>,
    pub geocoder: Arc<MockGeocoder>,
    pub settings: PipelineSettings,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            event_source: Arc::new(MockEventSource::empty()),
            ai: Some(Arc::new(MockAI::new())),
            geocoder: Arc::new(MockGeocoder::new()),
            settings: fast_settings(),
        }
    }

    pub fn event_source(mut self, source: MockEventSource) -> Self {
        self.event_source = Arc::new(source);
        self
    }

    pub fn ai(mut self, ai: MockAI) -> Self {
        self.ai = Some(Arc::new(ai));
        self
    }

    /// No model configured: fallback-only mode
    pub fn without_ai(mut self) -> Self {
        self.ai = None;
        self
    }

    pub fn geocoder(mut self, geocoder: MockGeocoder) -> Self {
        self.geocoder = Arc::new(geocoder);
        self
    }

    pub fn into_server_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.event_source,
            self.ai.map(|ai| ai as Arc<dyn BaseAI>),
            self.geocoder,
            self.settings,
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
