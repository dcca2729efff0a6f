//! Test harness driving the axum router in-process against mock dependencies.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use scout_core::kernel::test_dependencies::{MockAI, MockEventSource, MockGeocoder};
use scout_core::kernel::{ServerDeps, TestDependencies};
use scout_core::server::build_app;
use serde_json::Value;
use tower::util::ServiceExt;

/// Router plus handles to the mocks behind it.
pub struct TestHarness {
    pub app: Router,
    pub event_source: Arc<MockEventSource>,
    pub ai: Option<Arc<MockAI>>,
    pub geocoder: Arc<MockGeocoder>,
}

impl TestHarness {
    pub fn new(deps: TestDependencies) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let event_source = deps.event_source.clone();
        let ai = deps.ai.clone();
        let geocoder = deps.geocoder.clone();
        let server_deps: ServerDeps = deps.into_server_deps();

        Self {
            app: build_app(server_deps),
            event_source,
            ai,
            geocoder,
        }
    }

    /// Send a GET request and parse the JSON body.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Should read body");
        let body = serde_json::from_slice(&bytes).expect("Should parse JSON");

        (status, body)
    }
}
