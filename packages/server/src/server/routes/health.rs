use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::kernel::ClassifierCounts;
use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    services: ServiceHealth,
    classifier: ClassifierCounts,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    /// Model name, or "fallback_only" when no key is configured
    llm: String,
    geocoder: String,
    legistar: String,
}

/// Health check endpoint
///
/// Reports which providers are configured and how many events were scored
/// by the model versus the keyword fallback since startup. No upstream calls.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let deps = &state.server_deps;

    let llm = deps
        .ai
        .as_ref()
        .map(|ai| ai.model_name().to_string())
        .unwrap_or_else(|| "fallback_only".to_string());

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services: ServiceHealth {
            llm,
            geocoder: deps.geocoder.provider().to_string(),
            legistar: deps.event_source.source_name().to_string(),
        },
        classifier: deps.classifier_stats.snapshot(),
    })
}
