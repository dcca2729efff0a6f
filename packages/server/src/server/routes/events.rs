use axum::{
    extract::{Extension, Query},
    Json,
};
use chrono::{Local, Utc};
use tracing::info;

use crate::domains::events::activities::{discover, enrich_events};
use crate::domains::events::data::{EventsQuery, EventsRequest, EventsResponse};
use crate::domains::events::models::DiscoveryWindow;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// `GET /api/events` - discover, enrich and return civic events.
///
/// Query parameters are validated before any upstream call. A directory
/// failure returns 502 with no events. `include_pdf=true` adds agenda
/// summaries to the classifier prompt.
pub async fn events_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventsResponse>, ApiError> {
    let request = EventsRequest::try_from(query)?;
    let deps = state.server_deps.as_ref();

    let window = DiscoveryWindow::around(
        Local::now().date_naive(),
        request.days_back,
        request.days_ahead,
    );

    let raw_events = discover(window, &request.filter, deps)
        .await
        .map_err(ApiError::Upstream)?;
    let events = enrich_events(raw_events, request.include_agenda, deps).await;

    info!(count = events.len(), "Serving events");

    Ok(Json(EventsResponse::new(
        events,
        deps.event_source.source_name(),
        Utc::now(),
    )))
}
