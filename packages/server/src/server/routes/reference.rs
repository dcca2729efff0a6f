//! Static reference data for the front end's filter controls.

use axum::Json;
use serde_json::{json, Value};

use crate::domains::events::activities::CIVIC_KEYWORDS;
use crate::domains::events::models::Topic;

/// `GET /api/topics`
pub async fn topics_handler() -> Json<Value> {
    let topics: Vec<&str> = Topic::ALL.iter().map(|t| t.label()).collect();
    Json(json!({ "topics": topics }))
}

/// `GET /api/keywords`
pub async fn keywords_handler() -> Json<Value> {
    Json(json!({ "keywords": CIVIC_KEYWORDS }))
}
