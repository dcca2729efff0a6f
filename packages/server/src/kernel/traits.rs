// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (what to prompt for, how to fall back) lives in the events domain.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseGeocoder)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::events::models::{Coordinates, DiscoveryWindow, RawEvent};

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Generate structured output constrained by a JSON schema.
    /// Returns the raw JSON string; parse and validate in calling code.
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        schema: serde_json::Value,
    ) -> Result<String>;

    /// Plain-text answer to `instructions` about an attached PDF document.
    async fn summarize_document(
        &self,
        instructions: &str,
        filename: &str,
        pdf: &[u8],
    ) -> Result<String>;

    /// Short provider/model label for logs and health output
    fn model_name(&self) -> &str;
}

// =============================================================================
// Geocoder Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseGeocoder: Send + Sync {
    /// Resolve an address. `Ok(None)` means the provider found no match.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;

    /// Provider label for logs and health output
    fn provider(&self) -> &'static str;
}

// =============================================================================
// Event Source Trait (Infrastructure - legislative directory)
// =============================================================================

#[async_trait]
pub trait BaseEventSource: Send + Sync {
    /// Fetch every meeting scheduled inside the window, in directory order.
    async fn fetch_events(&self, window: DiscoveryWindow) -> Result<Vec<RawEvent>>;

    /// Download a meeting's agenda document (PDF bytes).
    async fn fetch_agenda(&self, agenda_url: &str) -> Result<Vec<u8>>;

    /// Source identifier reported to API consumers
    fn source_name(&self) -> &'static str;
}
