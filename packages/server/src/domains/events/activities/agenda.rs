//! Agenda context: a short model summary of a meeting's published agenda PDF.

use anyhow::{anyhow, Result};
use tracing::{debug, warn};

use crate::domains::events::models::RawEvent;
use crate::kernel::{BaseAI, ServerDeps};

pub const AGENDA_INSTRUCTIONS: &str = "Extract the key agenda items from this NYC government \
meeting agenda that could affect residents: budget items, zoning changes, new policies, service \
changes or community programs. Answer in 2-3 plain sentences.";

async fn summarize_agenda(
    raw: &RawEvent,
    url: &str,
    ai: &dyn BaseAI,
    deps: &ServerDeps,
) -> Result<String> {
    let pdf = deps.event_source.fetch_agenda(url).await?;
    if pdf.is_empty() {
        return Err(anyhow!("agenda document is empty"));
    }

    let filename = format!("agenda-{}.pdf", raw.id);
    let summary = ai
        .summarize_document(AGENDA_INSTRUCTIONS, &filename, &pdf)
        .await?;
    Ok(summary.trim().to_string())
}

/// Summarize the event's agenda for the classifier prompt.
///
/// `None` when the event has no agenda, no model is configured, or the
/// download or summary fails or exceeds `classify_timeout`.
pub async fn agenda_context(raw: &RawEvent, deps: &ServerDeps) -> Option<String> {
    let url = raw.agenda_url.as_deref()?;
    let ai = deps.ai.as_deref()?;
    let limit = deps.settings.classify_timeout;

    match tokio::time::timeout(limit, summarize_agenda(raw, url, ai, deps)).await {
        Ok(Ok(summary)) if !summary.is_empty() => {
            debug!(event_id = %raw.id, chars = summary.len(), "Summarized agenda");
            Some(summary)
        }
        Ok(Ok(_)) => None,
        Ok(Err(e)) => {
            warn!(event_id = %raw.id, error = %e, "Agenda summary failed, classifying without it");
            None
        }
        Err(_) => {
            warn!(
                event_id = %raw.id,
                timeout_ms = limit.as_millis() as u64,
                "Agenda summary timed out, classifying without it"
            );
            None
        }
    }
}
