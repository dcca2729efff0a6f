//! Client for the Legistar Web API (NYC Council legislative calendar).

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::BaseEventSource;
use crate::domains::events::models::{DiscoveryWindow, RawEvent};

pub const DEFAULT_BASE_URL: &str = "https://webapi.legistar.com/v1";
pub const DEFAULT_CLIENT: &str = "nyc";

/// Page size requested from the directory.
const MAX_EVENTS: u32 = 100;

const CALENDAR_URL: &str = "https://legistar.council.nyc.gov/Calendar.aspx";
const DEFAULT_TITLE: &str = "City Council Meeting";

/// Agendas above this size are not sent to the model.
pub const MAX_AGENDA_BYTES: usize = 20 * 1024 * 1024;

/// One record of the `/Events` collection. Only the fields we use are declared.
#[derive(Debug, Clone, Deserialize)]
pub struct LegistarEvent {
    #[serde(rename = "EventId")]
    pub event_id: i64,
    #[serde(rename = "EventBodyName")]
    pub body_name: Option<String>,
    #[serde(rename = "EventDate")]
    pub date: Option<String>,
    #[serde(rename = "EventTime")]
    pub time: Option<String>,
    #[serde(rename = "EventLocation")]
    pub location: Option<String>,
    #[serde(rename = "EventComment")]
    pub comment: Option<String>,
    #[serde(rename = "EventInSiteURL")]
    pub insite_url: Option<String>,
    #[serde(rename = "EventAgendaFile", default)]
    pub agenda_file: Option<String>,
}

impl TryFrom<LegistarEvent> for RawEvent {
    type Error = anyhow::Error;

    fn try_from(event: LegistarEvent) -> Result<Self> {
        let date = event
            .date
            .as_deref()
            .ok_or_else(|| anyhow!("event {} has no EventDate", event.event_id))?;
        let scheduled_at = scheduled_at(date, event.time.as_deref())
            .with_context(|| format!("event {} has unparseable EventDate", event.event_id))?;

        let link = non_blank(event.insite_url)
            .unwrap_or_else(|| format!("{}?ID={}", CALENDAR_URL, event.event_id));

        Ok(RawEvent {
            id: event.event_id.to_string(),
            title: non_blank(event.body_name).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: non_blank(event.comment).unwrap_or_default(),
            raw_location: non_blank(event.location).unwrap_or_default(),
            scheduled_at,
            link,
            agenda_url: non_blank(event.agenda_file),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Combine `EventDate` ("2025-03-05T00:00:00") with `EventTime` ("10:00 AM").
///
/// An unparseable time keeps the time carried by the date.
fn scheduled_at(date: &str, time: Option<&str>) -> Result<NaiveDateTime> {
    let date = date.trim().trim_end_matches('Z');
    let base = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|e| anyhow!("invalid date {:?}: {}", date, e))?;

    let time = time
        .map(str::trim)
        .and_then(|t| NaiveTime::parse_from_str(&t.to_uppercase(), "%I:%M %p").ok());

    Ok(match time {
        Some(time) => base.date().and_time(time),
        None => base,
    })
}

/// OData filter selecting events inside the window.
pub fn odata_filter(window: DiscoveryWindow) -> String {
    format!(
        "EventDate ge datetime'{}T00:00:00' and EventDate le datetime'{}T23:59:59'",
        window.start.format("%Y-%m-%d"),
        window.end.format("%Y-%m-%d")
    )
}

/// Convert a fetched page, skipping records that cannot be scheduled.
pub fn into_raw_events(events: Vec<LegistarEvent>) -> Vec<RawEvent> {
    events
        .into_iter()
        .filter_map(|event| match RawEvent::try_from(event) {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!(error = %e, "Skipping malformed Legistar event");
                None
            }
        })
        .collect()
}

/// Legistar Web API client for one jurisdiction.
pub struct LegistarClient {
    http_client: reqwest::Client,
    base_url: String,
    client_name: String,
    token: Option<String>,
    timeout: Duration,
}

impl LegistarClient {
    pub fn new(
        base_url: impl Into<String>,
        client_name: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_name: client_name.into(),
            token,
            timeout,
        }
    }

    fn events_url(&self) -> String {
        format!("{}/{}/Events", self.base_url, self.client_name)
    }
}

#[async_trait]
impl BaseEventSource for LegistarClient {
    #[instrument(skip(self), fields(client = %self.client_name))]
    async fn fetch_events(&self, window: DiscoveryWindow) -> Result<Vec<RawEvent>> {
        let mut params = vec![
            ("$filter", odata_filter(window)),
            ("$orderby", "EventDate asc".to_string()),
            ("$top", MAX_EVENTS.to_string()),
        ];
        if let Some(token) = &self.token {
            params.push(("token", token.clone()));
        }

        info!(start = %window.start, end = %window.end, "Fetching Legistar events");

        let events: Vec<LegistarEvent> = self
            .http_client
            .get(self.events_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| anyhow!("Legistar request failed: {}", e.without_url()))?
            .error_for_status()
            .map_err(|e| anyhow!("Legistar returned an error: {}", e.without_url()))?
            .json()
            .await
            .context("Legistar returned a malformed events payload")?;

        let fetched = events.len();
        let raw_events = into_raw_events(events);
        info!(fetched, usable = raw_events.len(), "Retrieved Legistar events");

        Ok(raw_events)
    }

    #[instrument(skip(self))]
    async fn fetch_agenda(&self, agenda_url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http_client
            .get(agenda_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| anyhow!("Agenda request failed: {}", e.without_url()))?
            .error_for_status()
            .map_err(|e| anyhow!("Agenda download returned an error: {}", e.without_url()))?
            .bytes()
            .await
            .map_err(|e| anyhow!("Agenda download interrupted: {}", e.without_url()))?;

        if bytes.len() > MAX_AGENDA_BYTES {
            bail!(
                "Agenda is {} bytes, above the {} byte limit",
                bytes.len(),
                MAX_AGENDA_BYTES
            );
        }

        debug!(bytes = bytes.len(), "Downloaded agenda");
        Ok(bytes.to_vec())
    }

    fn source_name(&self) -> &'static str {
        "legistar"
    }
}
