use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domains::events::activities::KeywordFilter;
use crate::domains::events::models::CivicEvent;

pub const DEFAULT_DAYS_AHEAD: u32 = 30;
pub const MAX_DAYS_AHEAD: u32 = 90;
pub const MAX_DAYS_BACK: u32 = 30;

/// Raw `/api/events` query string. Numbers are kept as text so bad input
/// can be reported with a JSON error instead of a plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    pub days_ahead: Option<String>,
    pub days_back: Option<String>,
    pub filter_keywords: Option<String>,
    pub include_pdf: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct InvalidQuery(pub String);

/// Validated events request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsRequest {
    pub days_ahead: u32,
    pub days_back: u32,
    pub filter: KeywordFilter,
    /// Summarize each event's agenda PDF into the classifier prompt
    pub include_agenda: bool,
}

impl TryFrom<EventsQuery> for EventsRequest {
    type Error = InvalidQuery;

    fn try_from(query: EventsQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            days_ahead: parse_days("days_ahead", query.days_ahead, DEFAULT_DAYS_AHEAD, 1, MAX_DAYS_AHEAD)?,
            days_back: parse_days("days_back", query.days_back, 0, 0, MAX_DAYS_BACK)?,
            filter: KeywordFilter::from_param(query.filter_keywords.as_deref()),
            include_agenda: parse_flag("include_pdf", query.include_pdf.as_deref())?,
        })
    }
}

fn parse_flag(name: &str, value: Option<&str>) -> Result<bool, InvalidQuery> {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(other) => Err(InvalidQuery(format!(
            "{} must be true or false, got {:?}",
            name, other
        ))),
    }
}

fn parse_days(
    name: &str,
    value: Option<String>,
    default: u32,
    min: u32,
    max: u32,
) -> Result<u32, InvalidQuery> {
    let Some(value) = value else {
        return Ok(default);
    };

    let days: u32 = value
        .trim()
        .parse()
        .map_err(|_| InvalidQuery(format!("{} must be an integer, got {:?}", name, value)))?;

    if !(min..=max).contains(&days) {
        return Err(InvalidQuery(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, days
        )));
    }

    Ok(days)
}

/// Body of `GET /api/events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<CivicEvent>,
    pub count: usize,
    pub source: String,
    /// RFC 3339 timestamp
    pub generated_at: String,
}

impl EventsResponse {
    pub fn new(events: Vec<CivicEvent>, source: &str, generated_at: DateTime<Utc>) -> Self {
        Self {
            count: events.len(),
            events,
            source: source.to_string(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(days_ahead: Option<&str>, days_back: Option<&str>) -> EventsQuery {
        EventsQuery {
            days_ahead: days_ahead.map(str::to_string),
            days_back: days_back.map(str::to_string),
            filter_keywords: None,
            include_pdf: None,
        }
    }

    #[test]
    fn test_defaults() {
        let request = EventsRequest::try_from(EventsQuery::default()).unwrap();
        assert_eq!(request.days_ahead, 30);
        assert_eq!(request.days_back, 0);
        assert_eq!(request.filter, KeywordFilter::Civic);
        assert!(!request.include_agenda);
    }

    #[test]
    fn test_include_pdf_flag() {
        let flag = |value: &str| {
            EventsRequest::try_from(EventsQuery {
                include_pdf: Some(value.to_string()),
                ..EventsQuery::default()
            })
            .map(|request| request.include_agenda)
        };

        assert_eq!(flag("true"), Ok(true));
        assert_eq!(flag("TRUE"), Ok(true));
        assert_eq!(flag("1"), Ok(true));
        assert_eq!(flag("false"), Ok(false));
        assert_eq!(flag("0"), Ok(false));
        assert!(flag("yes").unwrap_err().0.contains("include_pdf"));
    }

    #[test]
    fn test_range_limits() {
        assert!(EventsRequest::try_from(query(Some("1"), Some("30"))).is_ok());
        assert!(EventsRequest::try_from(query(Some("90"), None)).is_ok());

        assert!(EventsRequest::try_from(query(Some("0"), None)).is_err());
        assert!(EventsRequest::try_from(query(Some("91"), None)).is_err());
        assert!(EventsRequest::try_from(query(None, Some("31"))).is_err());
    }

    #[test]
    fn test_non_integer_is_rejected() {
        let err = EventsRequest::try_from(query(Some("soon"), None)).unwrap_err();
        assert!(err.0.contains("days_ahead"));

        assert!(EventsRequest::try_from(query(Some("-5"), None)).is_err());
    }

    #[test]
    fn test_response_count_matches_events() {
        let generated_at = DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let response = EventsResponse::new(Vec::new(), "legistar", generated_at);

        assert_eq!(response.count, 0);
        assert_eq!(response.generated_at, "2025-03-01T12:00:00Z");
    }
}
