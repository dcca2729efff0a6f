//! Discovery: fetch meetings from the legislative directory and keep the civic ones.

use anyhow::{Context, Result};
use tracing::info;

use crate::domains::events::models::{DiscoveryWindow, RawEvent};
use crate::kernel::ServerDeps;

/// Default keywords used to keep civic-interest meetings.
pub const CIVIC_KEYWORDS: [&str; 22] = [
    "Zoning",
    "Budget",
    "Housing",
    "Education",
    "Transportation",
    "Public Safety",
    "Health",
    "Environment",
    "Social Services",
    "Community",
    "Development",
    "Land Use",
    "Planning",
    "Hearing",
    "Resolution",
    "Appropriation",
    "Tax",
    "School",
    "Police",
    "Sanitation",
    "Parks",
    "Affordable",
];

/// Keyword filter applied after fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordFilter {
    /// Keep events matching [`CIVIC_KEYWORDS`]
    Civic,
    /// Keep everything
    Disabled,
    /// Keep events matching any of these (lowercased) keywords
    Custom(Vec<String>),
}

impl KeywordFilter {
    /// Interpret the `filter_keywords` query parameter.
    ///
    /// Absent or `true` selects the civic list; `false`, `none` or `all` turns filtering off;
    /// anything else is a comma-separated keyword list. A list with only blank entries
    /// selects the civic list.
    pub fn from_param(param: Option<&str>) -> Self {
        let Some(raw) = param.map(str::trim) else {
            return KeywordFilter::Civic;
        };

        match raw.to_lowercase().as_str() {
            "" | "true" => KeywordFilter::Civic,
            "false" | "none" | "all" => KeywordFilter::Disabled,
            list => {
                let keywords: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect();
                if keywords.is_empty() {
                    KeywordFilter::Civic
                } else {
                    KeywordFilter::Custom(keywords)
                }
            }
        }
    }

    /// Case-insensitive substring match over title, description and location.
    pub fn matches(&self, event: &RawEvent) -> bool {
        let text = event.searchable_text().to_lowercase();
        match self {
            KeywordFilter::Civic => CIVIC_KEYWORDS
                .iter()
                .any(|k| text.contains(&k.to_lowercase())),
            KeywordFilter::Disabled => true,
            KeywordFilter::Custom(keywords) => keywords.iter().any(|k| text.contains(k.as_str())),
        }
    }
}

/// Fetch every meeting in the window and apply the keyword filter.
///
/// Directory failures are returned to the caller; no placeholder events are made up.
pub async fn discover(
    window: DiscoveryWindow,
    filter: &KeywordFilter,
    deps: &ServerDeps,
) -> Result<Vec<RawEvent>> {
    let source = deps.event_source.source_name();

    let fetched = deps
        .event_source
        .fetch_events(window)
        .await
        .with_context(|| format!("Failed to fetch events from {}", source))?;

    let total = fetched.len();
    let kept: Vec<RawEvent> = fetched.into_iter().filter(|e| filter.matches(e)).collect();

    info!(
        source,
        start = %window.start,
        end = %window.end,
        fetched = total,
        kept = kept.len(),
        "Discovered events"
    );

    Ok(kept)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::kernel::test_dependencies::{sample_raw_event, MockEventSource, TestDependencies};

    #[test]
    fn test_filter_param_parsing() {
        assert_eq!(KeywordFilter::from_param(None), KeywordFilter::Civic);
        assert_eq!(KeywordFilter::from_param(Some("TRUE")), KeywordFilter::Civic);
        assert_eq!(KeywordFilter::from_param(Some("false")), KeywordFilter::Disabled);
        assert_eq!(KeywordFilter::from_param(Some("all")), KeywordFilter::Disabled);
        assert_eq!(
            KeywordFilter::from_param(Some("Rezoning, ,Libraries")),
            KeywordFilter::Custom(vec!["rezoning".to_string(), "libraries".to_string()])
        );
        assert_eq!(KeywordFilter::from_param(Some(" , ")), KeywordFilter::Civic);
    }

    #[test]
    fn test_civic_filter_searches_all_text_fields() {
        let by_title = sample_raw_event("1", "Committee on Finance Budget Hearing", "", "");
        let by_location = sample_raw_event("2", "Stated Meeting", "", "Parks Department HQ");
        let unrelated = sample_raw_event("3", "Stated Meeting", "Roll call", "Council Chambers");

        assert!(KeywordFilter::Civic.matches(&by_title));
        assert!(KeywordFilter::Civic.matches(&by_location));
        assert!(!KeywordFilter::Civic.matches(&unrelated));
        assert!(KeywordFilter::Disabled.matches(&unrelated));
    }

    #[tokio::test]
    async fn test_discover_filters_and_keeps_order() {
        let source = MockEventSource::with_events(vec![
            sample_raw_event("1", "Committee on Housing", "", ""),
            sample_raw_event("2", "Stated Meeting", "", ""),
            sample_raw_event("3", "Committee on Education", "", ""),
        ]);
        let deps = TestDependencies::new().event_source(source).into_server_deps();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let events = discover(
            DiscoveryWindow::around(today, 0, 30),
            &KeywordFilter::Civic,
            &deps,
        )
        .await
        .unwrap();

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_discover_propagates_source_failure() {
        let deps = TestDependencies::new()
            .event_source(MockEventSource::failing("Legistar returned an error: 500"))
            .into_server_deps();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        let err = discover(
            DiscoveryWindow::around(today, 0, 30),
            &KeywordFilter::Disabled,
            &deps,
        )
        .await
        .unwrap_err();

        assert!(format!("{:#}", err).contains("500"));
    }
}
