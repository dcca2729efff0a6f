use chrono::NaiveDateTime;

/// An unprocessed meeting record, as published by the legislative directory.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub id: String,
    /// Display title (the committee or body holding the meeting)
    pub title: String,
    /// Free-text comment attached to the meeting, often empty
    pub description: String,
    pub raw_location: String,
    /// Local wall-clock time in New York
    pub scheduled_at: NaiveDateTime,
    /// Official event page
    pub link: String,
    /// Agenda document (PDF), when the directory has published one
    pub agenda_url: Option<String>,
}

impl RawEvent {
    /// Text searched by keyword filters: title, description and location.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.raw_location)
    }
}

/// Window of calendar days to discover events in (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryWindow {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DiscoveryWindow {
    pub fn around(today: chrono::NaiveDate, days_back: u32, days_ahead: u32) -> Self {
        Self {
            start: today - chrono::Days::new(days_back as u64),
            end: today + chrono::Days::new(days_ahead as u64),
        }
    }
}
