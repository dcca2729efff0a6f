//! Test fixtures for raw directory records.

use scout_core::domains::events::models::RawEvent;
use scout_core::kernel::test_dependencies::sample_raw_event;

/// Housing hearing at City Hall, Manhattan
pub fn housing_hearing() -> RawEvent {
    sample_raw_event(
        "10001",
        "Committee on Housing and Buildings",
        "Public hearing on proposed zoning changes",
        "City Hall, New York, NY",
    )
}

/// Public safety oversight mentioning vulnerable residents
pub fn public_safety_oversight() -> RawEvent {
    sample_raw_event(
        "10002",
        "Committee on Public Safety",
        "Oversight of services for vulnerable residents",
        "250 Broadway, Committee Room, 14th Floor",
    )
}

/// Education meeting with an address no geocoder can resolve
pub fn education_meeting_unmappable() -> RawEvent {
    sample_raw_event(
        "10003",
        "Committee on Education",
        "School budget review",
        "Xyzzy Nowhere Blvd 99999",
    )
}

/// Ceremonial meeting that the civic keyword filter drops
pub fn stated_meeting() -> RawEvent {
    sample_raw_event("10004", "Stated Meeting", "Roll call", "Council Chambers")
}

pub const HOUSING_AGENDA_URL: &str =
    "https://legistar.council.nyc.gov/View.ashx?M=A&ID=10001&GUID=HOUSING";

/// Housing hearing with a published agenda PDF
pub fn housing_hearing_with_agenda() -> RawEvent {
    RawEvent {
        agenda_url: Some(HOUSING_AGENDA_URL.to_string()),
        ..housing_hearing()
    }
}
