pub mod events;

pub use events::{EventsQuery, EventsRequest, EventsResponse, InvalidQuery};
