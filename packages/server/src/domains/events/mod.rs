//! Civic events domain: legislative meetings scored for community impact.

pub mod activities;
pub mod data;
pub mod models;

pub use models::{CivicEvent, RawEvent, Topic};
