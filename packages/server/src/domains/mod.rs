// Business domains
pub mod events;
