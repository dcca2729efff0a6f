//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod geocoder;
pub mod legistar_client;
pub mod test_dependencies;
pub mod traits;

pub use ai::{OpenAIModel, DEFAULT_MODEL};
pub use deps::{ClassifierCounts, ClassifierStats, PipelineSettings, ServerDeps};
pub use geocoder::{GoogleGeocoder, NominatimGeocoder};
pub use legistar_client::LegistarClient;
pub use test_dependencies::TestDependencies;
pub use traits::*;
