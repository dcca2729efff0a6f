use tracing::{debug, warn};

use crate::domains::events::models::GeoResult;
use crate::kernel::ServerDeps;

/// Resolve an event address to coordinates.
///
/// Every failure (blank address, no match, provider error, timeout) yields `None`.
pub async fn geocode(address: &str, deps: &ServerDeps) -> GeoResult {
    let address = address.trim();
    if address.is_empty() {
        return None;
    }

    let limit = deps.settings.geocode_timeout;
    let provider = deps.geocoder.provider();

    match tokio::time::timeout(limit, deps.geocoder.geocode(address)).await {
        Ok(Ok(Some(coordinates))) => Some(coordinates),
        Ok(Ok(None)) => {
            debug!(address = %address, provider, "No geocoding match");
            None
        }
        Ok(Err(e)) => {
            warn!(address = %address, provider, error = %e, "Geocoding failed");
            None
        }
        Err(_) => {
            warn!(
                address = %address,
                provider,
                timeout_ms = limit.as_millis() as u64,
                "Geocoding timed out"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::kernel::test_dependencies::{MockGeocoder, TestDependencies};

    fn deps_with(geocoder: MockGeocoder) -> ServerDeps {
        TestDependencies::new().geocoder(geocoder).into_server_deps()
    }

    #[tokio::test]
    async fn test_resolves_known_address() {
        let deps = deps_with(MockGeocoder::new().with_location("City Hall, New York, NY", 40.7130, -74.0078));

        let coords = geocode("City Hall, New York, NY", &deps).await.unwrap();
        assert!((coords.latitude - 40.7130).abs() < 1e-6);
        assert!((coords.longitude + 74.0078).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unresolvable_address_is_none() {
        let deps = deps_with(MockGeocoder::new());
        assert_eq!(geocode("Xyzzy Nowhere Blvd 99999", &deps).await, None);
    }

    #[tokio::test]
    async fn test_provider_error_is_none() {
        let deps = deps_with(MockGeocoder::new().with_failure("250 Broadway"));
        assert_eq!(geocode("250 Broadway", &deps).await, None);
    }

    #[tokio::test]
    async fn test_timeout_is_none() {
        let deps = deps_with(
            MockGeocoder::new()
                .with_location("250 Broadway", 40.71, -74.0)
                .with_delay(Duration::from_secs(5)),
        );
        assert_eq!(geocode("250 Broadway", &deps).await, None);
    }

    #[tokio::test]
    async fn test_blank_address_skips_provider() {
        let geocoder = std::sync::Arc::new(MockGeocoder::new());
        let mut deps = TestDependencies::new().into_server_deps();
        deps.geocoder = geocoder.clone();

        assert_eq!(geocode("   ", &deps).await, None);
        assert!(geocoder.calls().is_empty());
    }
}
