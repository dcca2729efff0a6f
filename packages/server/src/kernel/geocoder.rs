//! Geocoding providers: Google Geocoding API and OpenStreetMap Nominatim.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::BaseGeocoder;
use crate::domains::events::models::Coordinates;

const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim's usage policy requires an identifying User-Agent.
const USER_AGENT: &str = "NYCCivicScout/1.0 (civic event map)";

/// Append the city when the address does not already name it.
pub fn qualify_address(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.to_lowercase().contains("new york") {
        trimmed.to_string()
    } else {
        format!("{}, New York, NY", trimmed)
    }
}

// =============================================================================
// Google Geocoding API
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct GoogleGeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GoogleGeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GoogleGeocodeResult {
    pub geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
pub struct GoogleGeometry {
    pub location: GoogleLatLng,
}

#[derive(Debug, Deserialize)]
pub struct GoogleLatLng {
    pub lat: f64,
    pub lng: f64,
}

impl GoogleGeocodeResponse {
    /// `ZERO_RESULTS` is a miss; any status other than `OK` is an error.
    pub fn into_coordinates(self) -> Result<Option<Coordinates>> {
        match self.status.as_str() {
            "OK" => Ok(self.results.into_iter().next().map(|r| Coordinates {
                latitude: r.geometry.location.lat,
                longitude: r.geometry.location.lng,
            })),
            "ZERO_RESULTS" => Ok(None),
            other => Err(anyhow!(
                "Google geocoding returned {}: {}",
                other,
                self.error_message.unwrap_or_default()
            )),
        }
    }
}

/// Google Maps Geocoding API client.
pub struct GoogleGeocoder {
    http_client: reqwest::Client,
    api_key: String,
    endpoint: String,
    timeout: Duration,
}

impl GoogleGeocoder {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            endpoint: GOOGLE_GEOCODE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Geocoding request with the key as a query parameter. Errors from it must
    /// be reported with `without_url()`.
    fn request(&self, query: &str) -> reqwest::RequestBuilder {
        self.http_client
            .get(&self.endpoint)
            .query(&[("address", query), ("key", self.api_key.as_str())])
            .timeout(self.timeout)
    }
}

#[async_trait]
impl BaseGeocoder for GoogleGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        let query = qualify_address(address);

        debug!(query = %query, "Geocoding via Google");

        let response: GoogleGeocodeResponse = self
            .request(&query)
            .send()
            .await
            .map_err(|e| anyhow!("Google geocoding request failed: {}", e.without_url()))?
            .error_for_status()
            .map_err(|e| anyhow!("Google geocoding returned an error: {}", e.without_url()))?
            .json()
            .await
            .map_err(|e| {
                anyhow!("Failed to parse Google geocoding response: {}", e.without_url())
            })?;

        response.into_coordinates()
    }

    fn provider(&self) -> &'static str {
        "google"
    }
}

// =============================================================================
// Nominatim (OpenStreetMap)
// =============================================================================

/// Nominatim API response entry
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

impl NominatimPlace {
    pub fn coordinates(&self) -> Result<Coordinates> {
        let latitude: f64 = self
            .lat
            .parse()
            .map_err(|e| anyhow!("Invalid latitude in response: {}", e))?;
        let longitude: f64 = self
            .lon
            .parse()
            .map_err(|e| anyhow!("Invalid longitude in response: {}", e))?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            bail!("Coordinates out of range: ({}, {})", latitude, longitude);
        }

        Ok(Coordinates {
            latitude,
            longitude,
        })
    }
}

/// Keyless geocoder backed by OpenStreetMap Nominatim.
pub struct NominatimGeocoder {
    http_client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl NominatimGeocoder {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: NOMINATIM_SEARCH_URL.to_string(),
            timeout,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl BaseGeocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        let query = qualify_address(address);

        debug!(query = %query, "Geocoding via Nominatim");

        let places: Vec<NominatimPlace> = self
            .http_client
            .get(&self.endpoint)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .context("Nominatim request failed")?
            .error_for_status()
            .context("Nominatim returned an error status")?
            .json()
            .await
            .context("Failed to parse Nominatim response")?;

        let Some(place) = places.first() else {
            warn!(query = %query, "Location not found by Nominatim");
            return Ok(None);
        };

        let coordinates = place.coordinates()?;
        debug!(
            query = %query,
            display_name = %place.display_name,
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "Geocoded"
        );

        Ok(Some(coordinates))
    }

    fn provider(&self) -> &'static str {
        "nominatim"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_address() {
        assert_eq!(
            qualify_address("250 Broadway, 14th Floor"),
            "250 Broadway, 14th Floor, New York, NY"
        );
        assert_eq!(
            qualify_address(" City Hall, New York, NY "),
            "City Hall, New York, NY"
        );
    }

    #[test]
    fn test_google_ok_response() {
        let body = r#"{
            "status": "OK",
            "results": [{"geometry": {"location": {"lat": 40.7127753, "lng": -74.0059728}}}]
        }"#;
        let response: GoogleGeocodeResponse = serde_json::from_str(body).unwrap();
        let coords = response.into_coordinates().unwrap().unwrap();

        assert!((coords.latitude - 40.7128).abs() < 0.001);
        assert!((coords.longitude + 74.0060).abs() < 0.001);
    }

    #[test]
    fn test_google_zero_results_is_a_miss() {
        let response: GoogleGeocodeResponse =
            serde_json::from_str(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();
        assert_eq!(response.into_coordinates().unwrap(), None);
    }

    #[test]
    fn test_google_denied_is_an_error() {
        let response: GoogleGeocodeResponse = serde_json::from_str(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        )
        .unwrap();
        let err = response.into_coordinates().unwrap_err();
        assert!(err.to_string().contains("REQUEST_DENIED"));
    }

    #[test]
    fn test_google_key_is_a_query_parameter() {
        let geocoder = GoogleGeocoder::new("k3y&v=1".to_string(), Duration::from_secs(1));
        let request = geocoder.request("250 Broadway, New York, NY").build().unwrap();

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("address".to_string(), "250 Broadway, New York, NY".to_string()),
                ("key".to_string(), "k3y&v=1".to_string()),
            ]
        );
        assert!(request.url().as_str().starts_with(GOOGLE_GEOCODE_URL));
    }

    #[tokio::test]
    async fn test_google_errors_omit_api_key() {
        // nothing listens on the discard port
        let geocoder = GoogleGeocoder::new("secret-maps-key".to_string(), Duration::from_secs(2))
            .with_endpoint("http://127.0.0.1:9/geocode/json");

        let err = geocoder.geocode("City Hall").await.unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("Google geocoding request failed"));
        assert!(!message.contains("secret-maps-key"));
    }

    #[test]
    fn test_nominatim_place_parsing() {
        let places: Vec<NominatimPlace> = serde_json::from_str(
            r#"[{"lat": "40.7130", "lon": "-74.0078", "display_name": "City Hall, Manhattan"}]"#,
        )
        .unwrap();
        let coords = places[0].coordinates().unwrap();

        assert_eq!(coords.latitude, 40.7130);
        assert_eq!(coords.longitude, -74.0078);
    }

    #[test]
    fn test_nominatim_rejects_garbage_coordinates() {
        let place = NominatimPlace {
            lat: "north".to_string(),
            lon: "-74.0".to_string(),
            display_name: String::new(),
        };
        assert!(place.coordinates().is_err());

        let place = NominatimPlace {
            lat: "140.0".to_string(),
            lon: "-74.0".to_string(),
            display_name: String::new(),
        };
        assert!(place.coordinates().is_err());
    }

    #[tokio::test]
    #[ignore = "requires network access to nominatim.openstreetmap.org"]
    async fn test_nominatim_city_hall() {
        let geocoder = NominatimGeocoder::new(Duration::from_secs(10));
        let coords = geocoder
            .geocode("City Hall, New York, NY")
            .await
            .unwrap()
            .expect("City Hall should resolve");

        assert!((coords.latitude - 40.7130).abs() < 0.01);
        assert!((coords.longitude + 74.0078).abs() < 0.01);
    }
}
