use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use openai_client::OpenAIClient;

use crate::kernel::{
    legistar_client, BaseAI, BaseGeocoder, GoogleGeocoder, LegistarClient, NominatimGeocoder,
    OpenAIModel, PipelineSettings, ServerDeps, DEFAULT_MODEL,
};

/// Application configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_model: String,
    pub legistar_base_url: String,
    pub legistar_client: String,
    pub legistar_api_token: Option<String>,
    pub google_maps_api_key: Option<String>,
    pub classify_timeout: Duration,
    pub geocode_timeout: Duration,
    pub discovery_timeout: Duration,
    pub enrich_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: parse_var("PORT", 8001)?,
            openai_api_key: optional_var("OPENAI_API_KEY"),
            llm_base_url: optional_var("LLM_BASE_URL"),
            llm_model: optional_var("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            legistar_base_url: optional_var("LEGISTAR_BASE_URL")
                .unwrap_or_else(|| legistar_client::DEFAULT_BASE_URL.to_string()),
            legistar_client: optional_var("LEGISTAR_CLIENT")
                .unwrap_or_else(|| legistar_client::DEFAULT_CLIENT.to_string()),
            legistar_api_token: optional_var("LEGISTAR_API_TOKEN"),
            google_maps_api_key: optional_var("GOOGLE_MAPS_API_KEY"),
            classify_timeout: Duration::from_secs(parse_var("CLASSIFY_TIMEOUT_SECS", 15)?),
            geocode_timeout: Duration::from_secs(parse_var("GEOCODE_TIMEOUT_SECS", 10)?),
            discovery_timeout: Duration::from_secs(parse_var("DISCOVERY_TIMEOUT_SECS", 30)?),
            enrich_concurrency: parse_var("ENRICH_CONCURRENCY", 8)?,
        })
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            classify_timeout: self.classify_timeout,
            geocode_timeout: self.geocode_timeout,
            enrich_concurrency: self.enrich_concurrency.max(1),
        }
    }

    /// Wire production implementations into ServerDeps.
    ///
    /// Without `OPENAI_API_KEY` the classifier runs in fallback-only mode;
    /// without `GOOGLE_MAPS_API_KEY` geocoding uses Nominatim.
    pub fn build_server_deps(&self) -> ServerDeps {
        let event_source = Arc::new(LegistarClient::new(
            &self.legistar_base_url,
            &self.legistar_client,
            self.legistar_api_token.clone(),
            self.discovery_timeout,
        ));

        let ai: Option<Arc<dyn BaseAI>> = self.openai_api_key.as_ref().map(|key| {
            let mut client = OpenAIClient::new(key.clone()).with_timeout(self.classify_timeout);
            if let Some(base_url) = &self.llm_base_url {
                client = client.with_base_url(base_url.clone());
            }
            Arc::new(OpenAIModel::new(client, &self.llm_model)) as Arc<dyn BaseAI>
        });

        let geocoder: Arc<dyn BaseGeocoder> = match &self.google_maps_api_key {
            Some(key) => Arc::new(GoogleGeocoder::new(key.clone(), self.geocode_timeout)),
            None => Arc::new(NominatimGeocoder::new(self.geocode_timeout)),
        };

        ServerDeps::new(event_source, ai, geocoder, self.pipeline_settings())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("legistar_base_url", &self.legistar_base_url)
            .field("legistar_client", &self.legistar_client)
            .field("legistar_api_token", &redact(&self.legistar_api_token))
            .field("google_maps_api_key", &redact(&self.google_maps_api_key))
            .field("classify_timeout", &self.classify_timeout)
            .field("geocode_timeout", &self.geocode_timeout)
            .field("discovery_timeout", &self.discovery_timeout)
            .field("enrich_concurrency", &self.enrich_concurrency)
            .finish()
    }
}

fn redact(secret: &Option<String>) -> Option<&'static str> {
    secret.as_ref().map(|_| "[redacted]")
}

/// Unset or blank variables read as `None`.
fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(name) {
        Some(value) => value
            .parse()
            .with_context(|| format!("{} must be a valid number, got {:?}", name, value)),
        None => Ok(default),
    }
}
