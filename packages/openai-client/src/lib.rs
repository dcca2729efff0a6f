//! Pure OpenAI-compatible REST client.
//!
//! Strict JSON-schema structured output and plain chat completions (text or
//! text plus an attached PDF), with no domain-specific logic. Works against
//! any endpoint that speaks the `/chat/completions` protocol via
//! [`OpenAIClient::with_base_url`].

pub mod error;
pub mod schema;
pub mod types;

pub use error::{OpenAIError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use std::time::{Duration, Instant};

use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenAI-compatible API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the client at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Upper bound for a single request, connect through body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Chat completion returning the first choice's text.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<String> {
        let start = Instant::now();
        let raw: ChatResponseRaw = self.post_chat(&request).await?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion"
        );

        first_content(raw)
    }

    /// Structured output with an explicit JSON schema; returns the raw JSON text.
    pub async fn structured_output(&self, request: StructuredRequest) -> Result<String> {
        let start = Instant::now();
        let raw: ChatResponseRaw = self.post_chat(&request).await?;

        debug!(
            model = %request.model,
            schema = %request.response_format.json_schema.name,
            duration_ms = start.elapsed().as_millis(),
            "Structured output completion"
        );

        first_content(raw)
    }

    async fn post_chat<B: Serialize>(&self, body: &B) -> Result<ChatResponseRaw> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))
    }

    fn transport_error(&self, error: reqwest::Error) -> OpenAIError {
        if error.is_timeout() {
            warn!(timeout_ms = self.timeout.as_millis(), "Chat completion timed out");
            OpenAIError::Timeout(self.timeout)
        } else {
            warn!(error = %error, "Chat completion request failed");
            OpenAIError::Network(error.to_string())
        }
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    warn!(status = %status, error = %message, "Chat completion API error");

    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => OpenAIError::RateLimited(message),
        _ => OpenAIError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

fn first_content(raw: ChatResponseRaw) -> Result<String> {
    raw.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| OpenAIError::Parse("Response contained no message content".into()))
}
