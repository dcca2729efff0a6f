//! Error types for the OpenAI-compatible client.

use std::time::Duration;

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// Client errors, split by what a caller may want to branch on.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Connection failed before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded the client timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// HTTP 429: quota exhausted or rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// Whether the provider refused the call for quota reasons.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(OpenAIError::RateLimited("quota".into()).is_rate_limited());
        assert!(!OpenAIError::Timeout(Duration::from_secs(3)).is_rate_limited());
        assert!(!OpenAIError::Parse("bad".into()).is_rate_limited());
    }

    #[test]
    fn test_api_error_display_includes_status() {
        let err = OpenAIError::Api {
            status: 503,
            message: "overloaded".into(),
        };
        assert_eq!(err.to_string(), "API error (503): overloaded");
    }
}
