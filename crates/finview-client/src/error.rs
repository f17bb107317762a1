//! Error types for analysis API operations

use thiserror::Error;

/// Shown when a request ran out of time ("request timed out, please retry later")
pub const TIMEOUT_MESSAGE: &str = "请求超时，请稍后重试。";

/// Shown for any other failure ("request failed, please retry later")
pub const GENERIC_FAILURE_MESSAGE: &str = "请求失败，请稍后重试。";

/// Analysis client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Endpoint URL could not be built
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Backend answered with a non-success status
    #[error("API error (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    ApiError {
        status: u16,
        message: Option<String>,
    },

    /// Backend rejected the bearer token
    #[error("Unauthorized: {}", .message.as_deref().unwrap_or("missing or expired token"))]
    Unauthorized {
        message: Option<String>,
    },

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Invalid request input other than a symbol
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Intraday interval outside the supported set
    #[error("Unsupported interval: {0}")]
    InvalidInterval(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Short message suitable for showing to an end user.
    ///
    /// Prefers the server-provided message, then distinguishes timeouts from
    /// every other transport failure. Local validation errors describe themselves.
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiError { message: Some(message), .. }
            | Self::Unauthorized { message: Some(message) }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            Self::NetworkError(err) if err.is_timeout() => TIMEOUT_MESSAGE.to_string(),
            Self::InvalidSymbol(_) | Self::InvalidInput(_) | Self::InvalidInterval(_) | Self::ConfigError(_) => {
                self.to_string()
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// Pull the `message` field out of an error response body, if there is one.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToString::to_string)
}
