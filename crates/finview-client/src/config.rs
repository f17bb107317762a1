//! Configuration for the analysis API client

use crate::error::{ClientError, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

pub const BASE_URL_ENV: &str = "FINVIEW_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "FINVIEW_API_TIMEOUT_MS";
pub const AUTH_TOKEN_ENV: &str = "FINVIEW_AUTH_TOKEN";

/// Configuration for [`AnalysisClient`](crate::AnalysisClient)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the analysis API, including the `/api` prefix
    pub base_url: String,

    /// Timeout applied to every request
    pub request_timeout: Duration,

    /// Timeout for stock analysis submissions, which wait on the upstream workflow
    pub analysis_timeout: Duration,

    /// Bearer token sent with every request (optional)
    pub auth_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(180),
            analysis_timeout: Duration::from_secs(60),
            auth_token: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::ConfigError(format!("invalid base URL '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::ConfigError(format!(
                "base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.request_timeout.is_zero() || self.analysis_timeout.is_zero() {
            return Err(ClientError::ConfigError(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Base URL with a trailing slash so relative endpoint paths join under it
    pub(crate) fn base(&self) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    analysis_timeout: Option<Duration>,
    auth_token: Option<String>,
}

impl ClientConfigBuilder {
    /// Set the API base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the general request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the stock analysis timeout
    pub fn analysis_timeout(mut self, duration: Duration) -> Self {
        self.analysis_timeout = Some(duration);
        self
    }

    /// Set the bearer token
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Fill unset fields from `FINVIEW_API_BASE_URL`, `FINVIEW_API_TIMEOUT_MS`
    /// and `FINVIEW_AUTH_TOKEN`
    pub fn with_env(mut self) -> Self {
        if self.base_url.is_none() {
            self.base_url = finview_utils::env_string(BASE_URL_ENV);
        }
        if self.request_timeout.is_none() {
            self.request_timeout = finview_utils::env_millis(TIMEOUT_ENV);
        }
        if self.auth_token.is_none() {
            self.auth_token = finview_utils::env_string(AUTH_TOKEN_ENV);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ClientConfig> {
        let defaults = ClientConfig::default();

        let config = ClientConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            analysis_timeout: self.analysis_timeout.unwrap_or(defaults.analysis_timeout),
            auth_token: self.auth_token.filter(|t| !t.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }
}
