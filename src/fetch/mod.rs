//! HTTP fetching for the upstream fantasy API.
//!
//! Every request goes through one pooled `reqwest` client with a bounded
//! timeout. Responses are returned as decoded JSON; nothing is cached.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::UpstreamConfig;

/// Errors that can occur while talking to the upstream API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or timeout.
    #[error("Upstream unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Response arrived but did not have the expected shape.
    #[error("Unexpected upstream format: {0}")]
    Format(String),
}

impl FetchError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Unavailable(_) | FetchError::RateLimited { .. } => true,
            FetchError::HttpStatus { status, .. } => *status >= 500,
            FetchError::InvalidUrl(_) | FetchError::NotFound(_) | FetchError::Format(_) => false,
        }
    }

    /// Wait requested by the upstream before the next attempt.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            FetchError::RateLimited {
                retry_after_secs, ..
            } => Some(Duration::from_secs(*retry_after_secs)),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Format(err.to_string())
    }
}

/// Decode a JSON value into a typed upstream payload.
///
/// Missing required fields surface as [`FetchError::Format`], never as a
/// partially filled struct.
pub fn decode<T: DeserializeOwned>(value: serde_json::Value, what: &str) -> Result<T, FetchError> {
    serde_json::from_value(value).map_err(|e| FetchError::Format(format!("{}: {}", what, e)))
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Upstream API root, e.g. `https://fantasy.premierleague.com/api/`
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://fantasy.premierleague.com/api/".to_string(),
            timeout: Duration::from_secs(15),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

impl From<&UpstreamConfig> for FetcherConfig {
    fn from(upstream: &UpstreamConfig) -> Self {
        Self {
            base_url: upstream.base_url.clone(),
            timeout: Duration::from_secs(upstream.timeout_seconds),
            user_agent: upstream.user_agent.clone(),
        }
    }
}

/// JSON fetcher rooted at the upstream base URL.
pub struct Fetcher {
    client: Client,
    base: Url,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("fpl-dashboard/0.1.0")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let base = Self::normalize_base(&config.base_url)?;
        Ok(Self { client, base })
    }

    /// Parse the base URL, forcing a trailing slash so relative joins keep
    /// the `/api/` segment.
    fn normalize_base(raw: &str) -> Result<Url, FetchError> {
        let with_slash = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{}/", raw)
        };
        Url::parse(&with_slash).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// Resolve an upstream path (relative, no leading slash) against the base.
    pub fn url_for(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// GET a path and decode the body as JSON.
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, FetchError> {
        let url = self.url_for(path)?;
        info!("FPL: GET {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        debug!("FPL: {} returned {} bytes", path, body.len());
        Ok(serde_json::from_slice(&body)?)
    }
}
