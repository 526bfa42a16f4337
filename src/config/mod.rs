//! Configuration loading and validation.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::LeagueId;

/// Prefix for environment overrides, e.g. `FPL_DASHBOARD__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "FPL_DASHBOARD";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Retry policy for per-entrant upstream fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_delay_ms() -> u64 {
    250
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryPolicy {
    /// No retries at all. Used by tests and one-shot tooling.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: 0,
            backoff_multiplier: 1.0,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> std::time::Duration {
        let factor = self
            .backoff_multiplier
            .powi(attempt.saturating_sub(1) as i32);
        std::time::Duration::from_millis((self.initial_delay_ms as f64 * factor) as u64)
    }
}

/// Upstream fantasy API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on in-flight per-entrant requests within one aggregation
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,

    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_base_url() -> String {
    "https://fantasy.premierleague.com/api/".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_max_concurrent() -> usize {
    8
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            max_concurrent_requests: default_max_concurrent(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Directory with a prebuilt front end, served for non-API paths
    #[serde(default)]
    pub static_dir: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "https://fplnepaldashboard.netlify.app".to_string(),
        "https://webapp.fplnepal.com".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            static_dir: None,
        }
    }
}

/// A head-to-head division and the upstream league behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub name: String,
    pub league_id: LeagueId,
}

impl Division {
    pub fn new(name: impl Into<String>, league_id: u64) -> Self {
        Self {
            name: name.into(),
            league_id: LeagueId(league_id),
        }
    }
}

fn default_divisions() -> Vec<Division> {
    vec![
        Division::new("Div A", 446714),
        Division::new("Div B", 446717),
        Division::new("Div C", 446720),
        Division::new("Div D", 446723),
        Division::new("Div E", 446724),
        Division::new("Div F", 446727),
    ]
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default = "default_divisions")]
    pub divisions: Vec<Division>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            upstream: UpstreamConfig::default(),
            server: ServerConfig::default(),
            divisions: default_divisions(),
        }
    }
}

impl AppConfig {
    /// Load the optional TOML file at `path`, then apply
    /// `FPL_DASHBOARD__*` environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Upstream timeout must be greater than 0".to_string(),
            ));
        }

        if self.upstream.max_concurrent_requests == 0 {
            return Err(ConfigError::ValidationError(
                "max_concurrent_requests must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for division in &self.divisions {
            if division.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Division name must not be empty".to_string(),
                ));
            }
            if !seen.insert(division.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate division: {}",
                    division.name
                )));
            }
        }

        Ok(())
    }

    /// Freeze the division table for sharing across requests.
    pub fn division_table(&self) -> Arc<[Division]> {
        self.divisions.clone().into()
    }
}
