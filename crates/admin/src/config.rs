//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PAYFLOW_AUTH_URL` - Login / token verification endpoint
//! - `PAYFLOW_WITHDRAWALS_URL` - Withdrawal list and status update endpoint
//! - `PAYFLOW_ANALYTICS_URL` - Analytics snapshot and Excel export endpoint
//!
//! ## Optional
//! - `PAYFLOW_STATE_DIR` - Where the session file lives (default: `.payflow`)
//! - `PAYFLOW_EXPORT_DIR` - Where Excel reports are saved (default: `.`)
//! - `PAYFLOW_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `PAYFLOW_LOG_JSON` - Emit JSON log lines when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_STATE_DIR: &str = ".payflow";
const DEFAULT_EXPORT_DIR: &str = ".";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Remote service endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// `POST` to log in, `GET` to verify a token.
    pub auth: Url,
    /// `GET` to list, `PUT` to change status.
    pub withdrawals: Url,
    /// `GET` for the snapshot, `GET ?format=excel` for the report.
    pub analytics: Url,
}

/// Console configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub endpoints: Endpoints,
    /// Directory holding the persisted session.
    pub state_dir: PathBuf,
    /// Directory Excel reports are written to.
    pub export_dir: PathBuf,
    /// Timeout applied to every HTTP request.
    pub http_timeout: Duration,
    /// Emit JSON-formatted logs.
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoints = Endpoints {
            auth: required_url(&lookup, "PAYFLOW_AUTH_URL")?,
            withdrawals: required_url(&lookup, "PAYFLOW_WITHDRAWALS_URL")?,
            analytics: required_url(&lookup, "PAYFLOW_ANALYTICS_URL")?,
        };

        let state_dir = PathBuf::from(
            lookup("PAYFLOW_STATE_DIR").unwrap_or_else(|| DEFAULT_STATE_DIR.to_string()),
        );
        let export_dir = PathBuf::from(
            lookup("PAYFLOW_EXPORT_DIR").unwrap_or_else(|| DEFAULT_EXPORT_DIR.to_string()),
        );

        let timeout_secs = match lookup("PAYFLOW_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar("PAYFLOW_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "PAYFLOW_HTTP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let sentry_sample_rate = lookup("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            endpoints,
            state_dir,
            export_dir,
            http_timeout: Duration::from_secs(timeout_secs),
            log_json: lookup("PAYFLOW_LOG_JSON").is_some(),
            sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }

    /// Configuration pointing at explicit endpoints with defaults elsewhere.
    #[must_use]
    pub fn with_endpoints(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }

    /// Path of the persisted session file.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required variable and parse it as an absolute `http(s)` URL.
fn required_url<F>(lookup: &F, key: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}
