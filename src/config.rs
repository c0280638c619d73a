//! Client configuration loaded from environment variables.
//!
//! Everything has a local-development default so the CLI works against a
//! service running on `localhost:4170` with no setup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default API origin and version prefix.
pub const DEFAULT_API_URL: &str = "http://localhost:4170/api/v1";

/// Default location of the persisted credential file.
pub const DEFAULT_STORAGE_PATH: &str = ".niyofit/session.json";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Origin plus version prefix for every request (no trailing slash)
    pub api_base_url: String,
    /// Where the CLI keeps the token and user record
    pub storage_path: PathBuf,
    /// Per-request timeout; a timed-out request counts as a network failure
    pub request_timeout: Duration,
    /// Serialize login/register/logout/verify instead of letting them race
    pub serialize_session_ops: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            request_timeout: Duration::from_secs(30),
            serialize_session_ops: false,
        }
    }
}

impl Config {
    /// Config pointing at a test server, with a short timeout.
    pub fn test_default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            ..Self::default()
        }
    }

    /// Same config with a different API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = normalize_base_url(url.into());
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let timeout_secs = match env::var("NIYOFIT_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("NIYOFIT_REQUEST_TIMEOUT_SECS", raw))?,
            Err(_) => 30,
        };

        let serialize_session_ops = match env::var("NIYOFIT_SERIALIZE_SESSION_OPS") {
            Ok(raw) => parse_bool(&raw)
                .ok_or(ConfigError::Invalid("NIYOFIT_SERIALIZE_SESSION_OPS", raw))?,
            Err(_) => false,
        };

        Ok(Self {
            api_base_url: normalize_base_url(
                env::var("NIYOFIT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            ),
            storage_path: env::var("NIYOFIT_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH)),
            request_timeout: Duration::from_secs(timeout_secs),
            serialize_session_ops,
        })
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
