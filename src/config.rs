//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;

/// Local development backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

const DEFAULT_LOG_FILTER: &str = "mealmate_client=info,warn";
const TOKEN_FILE_NAME: &str = "tokens.json";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base address all endpoint paths are appended to (no trailing slash)
    pub api_url: String,
    /// File holding the persisted access and refresh tokens
    pub token_store_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directives
    pub log_filter: String,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_store_path: PathBuf::from(".mealmate").join(TOKEN_FILE_NAME),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = match var("MEALMATE_API_URL") {
            Some(v) => normalize_api_url(&v)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let token_store_path = var("MEALMATE_TOKEN_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(default_token_store_path);

        Ok(Self {
            api_url,
            token_store_path,
            log_filter: var("MEALMATE_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    /// Replace the base address, validating it the same way as `from_env`.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(api_url)?;
        Ok(self)
    }
}

/// Validate a base address and strip its trailing slash.
pub fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = reqwest::Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidUrl(trimmed.to_string(), e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(
            trimmed.to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn default_token_store_path() -> PathBuf {
    directories::ProjectDirs::from("com", "MealMate", "mealmate")
        .map(|dirs| dirs.data_dir().join(TOKEN_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(".mealmate").join(TOKEN_FILE_NAME))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API URL {0}: {1}")]
    InvalidUrl(String, String),
}
