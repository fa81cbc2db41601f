//! Companies House client configuration.
//!
//! The API key is an explicit dependency injected into the client at
//! construction, never ambient state. The custom `Debug` implementation
//! redacts it so it cannot leak into log output.

use thiserror::Error;
use url::Url;

/// Production Companies House API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.company-information.service.gov.uk";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "COMPANIES_HOUSE_API_KEY";

const BASE_URL_VAR: &str = "COMPANIES_HOUSE_BASE_URL";
const TIMEOUT_VAR: &str = "COMPANIES_HOUSE_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration errors raised while loading from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "{API_KEY_VAR} is not set; create a key at \
         https://developer.company-information.service.gov.uk and export it"
    )]
    MissingApiKey,

    #[error("invalid URL in {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        source: url::ParseError,
    },

    #[error("invalid integer in {var}")]
    InvalidNumber { var: &'static str },
}

/// Configuration for connecting to the Companies House API.
#[derive(Clone)]
pub struct Config {
    /// Registry base URL. Overridden in tests to point at a mock server.
    pub base_url: Url,
    /// API key, sent as the HTTP Basic username with an empty password.
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Configuration with the production base URL and default timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `COMPANIES_HOUSE_API_KEY` (required)
    /// - `COMPANIES_HOUSE_BASE_URL` (default: production endpoint)
    /// - `COMPANIES_HOUSE_TIMEOUT_SECS` (default: 15)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = match std::env::var(BASE_URL_VAR) {
            Ok(raw) => Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
                var: BASE_URL_VAR,
                source,
            })?,
            Err(_) => Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        };

        let timeout_secs = match std::env::var(TIMEOUT_VAR) {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { var: TIMEOUT_VAR })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            api_key,
            timeout_secs,
        })
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
