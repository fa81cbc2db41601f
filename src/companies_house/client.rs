//! Companies House API client.
//!
//! Paced HTTP client for the company profile, PSC, and capital endpoints.
//! Purely read-through: no caching across calls, no retries — transient
//! failures surface as [`RegistryError::Transport`] and retry policy belongs
//! to callers.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::time::sleep;
use url::Url;

use super::types::{CapitalResponse, CompanyNumber, ProfileResponse, PscList};
use crate::config::Config;
use crate::error::RegistryError;
use crate::resolver::model::{CompanyProfile, ControllingParty, ShareClass};
use crate::resolver::Registry;

// Companies House allows 600 requests per 5 minutes per key; one request
// every 300ms keeps a full-depth traversal comfortably inside that.
const PACING_DELAY_MS: u64 = 300;

/// HTTP client for the Companies House read API.
///
/// Authenticates with the API key as the HTTP Basic username and an empty
/// password. The key is held privately and excluded from `Debug` output.
pub struct CompaniesHouseClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    last_request: Mutex<Instant>,
}

impl std::fmt::Debug for CompaniesHouseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompaniesHouseClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl CompaniesHouseClient {
    /// Build a client from configuration.
    ///
    /// Fails with [`RegistryError::Auth`] when the configured key is missing
    /// or empty, before any request is attempted.
    pub fn new(config: &Config) -> Result<Self, RegistryError> {
        if config.api_key.trim().is_empty() {
            return Err(RegistryError::Auth {
                detail: "API key is missing or empty".into(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RegistryError::Transport {
                endpoint: "client-init".into(),
                status: None,
                detail: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            last_request: Mutex::new(Instant::now()),
        })
    }

    /// Enforce pacing between requests.
    async fn pace(&self) {
        let elapsed = {
            let last = self.last_request.lock().unwrap();
            last.elapsed()
        };

        if elapsed < Duration::from_millis(PACING_DELAY_MS) {
            sleep(Duration::from_millis(PACING_DELAY_MS) - elapsed).await;
        }

        let mut last = self.last_request.lock().unwrap();
        *last = Instant::now();
    }

    /// Issue a GET against `path` (relative to the base URL) and classify the
    /// response status into the error taxonomy.
    async fn get(
        &self,
        path: &str,
        endpoint: &str,
        number: &CompanyNumber,
    ) -> Result<reqwest::Response, RegistryError> {
        self.pace().await;

        let url = self
            .base_url
            .join(path)
            .map_err(|e| RegistryError::Transport {
                endpoint: endpoint.to_string(),
                status: None,
                detail: format!("invalid request URL: {e}"),
            })?;

        tracing::debug!(%endpoint, "fetching");

        let response = self
            .http
            .get(url)
            .basic_auth(&self.api_key, Some(""))
            .send()
            .await
            .map_err(|e| RegistryError::Transport {
                endpoint: endpoint.to_string(),
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RegistryError::Auth {
                detail: format!("HTTP {} for {endpoint}", status.as_u16()),
            });
        }
        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound {
                number: number.to_string(),
            });
        }
        // 429 and every other unexpected status land here, with the status
        // and a body snippet preserved for diagnostics.
        let body = response.text().await.unwrap_or_default();
        Err(RegistryError::Transport {
            endpoint: endpoint.to_string(),
            status: Some(status.as_u16()),
            detail: body.chars().take(200).collect(),
        })
    }

    fn decode_error(endpoint: &str, err: reqwest::Error) -> RegistryError {
        RegistryError::Transport {
            endpoint: endpoint.to_string(),
            status: None,
            detail: format!("failed to decode response: {err}"),
        }
    }
}

#[async_trait]
impl Registry for CompaniesHouseClient {
    async fn profile(&self, number: &CompanyNumber) -> Result<CompanyProfile, RegistryError> {
        let endpoint = format!("GET /company/{number}");
        let response = self
            .get(&format!("company/{number}"), &endpoint, number)
            .await?;

        let wire: ProfileResponse = response
            .json()
            .await
            .map_err(|e| Self::decode_error(&endpoint, e))?;

        Ok(wire.into_profile(number.clone()))
    }

    async fn controlling_parties(
        &self,
        number: &CompanyNumber,
    ) -> Result<Vec<ControllingParty>, RegistryError> {
        let endpoint = format!("GET /company/{number}/persons-with-significant-control");
        let response = self
            .get(
                &format!("company/{number}/persons-with-significant-control"),
                &endpoint,
                number,
            )
            .await?;

        let wire: PscList = response
            .json()
            .await
            .map_err(|e| Self::decode_error(&endpoint, e))?;

        Ok(wire.items.into_iter().map(|item| item.into_party()).collect())
    }

    async fn share_capital(
        &self,
        number: &CompanyNumber,
    ) -> Result<Vec<ShareClass>, RegistryError> {
        let endpoint = format!("GET /company/{number}/capital");
        let response = match self
            .get(&format!("company/{number}/capital"), &endpoint, number)
            .await
        {
            Ok(response) => response,
            // Most companies have no structured capital filing; that is
            // absence of data, not a failure.
            Err(RegistryError::NotFound { .. }) => return Ok(vec![]),
            Err(err) => return Err(err),
        };

        let wire: CapitalResponse = response
            .json()
            .await
            .map_err(|e| Self::decode_error(&endpoint, e))?;

        Ok(wire
            .into_items()
            .into_iter()
            .map(|item| item.into_share_class())
            .collect())
    }
}
