//! HTTP client for the public SOTA API (`api2.sota.org.uk`).

use std::time::Duration;

use async_trait::async_trait;
use sota_map_spot_models::RawSpot;
use sota_map_summit_models::ApiSummit;

use crate::{Lookback, SotaSource, SourceError};

/// Public SOTA API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api2.sota.org.uk/api";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// [`SotaSource`] backed by the SOTA REST API.
///
/// No authentication is required. Each call is a single GET; failures are
/// returned to the caller as-is.
#[derive(Debug, Clone)]
pub struct SotaApi {
    client: reqwest::Client,
    base_url: String,
}

impl SotaApi {
    /// Creates a client for the given base URL (without trailing slash).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sota_map/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET {base}/spots/{lookback}/all`
    #[must_use]
    pub fn spots_url(&self, lookback: Lookback) -> String {
        format!("{}/spots/{lookback}/all", self.base_url)
    }

    /// `GET {base}/summits/{code}`
    #[must_use]
    pub fn summit_url(&self, code: &str) -> String {
        format!("{}/summits/{}", self.base_url, code.trim().to_uppercase())
    }

    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self.client.get(url).send().await?;
        log::info!("Status code: {} for {url}", response.status());
        Ok(response.error_for_status()?.text().await?)
    }
}

#[async_trait]
impl SotaSource for SotaApi {
    async fn fetch_spots(&self, lookback: Lookback) -> Result<Vec<RawSpot>, SourceError> {
        let body = self.get_text(&self.spots_url(lookback)).await?;
        let spots: Vec<RawSpot> = serde_json::from_str(&body)?;

        if let Some(count) = lookback.count() {
            log::info!("{} found where expected number was {count}.", spots.len());
        } else {
            log::info!(
                "{} spots found in latest {} h.",
                spots.len(),
                lookback.hours().unwrap_or(0)
            );
        }

        Ok(spots)
    }

    async fn fetch_summit(&self, code: &str) -> Result<ApiSummit, SourceError> {
        let body = self.get_text(&self.summit_url(code)).await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        if value.is_null() {
            return Err(SourceError::SummitNotFound {
                code: code.to_string(),
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls() {
        let api = SotaApi::new(&format!("{DEFAULT_BASE_URL}/")).unwrap();
        assert_eq!(
            api.spots_url(Lookback(-1)),
            "https://api2.sota.org.uk/api/spots/-1/all"
        );
        assert_eq!(
            api.spots_url(Lookback(10)),
            "https://api2.sota.org.uk/api/spots/10/all"
        );
        assert_eq!(
            api.summit_url("g/ld-001"),
            "https://api2.sota.org.uk/api/summits/G/LD-001"
        );
    }
}
