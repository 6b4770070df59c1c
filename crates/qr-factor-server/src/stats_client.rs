//! HTTP client for the stats collaborator.
//!
//! Sends `POST <base>/stats` with `{"matrices": [...]}` and returns whatever
//! JSON the collaborator answers with. One attempt per call, bounded by the
//! configured timeout.

use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use qr_factor_core::Matrix;

use crate::error::StatsClientError;

/// Request body sent to the collaborator.
#[derive(Debug, Serialize)]
pub struct StatsRequest<'a> {
    pub matrices: &'a [&'a Matrix],
}

/// Client for the stats collaborator.
#[derive(Debug, Clone)]
pub struct StatsClient {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl StatsClient {
    /// Create a client for the collaborator at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StatsClientError> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| StatsClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(StatsClientError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                base.scheme()
            )));
        }

        let endpoint = Url::parse(&format!("{}/stats", base.as_str().trim_end_matches('/')))
            .map_err(|e| StatsClientError::InvalidUrl(e.to_string()))?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(format!("qr-factor-server/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StatsClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// Full URL of the stats endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Post `matrices` to the collaborator.
    ///
    /// `authorization` is forwarded verbatim when present. Any non-2xx
    /// status is an error; the response body is not inspected beyond JSON
    /// decoding.
    pub async fn fetch_stats(
        &self,
        authorization: Option<&HeaderValue>,
        matrices: &[&Matrix],
    ) -> Result<Value, StatsClientError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&StatsRequest { matrices });

        if let Some(auth) = authorization.filter(|v| !v.is_empty()) {
            request = request.header(AUTHORIZATION, auth.clone());
        }

        debug!("Fetching stats: {}", self.endpoint);
        let response = request
            .send()
            .await
            .map_err(|e| StatsClientError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatsClientError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StatsClientError::from_reqwest(e, self.timeout))?;

        serde_json::from_slice(&bytes).map_err(|e| StatsClientError::Decode(e.to_string()))
    }
}
