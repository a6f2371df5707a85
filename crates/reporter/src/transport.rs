//! Datapoint transport.
//!
//! The reporter hands each batch to a [`Transport`]; the production
//! implementation POSTs JSON to OpenTSDB's HTTP API. Timeout policy lives
//! here, not in the reporting cycle, and nothing is retried.

use std::time::Duration;

use async_trait::async_trait;

use crate::datapoint::Datapoint;
use crate::error::ReportError;

/// OpenTSDB HTTP API path for writing datapoints
pub const API_PUT_PATH: &str = "/api/put";

/// HTTP request timeout
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Destination for one cycle's batches.
///
/// The reporter guarantees no batch exceeds the configured maximum size and
/// that a cycle's batches partition its datapoint set without omission or
/// duplication.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one batch as a single logical write
    async fn send(&self, batch: &[Datapoint]) -> Result<(), ReportError>;
}

/// OpenTSDB HTTP client.
///
/// Serializes each batch as a JSON array and POSTs it to `{base_url}/api/put`.
pub struct OpenTsdbClient {
    url: String,
    http: reqwest::Client,
}

impl OpenTsdbClient {
    /// Create a client for the OpenTSDB instance at `base_url`
    /// (e.g. `http://localhost:4242`)
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_timeout(base_url, HTTP_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            url: format!("{}{}", base_url.as_ref().trim_end_matches('/'), API_PUT_PATH),
            http,
        }
    }

    /// Full URL batches are written to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for OpenTsdbClient {
    async fn send(&self, batch: &[Datapoint]) -> Result<(), ReportError> {
        let response = self
            .http
            .post(&self.url)
            .json(batch)
            .send()
            .await
            .map_err(|e| ReportError::Network(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ReportError::Server(response.status().as_u16()))
        }
    }
}
