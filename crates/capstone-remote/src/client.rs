// SPDX-FileCopyrightText: 2026 Capstone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport for the portal REST API.
//!
//! Provides [`PortalHttpClient`] which handles URL construction, JSON
//! bodies, and transient error retry.

use std::time::Duration;

use capstone_config::PortalConfig;
use capstone_core::CapstoneError;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Delay before retrying a transient failure.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Error body the portal returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct PortalErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for portal communication.
///
/// Manages connection pooling, the per-request timeout, and retry logic
/// for transient errors (429, 500, 502, 503).
#[derive(Debug, Clone)]
pub struct PortalHttpClient {
    client: reqwest::Client,
    base_url: Url,
    max_retries: u32,
    retry_delay: Duration,
}

impl PortalHttpClient {
    /// Creates a client for the portal at `config.base_url`.
    pub fn new(config: &PortalConfig) -> Result<Self, CapstoneError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            CapstoneError::Config(format!("invalid portal base_url {}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CapstoneError::Config(format!(
                "portal base_url {} cannot carry a path",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CapstoneError::Remote {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
            retry_delay: RETRY_DELAY,
        })
    }

    /// Overrides the delay between retries.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET` and decode the body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CapstoneError> {
        let body = self.execute(Method::GET, url, None::<&()>).await?;
        decode(&body)
    }

    /// `GET`, treating `404` as absent.
    pub async fn get_json_optional<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Option<T>, CapstoneError> {
        match self.execute(Method::GET, url, None::<&()>).await {
            Ok(body) if body.trim().is_empty() => Ok(None),
            Ok(body) => decode(&body),
            Err(Failure::Status(StatusCode::NOT_FOUND, _)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Sends `body` as JSON with `method` and decodes the response.
    pub async fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T, CapstoneError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(method, url, Some(body)).await?;
        decode(&body)
    }

    /// `DELETE` and decode the body.
    pub async fn delete_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CapstoneError> {
        let body = self.execute(Method::DELETE, url, None::<&()>).await?;
        decode(&body)
    }

    /// Probes the base URL. Any HTTP answer below 500 counts as reachable.
    pub async fn probe(&self) -> Result<StatusCode, CapstoneError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(transport_error)?;
        Ok(response.status())
    }

    /// Sends one request, retrying transient failures after a fixed delay.
    ///
    /// Returns the response body of the first 2xx answer.
    async fn execute<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<String, Failure>
    where
        B: Serialize + ?Sized,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, %url, "retrying portal request after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(body) = body {
                request = request.json(body);
            }
            let response = request.send().await.map_err(|e| Failure::Other(transport_error(e)))?;

            let status = response.status();
            debug!(%method, %url, status = %status, attempt, "portal response received");

            if status.is_success() {
                return response.text().await.map_err(|e| {
                    Failure::Other(CapstoneError::Remote {
                        message: format!("failed to read response body: {e}"),
                        source: Some(Box::new(e)),
                    })
                });
            }

            let text = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %text, "transient error, will retry");
                last_error = Some(Failure::Status(status, text));
                continue;
            }

            // Non-transient error or exhausted retries.
            return Err(Failure::Status(status, text));
        }

        Err(last_error.unwrap_or_else(|| {
            Failure::Other(CapstoneError::remote("portal request failed after retries"))
        }))
    }
}

/// Why a request did not produce a 2xx body.
#[derive(Debug)]
enum Failure {
    Status(StatusCode, String),
    Other(CapstoneError),
}

impl From<Failure> for CapstoneError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Status(status, body) => {
                let detail = serde_json::from_str::<PortalErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.message.or(b.error))
                    .unwrap_or(body);
                CapstoneError::remote(format!("portal returned {status}: {detail}"))
            }
            Failure::Other(err) => err,
        }
    }
}

fn transport_error(e: reqwest::Error) -> CapstoneError {
    CapstoneError::Remote {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CapstoneError> {
    serde_json::from_str(body).map_err(|e| CapstoneError::Remote {
        message: format!("failed to parse portal response: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}
