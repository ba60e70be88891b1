/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::http::{FetchError, Result};
use crate::types::{ErrorBody, TaskId};

/// Default base URL of a locally running fetch service
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Main HTTP client for the fetch service
#[derive(Debug, Clone)]
pub struct FetchClient {
    http_client: Client,
    base_url: Url,
}

impl FetchClient {
    /// Create a client for the default local service
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_BASE_URL, ClientConfig::default())
    }

    /// Create a client with custom base URL and configuration
    pub fn with_config(base_url: &str, config: ClientConfig) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(FetchError::Config(format!(
                "base URL must be http(s): {base_url}"
            )));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Base URL the client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// WebSocket URL of the progress channel for a task
    ///
    /// `http` maps to `ws` and `https` to `wss`; the task id is appended as a
    /// single percent-encoded path segment under `/ws/progress/`.
    pub fn progress_url(&self, task_id: &TaskId) -> Result<Url> {
        let mut url = self.base_url.clone();
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| FetchError::Config(format!("cannot derive ws URL from {}", self.base_url)))?;
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| FetchError::Config(format!("cannot derive ws URL from {}", self.base_url)))?
            .clear()
            .extend(["ws", "progress", task_id.as_str()]);
        Ok(url)
    }

    /// Build full URL for an API endpoint
    fn api_url(&self, endpoint: &str) -> std::result::Result<Url, url::ParseError> {
        self.base_url.join(endpoint)
    }

    /// Build request builder for an API endpoint
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.api_url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode a JSON body, mapping non-2xx to `FetchError::Api`
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.send_checked(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(FetchError::from)
    }

    /// Send a request and return the raw response once the status is a success
    pub(crate) async fn send_checked(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        debug!(status = status.as_u16(), %message, "fetch service returned error");
        Err(FetchError::api_error(status, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_url_maps_scheme() {
        let client = FetchClient::with_config("http://localhost:8000", ClientConfig::default())
            .expect("client");
        let url = client
            .progress_url(&TaskId::from("ab12cd34"))
            .expect("progress url");
        assert_eq!(url.as_str(), "ws://localhost:8000/ws/progress/ab12cd34");

        let secure = FetchClient::with_config("https://fetch.example.com/app/", ClientConfig::default())
            .expect("client");
        let url = secure
            .progress_url(&TaskId::from("a/b"))
            .expect("progress url");
        assert_eq!(url.as_str(), "wss://fetch.example.com/ws/progress/a%2Fb");
    }

    #[test]
    fn test_rejects_non_http_base() {
        let err = FetchClient::with_config("ftp://example.com", ClientConfig::default())
            .expect_err("ftp is not accepted");
        assert!(matches!(err, FetchError::Config(_)));
    }
}
