use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::ImageSource;
use crate::error::ConvertError;

/// Default upper bound on a single upstream fetch, connect through body.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest-backed implementation of [`ImageSource`].
///
/// Every request carries a total timeout, which also bounds how long
/// concurrent waiters on the same conversion can be blocked.
#[derive(Clone)]
pub struct HttpImageSource {
    client: Client,
    timeout: Duration,
}

impl HttpImageSource {
    /// Create a source with the default 30 second timeout.
    pub fn new() -> Result<Self, ConvertError> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a source whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ConvertError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tiff-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConvertError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Get the configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_transport_error(&self, url: &Url, err: reqwest::Error) -> ConvertError {
        if err.is_timeout() {
            ConvertError::transport(format!(
                "request to {} timed out after {}s",
                url,
                self.timeout.as_secs_f64()
            ))
        } else {
            ConvertError::transport(err.to_string())
        }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &Url) -> Result<Bytes, ConvertError> {
        debug!(url = %url, "Fetching upstream image");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::upstream_status(
                status.as_u16(),
                format!("upstream returned {} for {}", status, url),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(url, e))?;

        debug!(url = %url, bytes = body.len(), "Fetched upstream image");
        Ok(body)
    }
}
