//! Downloading remote artifacts.
//!
//! [`Fetcher`] is the seam between artifact resolution and the network.
//! [`HttpFetcher`] is the real implementation; tests substitute an in-memory
//! one.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of retries after a failed request.
pub const DEFAULT_RETRIES: u32 = 2;

/// Transport-level failure. Converted to [`super::FetchError::FetchFailure`]
/// with the target name attached.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("{0}")]
    Network(String),
}

impl TransportError {
    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Status { status } => *status >= 500 || *status == 429,
            TransportError::Network(_) => true,
        }
    }
}

/// Downloads the bytes behind a URL.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError>;
}

/// Blocking HTTP(S) fetcher with retries.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    retries: u32,
}

impl HttpFetcher {
    /// Create a fetcher with the given timeout and retry count.
    pub fn new(timeout: Duration, retries: u32) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpFetcher { client, retries })
    }

    fn fetch_once(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| TransportError::Network(format!("failed to read response body: {}", e)))?;

        Ok(bytes.to_vec())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url) {
                Ok(bytes) => {
                    tracing::debug!("downloaded {} bytes from {}", bytes.len(), url);
                    return Ok(bytes);
                }
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "fetching {} failed ({}), retrying ({}/{})",
                        url,
                        e,
                        attempt,
                        self.retries
                    );
                    std::thread::sleep(Duration::from_millis(250 * u64::from(attempt)));
                }
                Err(e) => return Err(e),
            }
        }
    }
}
