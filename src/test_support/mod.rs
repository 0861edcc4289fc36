//! Test utilities and mocks for Quay unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use quay::test_support::MockFetcher;
//!
//! #[test]
//! fn test_example() {
//!     let fetcher = MockFetcher::new()
//!         .with_body("https://cdn.example.com/Sdk.zip", b"bytes".to_vec());
//!
//!     // Pass `&fetcher` to `ArtifactStore::ensure` or `resolve_artifacts`...
//!     assert_eq!(fetcher.request_count(), 0);
//! }
//! ```

pub mod fixtures;

use std::collections::HashMap;
use std::sync::Mutex;

use url::Url;

use crate::core::workspace::MANIFEST_NAME;
use crate::sources::{Fetcher, TransportError};

pub use fixtures::*;

/// A canned HTTP response.
#[derive(Debug, Clone)]
pub struct MockHttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl MockHttpResponse {
    /// A successful response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        MockHttpResponse {
            status: 200,
            body: body.into(),
        }
    }

    /// An error response.
    pub fn status(status: u16) -> Self {
        MockHttpResponse {
            status,
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// In-memory [`Fetcher`] that records every request.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: HashMap<String, MockHttpResponse>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        MockFetcher::default()
    }

    /// Respond to `url` with a canned response.
    pub fn with_response(mut self, url: &str, response: MockHttpResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    /// Respond to `url` with `200` and `body`.
    pub fn with_body(self, url: &str, body: Vec<u8>) -> Self {
        self.with_response(url, MockHttpResponse::ok(body))
    }

    /// Respond to `url` with an error status.
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.with_response(url, MockHttpResponse::status(status))
    }

    /// All requested URLs, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }

        match self.responses.get(url.as_str()) {
            Some(response) if response.is_success() => Ok(response.body.clone()),
            Some(response) => Err(TransportError::Status {
                status: response.status,
            }),
            None => Err(TransportError::Network(format!(
                "no mock response for URL: {}",
                url
            ))),
        }
    }
}

/// Create a temporary package directory containing `manifest` as Quay.toml.
pub fn create_test_package(manifest: &str) -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().expect("failed to create temp dir");
    std::fs::write(tmp.path().join(MANIFEST_NAME), manifest).expect("failed to write manifest");
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fetcher_records_requests() {
        let fetcher = MockFetcher::new()
            .with_body("https://cdn.example.com/a.zip", b"a".to_vec())
            .with_status("https://cdn.example.com/b.zip", 503);

        let a = Url::parse("https://cdn.example.com/a.zip").unwrap();
        let b = Url::parse("https://cdn.example.com/b.zip").unwrap();
        let c = Url::parse("https://cdn.example.com/c.zip").unwrap();

        assert_eq!(fetcher.fetch(&a).unwrap(), b"a");
        assert!(matches!(
            fetcher.fetch(&b),
            Err(TransportError::Status { status: 503 })
        ));
        assert!(matches!(fetcher.fetch(&c), Err(TransportError::Network(_))));
        assert_eq!(fetcher.requests().len(), 3);
        assert_eq!(fetcher.requests()[0], "https://cdn.example.com/a.zip");
    }

    #[test]
    fn test_create_test_package() {
        let tmp = create_test_package(WALLEE_MANIFEST);
        assert!(tmp.path().join("Quay.toml").is_file());
    }
}
