//! Artifact sources.
//!
//! Binary artifacts come from a local path next to the manifest, or from a
//! URL through the content-addressed [`ArtifactStore`].

pub mod error;
pub mod fetcher;
pub mod local;
pub mod store;

pub use error::FetchError;
pub use fetcher::{Fetcher, HttpFetcher, TransportError};
pub use local::verify_local;
pub use store::{ArtifactStore, StoreOutcome};
