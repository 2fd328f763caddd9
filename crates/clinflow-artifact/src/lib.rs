//! clinflow Artifact
//!
//! This crate covers the two places artifacts show up in clinflow:
//!
//! - The [`ArtifactRegistry`] hands out shared [`ArtifactTag`]s. Outputs
//!   across many workflows point at the same tag so the platform can group
//!   them ("ADaM Datasets", "TFL Reports", ...). One registry is created per
//!   process and passed to every builder that declares tagged outputs.
//! - The [`Store`] trait moves artifact bytes. The transfer utilities use it
//!   to pull published blobs down to a local directory. [`FsStore`] serves
//!   local paths and [`HttpStore`] serves `http(s)://` and `s3://` locations.
//!
//! The trait uses async streaming so large datasets never sit in memory.

mod fs;
mod http;
mod location;
mod registry;

pub use fs::FsStore;
pub use http::HttpStore;
pub use location::{Location, parse_location};
pub use registry::{ArtifactId, ArtifactRegistry, ArtifactTag, RegistryError, tags};

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// A boxed stream of bytes for artifact data.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StoreError>> + Send>>;

/// Error type for artifact storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// The requested artifact was not found.
  #[error("artifact not found: {0}")]
  NotFound(String),

  /// The location could not be mapped to a storage backend.
  #[error("invalid artifact location '{location}': {reason}")]
  InvalidLocation { location: String, reason: String },

  /// The backend does not support the operation.
  #[error("{operation} is not supported by the {backend} store")]
  Unsupported {
    backend: &'static str,
    operation: &'static str,
  },

  /// An HTTP error occurred.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// An I/O error occurred.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Artifact storage trait.
///
/// Implementations provide the actual storage backend (filesystem, HTTP, ...).
/// Keys are backend specific: a relative path for [`FsStore`], a URL for
/// [`HttpStore`]. Use [`parse_location`] to turn a blob URI into a backend
/// and key.
#[async_trait]
pub trait Store: Send + Sync {
  /// Retrieve an artifact by key.
  ///
  /// Returns a stream of bytes for efficient handling of large files.
  async fn get(&self, key: &str) -> Result<ByteStream, StoreError>;

  /// Store an artifact, replacing any existing one under the same key.
  ///
  /// Returns the number of bytes written.
  async fn put(&self, key: &str, data: ByteStream) -> Result<u64, StoreError>;
}
