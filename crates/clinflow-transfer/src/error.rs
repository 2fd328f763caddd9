use std::path::PathBuf;

use clinflow_artifact::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
  #[error("failed to read input location {path}: {source}")]
  InputLocation {
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("failed to copy {from} to {to}: {source}")]
  Copy {
    from: PathBuf,
    to: PathBuf,
    source: std::io::Error,
  },

  #[error("failed to read manifest {path}: {source}")]
  ManifestRead {
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("invalid manifest {path}: {source}")]
  ManifestParse {
    path: PathBuf,
    source: serde_json::Error,
  },

  #[error("local file name '{0}' must be a plain file name")]
  InvalidFileName(String),

  #[error("failed to download {uri}: {source}")]
  Download { uri: String, source: StoreError },
}
