use std::path::{Path, PathBuf};

use clinflow_artifact::{FsStore, HttpStore, Location, Store, parse_location};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::TransferError;

/// A published blob and the name to save it under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobLocation {
  pub uri: String,
  pub local_filename: String,
}

impl BlobLocation {
  pub fn new(uri: impl Into<String>, local_filename: impl Into<String>) -> Self {
    Self {
      uri: uri.into(),
      local_filename: local_filename.into(),
    }
  }
}

const ADAM_BLOBS: [(&str, &str); 6] = [
  ("999b5d83-a1cc-4ed1-8d36-59880a4357ba", "admh"),
  ("606afd05-9d19-4e29-883f-ca8c17c7f36e", "advs"),
  ("30e4c638-08f2-44f4-9a2f-2f9fc699412d", "adsl"),
  ("af771702-6db5-4e60-b195-c208cf3c2035", "adae"),
  ("e612131f-1e39-4d40-84ee-e63f122f2eaa", "adcm"),
  ("e6b49bd6-8988-45dc-91ac-29c100ab76fb", "adlb"),
];

/// The ADaM datasets published by the production flows.
pub fn adam_blobs() -> Vec<BlobLocation> {
  ADAM_BLOBS
    .iter()
    .map(|(id, domain)| {
      BlobLocation::new(
        format!("s3://ddl-sce57693-flyte-data//{}/{}_dataset", id, domain),
        format!("{}.sas7bdat", domain),
      )
    })
    .collect()
}

/// Load a blob list from a JSON array of `{"uri", "local_filename"}`.
pub async fn load_manifest(path: &Path) -> Result<Vec<BlobLocation>, TransferError> {
  let raw = tokio::fs::read_to_string(path)
    .await
    .map_err(|source| TransferError::ManifestRead {
      path: path.to_path_buf(),
      source,
    })?;
  serde_json::from_str(&raw).map_err(|source| TransferError::ManifestParse {
    path: path.to_path_buf(),
    source,
  })
}

fn check_file_name(name: &str) -> Result<(), TransferError> {
  let plain = Path::new(name)
    .file_name()
    .is_some_and(|file_name| file_name == name);
  if plain {
    Ok(())
  } else {
    Err(TransferError::InvalidFileName(name.to_string()))
  }
}

/// Download each blob into `output_dir`, one after another, replacing files
/// that already exist. Stops at the first failure.
///
/// Returns the paths written, in input order.
#[instrument(skip(blobs), fields(count = blobs.len()))]
pub async fn download_blobs(
  blobs: &[BlobLocation],
  output_dir: &Path,
) -> Result<Vec<PathBuf>, TransferError> {
  for blob in blobs {
    check_file_name(&blob.local_filename)?;
  }

  let local = FsStore::new(".");
  let remote = HttpStore::new();
  let target = FsStore::new(output_dir);
  let mut written = Vec::with_capacity(blobs.len());

  for blob in blobs {
    let download_err = |source| TransferError::Download {
      uri: blob.uri.clone(),
      source,
    };

    let location = parse_location(&blob.uri).map_err(download_err)?;
    let store: &dyn Store = match &location {
      Location::Local(_) => &local,
      Location::Remote(_) => &remote,
    };

    let data = store.get(&location.key()).await.map_err(download_err)?;
    let bytes = target
      .put(&blob.local_filename, data)
      .await
      .map_err(download_err)?;

    let path = target.key_to_path(&blob.local_filename);
    info!(uri = %blob.uri, path = %path.display(), bytes, "downloaded blob");
    written.push(path);
  }

  Ok(written)
}
