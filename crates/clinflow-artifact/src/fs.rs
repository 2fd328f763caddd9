use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::{ByteStream, Store, StoreError};

/// Filesystem-based artifact store.
///
/// Each artifact lives at `{base_path}/{key}`. Parent directories are
/// created on write. An absolute key replaces the base path entirely, which
/// is how bare source paths and `file://` locations are served.
pub struct FsStore {
  base_path: PathBuf,
}

impl FsStore {
  /// Create a new filesystem store with the given base path.
  pub fn new(base_path: impl Into<PathBuf>) -> Self {
    Self {
      base_path: base_path.into(),
    }
  }

  pub fn key_to_path(&self, key: &str) -> PathBuf {
    self.base_path.join(key)
  }
}

#[async_trait]
impl Store for FsStore {
  async fn get(&self, key: &str) -> Result<ByteStream, StoreError> {
    let path = self.key_to_path(key);
    let file = File::open(&path).await.map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        StoreError::NotFound(path.display().to_string())
      } else {
        StoreError::Io(e)
      }
    })?;
    let stream = ReaderStream::new(file).map(|r| r.map_err(StoreError::Io));
    Ok(Box::pin(stream))
  }

  async fn put(&self, key: &str, data: ByteStream) -> Result<u64, StoreError> {
    let path = self.key_to_path(key);

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).await?;
    }

    // Stream into a sibling file so a failed transfer never clobbers the
    // existing artifact.
    let partial = partial_path(&path);
    let written = match write_stream(&partial, data).await {
      Ok(written) => written,
      Err(e) => {
        let _ = fs::remove_file(&partial).await;
        return Err(e);
      }
    };

    fs::rename(&partial, &path).await?;
    Ok(written)
  }
}

fn partial_path(path: &Path) -> PathBuf {
  let mut name = path.file_name().unwrap_or_default().to_os_string();
  name.push(".partial");
  path.with_file_name(name)
}

async fn write_stream(path: &Path, data: ByteStream) -> Result<u64, StoreError> {
  let mut file = File::create(path).await?;
  let mut stream = std::pin::pin!(data);
  let mut written = 0u64;

  while let Some(chunk) = stream.next().await {
    let bytes = chunk?;
    file.write_all(&bytes).await?;
    written += bytes.len() as u64;
  }

  file.flush().await?;
  Ok(written)
}
