use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use tracing::debug;

use crate::{ByteStream, Store, StoreError};

/// Read-only store over HTTP(S). Keys are absolute URLs.
///
/// Authentication is left to the network (pre-signed URLs, instance roles);
/// no credentials are attached to requests.
#[derive(Clone, Default)]
pub struct HttpStore {
  client: reqwest::Client,
}

impl HttpStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_client(client: reqwest::Client) -> Self {
    Self { client }
  }
}

#[async_trait]
impl Store for HttpStore {
  async fn get(&self, key: &str) -> Result<ByteStream, StoreError> {
    debug!(url = %key, "fetching blob");
    let response = self.client.get(key).send().await?;

    if response.status() == StatusCode::NOT_FOUND {
      return Err(StoreError::NotFound(key.to_string()));
    }
    let response = response.error_for_status()?;

    let stream = response
      .bytes_stream()
      .map(|r| r.map_err(StoreError::Http));
    Ok(Box::pin(stream))
  }

  async fn put(&self, _key: &str, _data: ByteStream) -> Result<u64, StoreError> {
    Err(StoreError::Unsupported {
      backend: "http",
      operation: "put",
    })
  }
}
