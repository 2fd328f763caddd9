use std::path::PathBuf;

use url::Url;

use crate::StoreError;

/// Where a blob lives, resolved to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
  /// A path on the local filesystem. Served by [`crate::FsStore`].
  Local(PathBuf),
  /// An HTTP(S) URL. Served by [`crate::HttpStore`].
  Remote(Url),
}

impl Location {
  /// The key to pass to the backend's `get`.
  pub fn key(&self) -> String {
    match self {
      Self::Local(path) => path.display().to_string(),
      Self::Remote(url) => url.to_string(),
    }
  }
}

/// Resolve a blob URI into a [`Location`].
///
/// Accepted forms:
/// - bare paths (`/mnt/data/adsl.sas7bdat`, `data/adsl.sas7bdat`)
/// - `file:///mnt/data/adsl.sas7bdat`
/// - `http://...` and `https://...`
/// - `s3://bucket/key`, fetched from the bucket's virtual-hosted endpoint
///   `https://bucket.s3.amazonaws.com/key`. The key path is kept verbatim,
///   including empty segments produced by `bucket//key`.
pub fn parse_location(raw: &str) -> Result<Location, StoreError> {
  let invalid = |reason: &str| StoreError::InvalidLocation {
    location: raw.to_string(),
    reason: reason.to_string(),
  };

  let url = match Url::parse(raw) {
    Ok(url) => url,
    Err(url::ParseError::RelativeUrlWithoutBase) => {
      return Ok(Location::Local(PathBuf::from(raw)));
    }
    Err(e) => return Err(invalid(&e.to_string())),
  };

  match url.scheme() {
    "file" => url
      .to_file_path()
      .map(Location::Local)
      .map_err(|_| invalid("not a local file path")),
    "http" | "https" => Ok(Location::Remote(url)),
    "s3" => {
      let bucket = url
        .host_str()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| invalid("missing bucket name"))?;
      let endpoint = format!("https://{}.s3.amazonaws.com{}", bucket, url.path());
      Url::parse(&endpoint)
        .map(Location::Remote)
        .map_err(|e| invalid(&e.to_string()))
    }
    other => Err(invalid(&format!("unsupported scheme '{}'", other))),
  }
}
