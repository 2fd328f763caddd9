use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, instrument, warn};

use crate::error::TransferError;

pub const DEFAULT_INPUTS_DIR: &str = "/workflow/inputs";
pub const DEFAULT_OUTPUTS_DIR: &str = "/workflow/outputs";
pub const DEFAULT_INPUT_NAME: &str = "sdtm_snapshot_task_input";
pub const DEFAULT_DATASET: &str = "ta";

/// Copies `<snapshot>/<dataset>.sas7bdat` into the job's output directory.
///
/// The snapshot directory is not passed directly: the job runtime writes it
/// to the input-location file `<inputs_dir>/<input_name>`.
#[derive(Debug, Clone)]
pub struct SnapshotCopy {
  pub inputs_dir: PathBuf,
  pub outputs_dir: PathBuf,
  pub input_name: String,
  /// Lower-case SDTM domain, e.g. `ta`.
  pub dataset: String,
}

impl Default for SnapshotCopy {
  fn default() -> Self {
    Self {
      inputs_dir: PathBuf::from(DEFAULT_INPUTS_DIR),
      outputs_dir: PathBuf::from(DEFAULT_OUTPUTS_DIR),
      input_name: DEFAULT_INPUT_NAME.to_string(),
      dataset: DEFAULT_DATASET.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
  Copied { from: PathBuf, to: PathBuf, bytes: u64 },
  /// The dataset is not in the snapshot. Nothing was written.
  NotFound { path: PathBuf },
}

impl SnapshotCopy {
  pub fn new(dataset: impl Into<String>) -> Self {
    Self {
      dataset: dataset.into(),
      ..Self::default()
    }
  }

  pub fn with_inputs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.inputs_dir = dir.into();
    self
  }

  pub fn with_outputs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.outputs_dir = dir.into();
    self
  }

  pub fn with_input_name(mut self, name: impl Into<String>) -> Self {
    self.input_name = name.into();
    self
  }

  fn file_name(&self) -> String {
    format!("{}.sas7bdat", self.dataset)
  }

  /// Read the snapshot directory from the input-location file.
  pub async fn snapshot_dir(&self) -> Result<PathBuf, TransferError> {
    let path = self.inputs_dir.join(&self.input_name);
    let raw = fs::read_to_string(&path)
      .await
      .map_err(|source| TransferError::InputLocation { path, source })?;
    Ok(PathBuf::from(raw.trim()))
  }

  #[instrument(skip(self), fields(dataset = %self.dataset))]
  pub async fn run(&self) -> Result<CopyOutcome, TransferError> {
    let source = self.snapshot_dir().await?.join(self.file_name());

    if !exists(&source).await {
      warn!("File not found: {}", source.display());
      return Ok(CopyOutcome::NotFound { path: source });
    }

    let target = self.outputs_dir.join(self.file_name());
    let copy_err = |e| TransferError::Copy {
      from: source.clone(),
      to: target.clone(),
      source: e,
    };

    fs::create_dir_all(&self.outputs_dir).await.map_err(copy_err)?;
    let bytes = fs::copy(&source, &target).await.map_err(copy_err)?;

    info!(bytes, "Copied {} to {}", source.display(), target.display());
    Ok(CopyOutcome::Copied {
      from: source,
      to: target,
      bytes,
    })
  }
}

async fn exists(path: &Path) -> bool {
  fs::metadata(path).await.is_ok_and(|m| m.is_file())
}
