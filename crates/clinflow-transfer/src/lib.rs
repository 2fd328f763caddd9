//! clinflow Transfer
//!
//! File relocation utilities that run inside workflow jobs:
//!
//! - [`SnapshotCopy`] moves one SDTM dataset out of a mounted snapshot into
//!   the job's output directory. A missing dataset is logged and skipped.
//! - [`download_blobs`] pulls published blobs (by default the six ADaM
//!   datasets) into a local directory through the artifact [`Store`]s.
//!
//! [`Store`]: clinflow_artifact::Store

mod blobs;
mod error;
mod snapshot;

pub use blobs::{BlobLocation, adam_blobs, download_blobs, load_manifest};
pub use error::TransferError;
pub use snapshot::{
  CopyOutcome, DEFAULT_DATASET, DEFAULT_INPUT_NAME, DEFAULT_INPUTS_DIR, DEFAULT_OUTPUTS_DIR,
  SnapshotCopy,
};
