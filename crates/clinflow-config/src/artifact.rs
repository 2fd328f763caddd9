use std::fmt;

use serde::{Deserialize, Serialize};

/// Category the platform files an artifact under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCategory {
  Data,
  Model,
  Report,
}

impl fmt::Display for ArtifactCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Data => "data",
      Self::Model => "model",
      Self::Report => "report",
    };
    f.write_str(s)
  }
}

/// Reference to an artifact tag by name and category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
  /// Tag name, e.g. "ADaM Datasets"
  pub name: String,
  pub category: ArtifactCategory,
}

/// Marks an output as a published artifact file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFileDef {
  /// Tag grouping this file with related outputs.
  pub tag: ArtifactRef,

  /// File name the platform publishes the output under, e.g. "adsl"
  pub file_name: String,
}
