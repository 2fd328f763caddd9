use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactFileDef;
use crate::environment::EnvironmentDef;
use crate::input::InputDef;
use crate::types::ValueType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobNodeDef {
  /// Node name, unique within the workflow, e.g. "Create ADSL Dataset"
  pub name: String,
  /// Job command, a path relative to the project, e.g. "prod/adam/ADSL.sas"
  pub command: String,
  #[serde(default)]
  pub inputs: Vec<InputDef>,
  #[serde(default)]
  pub outputs: Vec<OutputDef>,
  pub environment: EnvironmentDef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDef {
  pub name: String,
  #[serde(rename = "type")]
  pub value_type: ValueType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub artifact: Option<ArtifactFileDef>,
}
