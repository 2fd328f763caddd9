use serde::{Deserialize, Serialize};

use crate::node::JobNodeDef;
use crate::types::ValueType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDef {
  pub name: String,
  #[serde(default)]
  pub parameters: Vec<ParameterDef>,
  pub nodes: Vec<JobNodeDef>,
}

/// A launch parameter of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDef {
  pub name: String,
  #[serde(rename = "type")]
  pub value_type: ValueType,
}
