//! Launching a workflow: binding parameter values to a definition.

use std::collections::BTreeMap;

use clinflow_config::WorkflowDef;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::WorkflowError;
use crate::workflow::WorkflowDefinition;

/// Parameter values and an optional run name for one launch.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
  run_name: Option<String>,
  parameters: BTreeMap<String, String>,
}

/// What gets handed to the orchestrator: the workflow plus its launch values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub run_name: Option<String>,
  pub parameters: BTreeMap<String, String>,
  pub workflow: WorkflowDef,
}

impl Invocation {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_run_name(mut self, name: impl Into<String>) -> Self {
    self.run_name = Some(name.into());
    self
  }

  /// Set a parameter value. Setting the same name again replaces the value.
  pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.parameters.insert(name.into(), value.into());
    self
  }

  /// Check the values against the workflow's declared parameters.
  ///
  /// Every declared parameter needs a value and every value must belong to
  /// a declared parameter.
  pub fn bind(self, workflow: &WorkflowDefinition) -> Result<Submission, WorkflowError> {
    for name in self.parameters.keys() {
      if !workflow.parameters().iter().any(|p| &p.name == name) {
        return Err(WorkflowError::UnknownParameter(name.clone()));
      }
    }

    for param in workflow.parameters() {
      if !self.parameters.contains_key(&param.name) {
        return Err(WorkflowError::MissingParameter(param.name.clone()));
      }
    }

    info!(
      workflow = %workflow.name(),
      run_name = ?self.run_name,
      parameters = self.parameters.len(),
      "bound workflow invocation"
    );

    Ok(Submission {
      run_name: self.run_name,
      parameters: self.parameters,
      workflow: workflow.to_def(),
    })
  }
}
