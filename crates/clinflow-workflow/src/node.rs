use std::sync::Arc;

use clinflow_artifact::ArtifactTag;
use clinflow_config::{EnvironmentDef, ValueType};

use crate::error::WorkflowError;

/// A launch parameter declared on a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
  pub name: String,
  pub value_type: ValueType,
}

/// Points at a named output of a previously declared node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutputRef {
  pub node: String,
  pub output: String,
}

impl OutputRef {
  pub fn new(node: impl Into<String>, output: impl Into<String>) -> Self {
    Self {
      node: node.into(),
      output: output.into(),
    }
  }
}

/// Where an input's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingSource {
  Literal(String),
  Parameter(String),
  Output(OutputRef),
}

impl BindingSource {
  pub fn literal(value: impl Into<String>) -> Self {
    Self::Literal(value.into())
  }

  pub fn parameter(name: impl Into<String>) -> Self {
    Self::Parameter(name.into())
  }
}

impl From<&ParameterSpec> for BindingSource {
  fn from(param: &ParameterSpec) -> Self {
    Self::Parameter(param.name.clone())
  }
}

impl From<OutputRef> for BindingSource {
  fn from(output: OutputRef) -> Self {
    Self::Output(output)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBinding {
  pub name: String,
  pub value_type: ValueType,
  pub source: BindingSource,
}

impl InputBinding {
  pub fn new(name: impl Into<String>, value_type: ValueType, source: impl Into<BindingSource>) -> Self {
    Self {
      name: name.into(),
      value_type,
      source: source.into(),
    }
  }
}

/// Artifact classification of an output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutput {
  pub tag: Arc<ArtifactTag>,
  /// File name the output is published under.
  pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSpec {
  pub name: String,
  pub value_type: ValueType,
  pub artifact: Option<ArtifactOutput>,
}

impl OutputSpec {
  pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
    Self {
      name: name.into(),
      value_type,
      artifact: None,
    }
  }

  /// Tag this output as a durable artifact published as `file_name`.
  pub fn tagged(mut self, tag: &Arc<ArtifactTag>, file_name: impl Into<String>) -> Self {
    self.artifact = Some(ArtifactOutput {
      tag: Arc::clone(tag),
      file_name: file_name.into(),
    });
    self
  }
}

/// A declared job node. Never mutated after the builder accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobNode {
  pub name: String,
  pub command: String,
  pub inputs: Vec<InputBinding>,
  pub outputs: Vec<OutputSpec>,
  pub environment: EnvironmentDef,
}

impl JobNode {
  pub fn output(&self, name: &str) -> Option<&OutputSpec> {
    self.outputs.iter().find(|o| o.name == name)
  }

  /// Names of the nodes this node reads outputs from, first reference first.
  pub fn upstream(&self) -> Vec<&str> {
    let mut upstream: Vec<&str> = Vec::new();
    for input in &self.inputs {
      if let BindingSource::Output(output) = &input.source
        && !upstream.contains(&output.node.as_str())
      {
        upstream.push(&output.node);
      }
    }
    upstream
  }
}

/// Returned by the builder for each accepted node; hands out references to
/// the node's outputs for use by later nodes.
#[derive(Debug, Clone)]
pub struct NodeHandle {
  name: String,
  outputs: Vec<String>,
}

impl NodeHandle {
  pub(crate) fn new(node: &JobNode) -> Self {
    Self {
      name: node.name.clone(),
      outputs: node.outputs.iter().map(|o| o.name.clone()).collect(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn outputs(&self) -> &[String] {
    &self.outputs
  }

  /// Reference one of this node's declared outputs.
  pub fn output(&self, name: &str) -> Result<OutputRef, WorkflowError> {
    if self.outputs.iter().any(|o| o == name) {
      Ok(OutputRef::new(&self.name, name))
    } else {
      Err(WorkflowError::UnknownOutput {
        node: self.name.clone(),
        output: name.to_string(),
      })
    }
  }
}
