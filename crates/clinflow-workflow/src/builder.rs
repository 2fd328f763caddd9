//! Workflow graph builder.
//!
//! Nodes are added one at a time and validated against everything declared
//! before them. An input can only reference a node that already exists, so
//! declaration order is always a valid topological order and no separate
//! cycle check is needed.

use std::collections::{HashMap, HashSet};

use clinflow_config::{EnvironmentDef, ValueType};
use tracing::debug;

use crate::error::WorkflowError;
use crate::node::{BindingSource, InputBinding, JobNode, NodeHandle, OutputSpec, ParameterSpec};
use crate::workflow::WorkflowDefinition;

pub struct WorkflowBuilder {
  name: String,
  parameters: Vec<ParameterSpec>,
  nodes: Vec<JobNode>,
  /// node name -> index into `nodes`
  node_index: HashMap<String, usize>,
}

impl WorkflowBuilder {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      parameters: Vec::new(),
      nodes: Vec::new(),
      node_index: HashMap::new(),
    }
  }

  /// Register a workflow-level launch parameter.
  pub fn declare_parameter(
    &mut self,
    name: impl Into<String>,
    value_type: ValueType,
  ) -> Result<ParameterSpec, WorkflowError> {
    let name = name.into();
    if self.parameters.iter().any(|p| p.name == name) {
      return Err(WorkflowError::DuplicateParameter(name));
    }

    let param = ParameterSpec { name, value_type };
    self.parameters.push(param.clone());
    Ok(param)
  }

  /// Validate and append a job node.
  ///
  /// On error the builder is left exactly as it was.
  pub fn add_job_node(
    &mut self,
    name: impl Into<String>,
    command: impl Into<String>,
    inputs: Vec<InputBinding>,
    outputs: Vec<OutputSpec>,
    environment: EnvironmentDef,
  ) -> Result<NodeHandle, WorkflowError> {
    let node = JobNode {
      name: name.into(),
      command: command.into(),
      inputs,
      outputs,
      environment,
    };

    self.validate_node(&node)?;

    debug!(
      workflow = %self.name,
      node = %node.name,
      command = %node.command,
      inputs = node.inputs.len(),
      outputs = node.outputs.len(),
      "added job node"
    );

    let handle = NodeHandle::new(&node);
    self.node_index.insert(node.name.clone(), self.nodes.len());
    self.nodes.push(node);
    Ok(handle)
  }

  /// Complete the workflow.
  pub fn finalize(self) -> Result<WorkflowDefinition, WorkflowError> {
    if self.nodes.is_empty() {
      return Err(WorkflowError::EmptyWorkflow(self.name));
    }

    Ok(WorkflowDefinition::new(self.name, self.parameters, self.nodes))
  }

  fn validate_node(&self, node: &JobNode) -> Result<(), WorkflowError> {
    if self.node_index.contains_key(&node.name) {
      return Err(WorkflowError::DuplicateNodeName(node.name.clone()));
    }

    let mut output_names = HashSet::new();
    for output in &node.outputs {
      if !output_names.insert(output.name.as_str()) {
        return Err(WorkflowError::DuplicateOutputName {
          node: node.name.clone(),
          output: output.name.clone(),
        });
      }
    }

    let mut input_names = HashSet::new();
    for input in &node.inputs {
      if !input_names.insert(input.name.as_str()) {
        return Err(WorkflowError::DuplicateInputName {
          node: node.name.clone(),
          input: input.name.clone(),
        });
      }

      if let Some(source_type) = self.source_type(node, input)?
        && source_type != &input.value_type
      {
        return Err(WorkflowError::TypeMismatch {
          node: node.name.clone(),
          input: input.name.clone(),
          declared: input.value_type.clone(),
          source_type: source_type.clone(),
        });
      }
    }

    Ok(())
  }

  /// Resolve the declared type of an input's source. Literals are untyped.
  fn source_type<'a>(
    &'a self,
    node: &JobNode,
    input: &InputBinding,
  ) -> Result<Option<&'a ValueType>, WorkflowError> {
    let unknown = |reference: String| WorkflowError::UnknownReference {
      node: node.name.clone(),
      input: input.name.clone(),
      reference,
    };

    match &input.source {
      BindingSource::Literal(_) => Ok(None),
      BindingSource::Parameter(name) => self
        .parameters
        .iter()
        .find(|p| &p.name == name)
        .map(|p| Some(&p.value_type))
        .ok_or_else(|| unknown(format!("parameter '{}'", name))),
      BindingSource::Output(output) => {
        let producer = self
          .node_index
          .get(&output.node)
          .map(|&index| &self.nodes[index])
          .ok_or_else(|| unknown(format!("node '{}'", output.node)))?;

        producer
          .output(&output.output)
          .map(|o| Some(&o.value_type))
          .ok_or_else(|| {
            unknown(format!(
              "output '{}' of node '{}'",
              output.output, output.node
            ))
          })
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::node::OutputRef;
  use clinflow_artifact::ArtifactRegistry;
  use clinflow_config::ArtifactCategory;

  fn sas() -> EnvironmentDef {
    EnvironmentDef::new("SAS Analytics Pro").with_hardware_tier("Small")
  }

  fn dataset() -> ValueType {
    ValueType::file("sas7bdat")
  }

  #[test]
  fn test_adsl_adae_example() {
    let mut registry = ArtifactRegistry::new();
    let data = registry
      .get_or_create_tag("ADaM Datasets", ArtifactCategory::Data)
      .unwrap();

    let mut builder = WorkflowBuilder::new("example");
    let snapshot = builder
      .declare_parameter("snapshot", ValueType::String)
      .unwrap();

    let a = builder
      .add_job_node(
        "A",
        "ADSL.sas",
        vec![InputBinding::new("snapshot", ValueType::String, &snapshot)],
        vec![OutputSpec::new("adsl", dataset())],
        sas(),
      )
      .unwrap();

    builder
      .add_job_node(
        "B",
        "ADAE.sas",
        vec![
          InputBinding::new("snapshot", ValueType::String, &snapshot),
          InputBinding::new("adsl", dataset(), a.output("adsl").unwrap()),
        ],
        vec![OutputSpec::new("adae", dataset()).tagged(&data, "adae")],
        sas(),
      )
      .unwrap();

    let workflow = builder.finalize().unwrap();
    let names: Vec<&str> = workflow.nodes().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let b = workflow.node("B").unwrap();
    assert_eq!(
      b.inputs[1].source,
      BindingSource::Output(OutputRef::new("A", "adsl"))
    );

    let (producer, output) = workflow.producer(&OutputRef::new("A", "adsl")).unwrap();
    assert_eq!(producer.name, "A");
    assert_eq!(output.name, "adsl");

    let adae = b.output("adae").unwrap();
    let tag = &adae.artifact.as_ref().unwrap().tag;
    assert!(std::sync::Arc::ptr_eq(tag, &data));
  }

  #[test]
  fn test_forward_reference_fails_even_if_added_later() {
    let mut builder = WorkflowBuilder::new("forward");

    let result = builder.add_job_node(
      "B",
      "ADAE.sas",
      vec![InputBinding::new("adsl", dataset(), OutputRef::new("A", "adsl"))],
      vec![],
      sas(),
    );
    assert!(matches!(
      result,
      Err(WorkflowError::UnknownReference { ref node, .. }) if node == "B"
    ));

    builder
      .add_job_node("A", "ADSL.sas", vec![], vec![OutputSpec::new("adsl", dataset())], sas())
      .unwrap();

    // B was never recorded
    let workflow = builder.finalize().unwrap();
    assert_eq!(workflow.nodes().len(), 1);
    assert!(workflow.node("B").is_none());
  }

  #[test]
  fn test_unknown_output_on_existing_node() {
    let mut builder = WorkflowBuilder::new("outputs");
    builder
      .add_job_node("A", "ADSL.sas", vec![], vec![OutputSpec::new("adsl", dataset())], sas())
      .unwrap();

    let result = builder.add_job_node(
      "B",
      "ADAE.sas",
      vec![InputBinding::new("adsl", dataset(), OutputRef::new("A", "missing"))],
      vec![],
      sas(),
    );
    assert!(matches!(result, Err(WorkflowError::UnknownReference { .. })));
  }

  #[test]
  fn test_unknown_parameter_reference() {
    let mut builder = WorkflowBuilder::new("params");

    let result = builder.add_job_node(
      "A",
      "ADSL.sas",
      vec![InputBinding::new(
        "snapshot",
        ValueType::String,
        BindingSource::parameter("sdtm_dataset_snapshot"),
      )],
      vec![],
      sas(),
    );
    assert!(matches!(result, Err(WorkflowError::UnknownReference { .. })));
  }

  #[test]
  fn test_duplicate_node_name_keeps_first() {
    let mut builder = WorkflowBuilder::new("dupes");
    builder
      .add_job_node("A", "ADSL.sas", vec![], vec![OutputSpec::new("adsl", dataset())], sas())
      .unwrap();

    let result = builder.add_job_node("A", "OTHER.sas", vec![], vec![], sas());
    assert_eq!(
      result.unwrap_err(),
      WorkflowError::DuplicateNodeName("A".to_string())
    );

    let workflow = builder.finalize().unwrap();
    let a = workflow.node("A").unwrap();
    assert_eq!(a.command, "ADSL.sas");
    assert!(a.output("adsl").is_some());
  }

  #[test]
  fn test_duplicate_parameter() {
    let mut builder = WorkflowBuilder::new("dupes");
    builder
      .declare_parameter("sdtm_dataset_snapshot", ValueType::String)
      .unwrap();

    let result = builder.declare_parameter("sdtm_dataset_snapshot", ValueType::String);
    assert_eq!(
      result.unwrap_err(),
      WorkflowError::DuplicateParameter("sdtm_dataset_snapshot".to_string())
    );
  }

  #[test]
  fn test_empty_workflow() {
    let mut builder = WorkflowBuilder::new("empty");
    builder
      .declare_parameter("sdtm_dataset_snapshot", ValueType::String)
      .unwrap();

    assert_eq!(
      builder.finalize().unwrap_err(),
      WorkflowError::EmptyWorkflow("empty".to_string())
    );
  }

  #[test]
  fn test_type_mismatch() {
    let mut builder = WorkflowBuilder::new("types");
    let snapshot = builder
      .declare_parameter("snapshot", ValueType::String)
      .unwrap();

    let result = builder.add_job_node(
      "A",
      "ADSL.sas",
      vec![InputBinding::new("snapshot", dataset(), &snapshot)],
      vec![],
      sas(),
    );
    assert!(matches!(result, Err(WorkflowError::TypeMismatch { .. })));
  }

  #[test]
  fn test_duplicate_input_and_output_names() {
    let mut builder = WorkflowBuilder::new("names");
    let snapshot = builder
      .declare_parameter("snapshot", ValueType::String)
      .unwrap();

    let result = builder.add_job_node(
      "A",
      "ADSL.sas",
      vec![
        InputBinding::new("snapshot", ValueType::String, &snapshot),
        InputBinding::new("snapshot", ValueType::String, BindingSource::literal("x")),
      ],
      vec![],
      sas(),
    );
    assert!(matches!(result, Err(WorkflowError::DuplicateInputName { .. })));

    let result = builder.add_job_node(
      "A",
      "ADSL.sas",
      vec![],
      vec![
        OutputSpec::new("adsl", dataset()),
        OutputSpec::new("adsl", dataset()),
      ],
      sas(),
    );
    assert!(matches!(result, Err(WorkflowError::DuplicateOutputName { .. })));
  }

  #[test]
  fn test_literal_inputs_are_untyped() {
    let mut builder = WorkflowBuilder::new("literals");
    builder
      .add_job_node(
        "A",
        "ADSL.sas",
        vec![InputBinding::new(
          "cutoff",
          ValueType::String,
          BindingSource::literal("2024-01-01"),
        )],
        vec![],
        sas(),
      )
      .unwrap();

    assert!(builder.finalize().is_ok());
  }

  #[test]
  fn test_handle_rejects_undeclared_output() {
    let mut builder = WorkflowBuilder::new("handles");
    let a = builder
      .add_job_node("A", "ADSL.sas", vec![], vec![OutputSpec::new("adsl", dataset())], sas())
      .unwrap();

    assert_eq!(a.outputs(), &["adsl".to_string()]);
    assert_eq!(
      a.output("adae"),
      Err(WorkflowError::UnknownOutput {
        node: "A".to_string(),
        output: "adae".to_string(),
      })
    );
    assert_eq!(
      a.output("adae").unwrap_err().to_string(),
      "node 'A' has no output named 'adae'"
    );
  }
}
