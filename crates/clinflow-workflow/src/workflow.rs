use std::collections::HashMap;
use std::sync::Arc;

use clinflow_artifact::{ArtifactId, ArtifactTag};
use clinflow_config::{
  ArtifactFileDef, InputDef, InputSource, JobNodeDef, OutputDef, ParameterDef, WorkflowDef,
};

use crate::graph::Graph;
use crate::node::{BindingSource, JobNode, OutputRef, OutputSpec, ParameterSpec};

/// A validated workflow, ready to be handed to the orchestrator.
///
/// Only the builder creates these, so every output reference points at an
/// earlier node and `nodes()` is in a valid execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDefinition {
  name: String,
  parameters: Vec<ParameterSpec>,
  nodes: Vec<JobNode>,
  index: HashMap<String, usize>,
}

/// All outputs published under one artifact tag.
#[derive(Debug, Clone)]
pub struct ArtifactGroup<'a> {
  pub tag: Arc<ArtifactTag>,
  /// `(node, output)` pairs in declaration order.
  pub outputs: Vec<(&'a JobNode, &'a OutputSpec)>,
}

impl WorkflowDefinition {
  pub(crate) fn new(name: String, parameters: Vec<ParameterSpec>, nodes: Vec<JobNode>) -> Self {
    let index = nodes
      .iter()
      .enumerate()
      .map(|(i, n)| (n.name.clone(), i))
      .collect();

    Self {
      name,
      parameters,
      nodes,
      index,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn parameters(&self) -> &[ParameterSpec] {
    &self.parameters
  }

  /// Nodes in declaration order.
  pub fn nodes(&self) -> &[JobNode] {
    &self.nodes
  }

  pub fn node(&self, name: &str) -> Option<&JobNode> {
    self.index.get(name).map(|&i| &self.nodes[i])
  }

  pub(crate) fn position(&self, name: &str) -> Option<usize> {
    self.index.get(name).copied()
  }

  /// The node and output an input reference resolves to.
  pub fn producer(&self, output: &OutputRef) -> Option<(&JobNode, &OutputSpec)> {
    let node = self.node(&output.node)?;
    let spec = node.output(&output.output)?;
    Some((node, spec))
  }

  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Graph {
    Graph::new(self)
  }

  /// Tagged outputs grouped by artifact tag, in order of first appearance.
  pub fn artifact_groups(&self) -> Vec<ArtifactGroup<'_>> {
    let mut groups: Vec<ArtifactGroup<'_>> = Vec::new();
    let mut by_tag: HashMap<ArtifactId, usize> = HashMap::new();

    for node in &self.nodes {
      for output in &node.outputs {
        let Some(artifact) = &output.artifact else {
          continue;
        };

        let index = *by_tag.entry(artifact.tag.id()).or_insert_with(|| {
          groups.push(ArtifactGroup {
            tag: Arc::clone(&artifact.tag),
            outputs: Vec::new(),
          });
          groups.len() - 1
        });
        groups[index].outputs.push((node, output));
      }
    }

    groups
  }

  /// Convert to the serializable configuration form.
  pub fn to_def(&self) -> WorkflowDef {
    WorkflowDef {
      name: self.name.clone(),
      parameters: self
        .parameters
        .iter()
        .map(|p| ParameterDef {
          name: p.name.clone(),
          value_type: p.value_type.clone(),
        })
        .collect(),
      nodes: self.nodes.iter().map(node_to_def).collect(),
    }
  }
}

fn node_to_def(node: &JobNode) -> JobNodeDef {
  JobNodeDef {
    name: node.name.clone(),
    command: node.command.clone(),
    inputs: node
      .inputs
      .iter()
      .map(|input| InputDef {
        name: input.name.clone(),
        value_type: input.value_type.clone(),
        source: match &input.source {
          BindingSource::Literal(value) => InputSource::Literal {
            value: value.clone(),
          },
          BindingSource::Parameter(parameter) => InputSource::Parameter {
            parameter: parameter.clone(),
          },
          BindingSource::Output(output) => InputSource::Output {
            node: output.node.clone(),
            output: output.output.clone(),
          },
        },
      })
      .collect(),
    outputs: node
      .outputs
      .iter()
      .map(|output| OutputDef {
        name: output.name.clone(),
        value_type: output.value_type.clone(),
        artifact: output.artifact.as_ref().map(|a| ArtifactFileDef {
          tag: a.tag.to_ref(),
          file_name: a.file_name.clone(),
        }),
      })
      .collect(),
    environment: node.environment.clone(),
  }
}
