use std::collections::HashSet;

use crate::WorkflowDefinition;

/// Graph structure for traversal and analysis.
///
/// Edges come from output -> input bindings. Node lists follow declaration
/// order.
#[derive(Debug, Clone)]
pub struct Graph {
  /// Node names in declaration order.
  order: Vec<String>,
  /// Adjacency list by node position: downstream node names.
  adjacency: Vec<Vec<String>>,
  /// Reverse adjacency by node position: upstream node names.
  reverse_adjacency: Vec<Vec<String>>,
  /// Nodes with no incoming edges.
  entry_points: Vec<String>,
  /// Nodes reading from more than one upstream node.
  join_points: HashSet<String>,
  /// Dependency depth per node position; entry points are 0.
  depth: Vec<usize>,
}

impl Graph {
  /// Build a graph from a validated workflow.
  pub fn new(workflow: &WorkflowDefinition) -> Self {
    let nodes = workflow.nodes();
    let mut adjacency: Vec<Vec<String>> = vec![Vec::new(); nodes.len()];
    let mut reverse_adjacency: Vec<Vec<String>> = vec![Vec::new(); nodes.len()];
    let mut depth = vec![0usize; nodes.len()];

    // Declaration order is topological, so upstream depths are final
    // by the time a node is visited.
    for (position, node) in nodes.iter().enumerate() {
      for upstream in node.upstream() {
        let Some(from) = workflow.position(upstream) else {
          continue;
        };
        adjacency[from].push(node.name.clone());
        reverse_adjacency[position].push(upstream.to_string());
        depth[position] = depth[position].max(depth[from] + 1);
      }
    }

    let entry_points = nodes
      .iter()
      .enumerate()
      .filter(|(i, _)| reverse_adjacency[*i].is_empty())
      .map(|(_, n)| n.name.clone())
      .collect();

    let join_points = nodes
      .iter()
      .enumerate()
      .filter(|(i, _)| reverse_adjacency[*i].len() > 1)
      .map(|(_, n)| n.name.clone())
      .collect();

    Self {
      order: nodes.iter().map(|n| n.name.clone()).collect(),
      adjacency,
      reverse_adjacency,
      entry_points,
      join_points,
      depth,
    }
  }

  fn position(&self, node: &str) -> Option<usize> {
    self.order.iter().position(|n| n == node)
  }

  /// Get entry points (nodes with no incoming edges).
  pub fn entry_points(&self) -> &[String] {
    &self.entry_points
  }

  /// Get downstream nodes for a given node.
  pub fn downstream(&self, node: &str) -> &[String] {
    self
      .position(node)
      .map(|i| self.adjacency[i].as_slice())
      .unwrap_or(&[])
  }

  /// Get upstream nodes for a given node.
  pub fn upstream(&self, node: &str) -> &[String] {
    self
      .position(node)
      .map(|i| self.reverse_adjacency[i].as_slice())
      .unwrap_or(&[])
  }

  /// Check if a node reads from more than one upstream node.
  pub fn is_join_point(&self, node: &str) -> bool {
    self.join_points.contains(node)
  }

  /// Get all join points.
  pub fn join_points(&self) -> &HashSet<String> {
    &self.join_points
  }

  /// Group nodes by dependency depth.
  ///
  /// Every node in stage `n` depends only on nodes in earlier stages, so an
  /// orchestrator may run each stage's nodes side by side.
  pub fn stages(&self) -> Vec<Vec<String>> {
    let Some(&max) = self.depth.iter().max() else {
      return Vec::new();
    };

    let mut stages = vec![Vec::new(); max + 1];
    for (i, name) in self.order.iter().enumerate() {
      stages[self.depth[i]].push(name.clone());
    }
    stages
  }
}
