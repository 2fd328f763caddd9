use thiserror::Error;

/// Errors that can occur during workflow resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// Node or parameter validation failed.
  #[error("invalid workflow: {0}")]
  Workflow(#[from] clinflow_workflow::WorkflowError),

  /// An artifact tag clashes with one already registered.
  #[error("invalid artifact tag: {0}")]
  Artifact(#[from] clinflow_artifact::RegistryError),
}
