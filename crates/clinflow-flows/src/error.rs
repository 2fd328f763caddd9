use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("unknown flow '{0}'")]
  UnknownFlow(String),

  #[error("no {0} dataset was declared before it was needed")]
  MissingDataset(String),

  #[error(transparent)]
  Workflow(#[from] clinflow_workflow::WorkflowError),

  #[error(transparent)]
  Artifact(#[from] clinflow_artifact::RegistryError),
}
