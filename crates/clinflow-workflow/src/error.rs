use clinflow_config::ValueType;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
  #[error("parameter '{0}' is already declared")]
  DuplicateParameter(String),

  #[error("node name '{0}' is already used")]
  DuplicateNodeName(String),

  #[error("node '{node}' declares input '{input}' more than once")]
  DuplicateInputName { node: String, input: String },

  #[error("node '{node}' declares output '{output}' more than once")]
  DuplicateOutputName { node: String, output: String },

  /// An input names a parameter, node or output that has not been declared
  /// (yet). References may only point backwards in declaration order.
  #[error("node '{node}' input '{input}' references unknown {reference}")]
  UnknownReference {
    node: String,
    input: String,
    reference: String,
  },

  #[error("node '{node}' input '{input}' is declared as {declared} but its source is {source_type}")]
  TypeMismatch {
    node: String,
    input: String,
    declared: ValueType,
    source_type: ValueType,
  },

  #[error("workflow '{0}' has no job nodes")]
  EmptyWorkflow(String),

  #[error("node '{node}' has no output named '{output}'")]
  UnknownOutput { node: String, output: String },

  #[error("missing value for parameter '{0}'")]
  MissingParameter(String),

  #[error("workflow has no parameter named '{0}'")]
  UnknownParameter(String),
}
