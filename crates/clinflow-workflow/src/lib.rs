//! clinflow Workflow
//!
//! This crate provides the validated workflow representation for clinflow.
//! A [`WorkflowDefinition`] can only be obtained from a [`WorkflowBuilder`],
//! which checks every node against the nodes declared before it.
//!
//! Key differences from `clinflow-config`:
//! - Names are unique and every input reference resolves to an earlier node
//! - Artifact outputs carry shared registry tags instead of names
//! - Entry points, join points and execution stages can be derived
//! - Definitions convert back to config types for submission

mod builder;
mod error;
mod graph;
mod invocation;
mod node;
mod workflow;

pub use builder::WorkflowBuilder;
pub use error::WorkflowError;
pub use graph::Graph;
pub use invocation::{Invocation, Submission};
pub use node::{
  ArtifactOutput, BindingSource, InputBinding, JobNode, NodeHandle, OutputRef, OutputSpec,
  ParameterSpec,
};
pub use workflow::{ArtifactGroup, WorkflowDefinition};
