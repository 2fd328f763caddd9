//! clinflow Config
//!
//! This crate contains the serializable workflow configuration types for clinflow.
//! These types describe a workflow exactly as it is handed to the orchestration
//! platform: parameters, job nodes, their input bindings, output declarations
//! and execution environments.
//!
//! Configuration can be produced by:
//! - The flow catalog (workflows declared in Rust through the graph builder)
//! - JSON files written by hand (`clinflow validate workflow.json`)
//!
//! None of these types are validated on their own. The `clinflow-workflow`
//! builder checks names and references and produces a validated definition,
//! which converts back into these types for emission.

mod artifact;
mod environment;
mod input;
mod node;
mod types;
mod workflow;

pub use artifact::{ArtifactCategory, ArtifactFileDef, ArtifactRef};
pub use environment::{CacheSettings, EnvironmentDef};
pub use input::{InputDef, InputSource};
pub use node::{JobNodeDef, OutputDef};
pub use types::ValueType;
pub use workflow::{ParameterDef, WorkflowDef};
