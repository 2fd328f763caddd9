//! Input binding types for job node configuration.
//!
//! Every input names where its value comes from: a literal, one of the
//! workflow's launch parameters, or a named output of an earlier node.
//!
//! # Examples
//!
//! ```json
//! [
//!   { "name": "sdtm_snapshot_task_input", "type": {"kind": "string"},
//!     "source": "parameter", "parameter": "sdtm_dataset_snapshot" },
//!   { "name": "adsl_dataset", "type": {"kind": "file", "format": "sas7bdat"},
//!     "source": "output", "node": "Create ADSL Dataset", "output": "adsl_dataset" }
//! ]
//! ```

use serde::{Deserialize, Serialize};

use crate::types::ValueType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDef {
  pub name: String,
  #[serde(rename = "type")]
  pub value_type: ValueType,
  #[serde(flatten)]
  pub source: InputSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum InputSource {
  Literal { value: String },
  Parameter { parameter: String },
  Output { node: String, output: String },
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_output_source_is_flattened() {
    let input = InputDef {
      name: "adsl_dataset".to_string(),
      value_type: ValueType::file("sas7bdat"),
      source: InputSource::Output {
        node: "Create ADSL Dataset".to_string(),
        output: "adsl_dataset".to_string(),
      },
    };

    let json = serde_json::to_value(&input).unwrap();
    assert_eq!(json["source"], "output");
    assert_eq!(json["node"], "Create ADSL Dataset");
    assert_eq!(json["output"], "adsl_dataset");
    assert_eq!(json["type"]["format"], "sas7bdat");

    let parsed: InputDef = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, input);
  }

  #[test]
  fn test_parameter_source_parses() {
    let input: InputDef = serde_json::from_str(
      r#"{"name": "metadata_snapshot", "type": {"kind": "string"},
          "source": "parameter", "parameter": "metadata_snapshot"}"#,
    )
    .unwrap();

    assert_eq!(
      input.source,
      InputSource::Parameter {
        parameter: "metadata_snapshot".to_string()
      }
    );
  }
}
