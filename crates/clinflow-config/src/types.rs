use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a parameter, input or output.
///
/// Files carry the format extension the job reads or writes, e.g.
/// `sas7bdat` for datasets and `pdf` for reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueType {
  String,
  File { format: String },
}

impl ValueType {
  pub fn file(format: impl Into<String>) -> Self {
    Self::File {
      format: format.into(),
    }
  }
}

impl fmt::Display for ValueType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::String => f.write_str("string"),
      Self::File { format } => write!(f, "file<{}>", format),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_value_type_serializes_with_kind_tag() {
    let json = serde_json::to_value(ValueType::file("sas7bdat")).unwrap();
    assert_eq!(json, serde_json::json!({"kind": "file", "format": "sas7bdat"}));

    let json = serde_json::to_value(ValueType::String).unwrap();
    assert_eq!(json, serde_json::json!({"kind": "string"}));
  }

  #[test]
  fn test_value_type_display() {
    assert_eq!(ValueType::String.to_string(), "string");
    assert_eq!(ValueType::file("pdf").to_string(), "file<pdf>");
  }
}
