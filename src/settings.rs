use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clinflow_flows::FlowDefaults;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.json";

/// Contents of `config.json` in the data directory. Every section is
/// optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
  #[serde(default)]
  pub flows: FlowDefaults,
}

impl Settings {
  pub fn path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
  }

  /// Load settings from the data directory, or defaults when there is no
  /// config file.
  pub fn load(data_dir: &Path) -> Result<Self> {
    let path = Self::path(data_dir);
    let content = match std::fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
      Err(e) => {
        return Err(e).with_context(|| format!("failed to read config: {}", path.display()));
      }
    };

    serde_json::from_str(&content)
      .with_context(|| format!("failed to parse config: {}", path.display()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(Settings::load(dir.path()).unwrap(), Settings::default());
  }

  #[test]
  fn test_load_overrides() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
      Settings::path(dir.path()),
      r#"{"flows": {"hardware_tier": "Medium"}}"#,
    )
    .unwrap();

    let settings = Settings::load(dir.path()).unwrap();
    assert_eq!(settings.flows.hardware_tier.as_deref(), Some("Medium"));
    assert_eq!(settings.flows.sas_environment, "SAS Analytics Pro");
  }

  #[test]
  fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(Settings::path(dir.path()), "{").unwrap();
    assert!(Settings::load(dir.path()).is_err());
  }
}
