use clinflow_config::EnvironmentDef;
use serde::{Deserialize, Serialize};

/// Environment names used when declaring the catalog flows.
///
/// Any field left out of a config file keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowDefaults {
  /// Environment the SAS programs run in.
  pub sas_environment: String,
  /// Hardware tier for production flows. `None` leaves it to project defaults.
  pub hardware_tier: Option<String>,
  /// Environment for the SDTM transfer scripts.
  pub transfer_environment: String,
  /// Environment for the SDTM transfer scripts in the development flow.
  pub dev_transfer_environment: String,
  /// Cache version for cached nodes in the development flow.
  pub dev_cache_version: String,
}

impl Default for FlowDefaults {
  fn default() -> Self {
    Self {
      sas_environment: "SAS Analytics Pro".to_string(),
      hardware_tier: Some("Small".to_string()),
      transfer_environment: "GxP R & Python".to_string(),
      dev_transfer_environment: "6.0 Restricted Domino Standard Environment Py3.10 R4.4"
        .to_string(),
      dev_cache_version: "1.0".to_string(),
    }
  }
}

impl FlowDefaults {
  fn with_tier(&self, env: EnvironmentDef) -> EnvironmentDef {
    match &self.hardware_tier {
      Some(tier) => env.with_hardware_tier(tier),
      None => env,
    }
  }

  pub(crate) fn sas(&self) -> EnvironmentDef {
    self.with_tier(EnvironmentDef::new(&self.sas_environment))
  }

  pub(crate) fn transfer(&self) -> EnvironmentDef {
    self.with_tier(EnvironmentDef::new(&self.transfer_environment))
  }

  // The development flow leaves hardware to project defaults.

  pub(crate) fn dev_transfer(&self) -> EnvironmentDef {
    EnvironmentDef::new(&self.dev_transfer_environment).with_cache(&self.dev_cache_version)
  }

  pub(crate) fn dev_sas_cached(&self) -> EnvironmentDef {
    EnvironmentDef::new(&self.sas_environment).with_cache(&self.dev_cache_version)
  }

  pub(crate) fn dev_sas(&self) -> EnvironmentDef {
    EnvironmentDef::new(&self.sas_environment)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_partial_config_keeps_defaults() {
    let defaults: FlowDefaults =
      serde_json::from_str(r#"{"hardware_tier": "Large"}"#).unwrap();

    assert_eq!(defaults.hardware_tier.as_deref(), Some("Large"));
    assert_eq!(defaults.sas_environment, "SAS Analytics Pro");
    assert_eq!(defaults.dev_cache_version, "1.0");
  }

  #[test]
  fn test_null_hardware_tier_is_omitted() {
    let defaults: FlowDefaults = serde_json::from_str(r#"{"hardware_tier": null}"#).unwrap();
    assert!(defaults.sas().hardware_tier.is_none());
  }

  #[test]
  fn test_dev_environments_are_cached() {
    let defaults = FlowDefaults::default();

    assert_eq!(defaults.dev_transfer().cache.unwrap().version, "1.0");
    assert!(defaults.dev_transfer().hardware_tier.is_none());
    assert!(defaults.dev_sas().cache.is_none());
    assert_eq!(defaults.sas().hardware_tier.as_deref(), Some("Small"));
  }
}
