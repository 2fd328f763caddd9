use serde::{Deserialize, Serialize};

/// Execution environment requested for a job node.
///
/// The platform resolves image and hardware tier names; they are opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDef {
  /// Compute environment name, e.g. "SAS Analytics Pro"
  pub image: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hardware_tier: Option<String>,

  /// Present when result caching is enabled for the node.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cache: Option<CacheSettings>,

  /// Let the platform fill omitted settings from project defaults.
  #[serde(default = "default_true")]
  pub use_project_defaults_for_omitted: bool,
}

fn default_true() -> bool {
  true
}

impl EnvironmentDef {
  pub fn new(image: impl Into<String>) -> Self {
    Self {
      image: image.into(),
      hardware_tier: None,
      cache: None,
      use_project_defaults_for_omitted: true,
    }
  }

  pub fn with_hardware_tier(mut self, tier: impl Into<String>) -> Self {
    self.hardware_tier = Some(tier.into());
    self
  }

  pub fn with_cache(mut self, version: impl Into<String>) -> Self {
    self.cache = Some(CacheSettings {
      version: version.into(),
    });
    self
  }
}

/// Cache settings. Bumping `version` invalidates cached results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
  pub version: String,
}
