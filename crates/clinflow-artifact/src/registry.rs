use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use clinflow_config::{ArtifactCategory, ArtifactRef};
use thiserror::Error;
use tracing::debug;

/// Names of the tags the clinical flows publish under.
pub mod tags {
  pub const ADAM_DATASETS: &str = "ADaM Datasets";
  pub const QC_ADAM_DATASETS: &str = "QC ADaM Datasets";
  pub const TFL_REPORTS: &str = "TFL Reports";
  pub const QC_TFL_REPORTS: &str = "QC TFL Reports";
}

#[derive(Debug, Error)]
pub enum RegistryError {
  #[error("artifact tag '{name}' is already registered as {existing}, not {requested}")]
  ArtifactCategoryConflict {
    name: String,
    existing: ArtifactCategory,
    requested: ArtifactCategory,
  },
}

/// Stable identity of a tag within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(u32);

impl fmt::Display for ArtifactId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "artifact#{}", self.0)
  }
}

/// A named, categorized grouping label shared by many outputs.
#[derive(Debug, PartialEq, Eq)]
pub struct ArtifactTag {
  id: ArtifactId,
  name: String,
  category: ArtifactCategory,
}

impl ArtifactTag {
  pub fn id(&self) -> ArtifactId {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn category(&self) -> ArtifactCategory {
    self.category
  }

  pub fn to_ref(&self) -> ArtifactRef {
    ArtifactRef {
      name: self.name.clone(),
      category: self.category,
    }
  }
}

/// Owns every artifact tag in the process.
///
/// Tags are handed out as `Arc`s; two outputs carry the same tag exactly when
/// they point at the same allocation.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
  tags: Vec<Arc<ArtifactTag>>,
  by_name: HashMap<String, usize>,
}

impl ArtifactRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Return the tag registered under `name`, creating it on first use.
  ///
  /// Repeated calls with the same name return the same tag. The category
  /// must match the one the tag was created with.
  pub fn get_or_create_tag(
    &mut self,
    name: &str,
    category: ArtifactCategory,
  ) -> Result<Arc<ArtifactTag>, RegistryError> {
    if let Some(&index) = self.by_name.get(name) {
      let tag = &self.tags[index];
      if tag.category != category {
        return Err(RegistryError::ArtifactCategoryConflict {
          name: name.to_string(),
          existing: tag.category,
          requested: category,
        });
      }
      return Ok(Arc::clone(tag));
    }

    let tag = Arc::new(ArtifactTag {
      id: ArtifactId(self.tags.len() as u32),
      name: name.to_string(),
      category,
    });
    debug!(tag = %tag.name, category = %category, id = %tag.id, "registered artifact tag");

    self.by_name.insert(name.to_string(), self.tags.len());
    self.tags.push(Arc::clone(&tag));
    Ok(tag)
  }

  /// Look up a tag without creating it.
  pub fn get(&self, name: &str) -> Option<Arc<ArtifactTag>> {
    self
      .by_name
      .get(name)
      .map(|&index| Arc::clone(&self.tags[index]))
  }

  /// Forget every tag created after the registry held `len` tags.
  ///
  /// Used to back out the tags of a workflow that failed validation. Tags
  /// handed out before the mark are unaffected.
  pub fn truncate(&mut self, len: usize) {
    if len >= self.tags.len() {
      return;
    }
    for tag in self.tags.drain(len..) {
      debug!(tag = %tag.name, id = %tag.id, "dropped artifact tag");
    }
    self.by_name.retain(|_, index| *index < len);
  }

  /// All tags in creation order.
  pub fn tags(&self) -> &[Arc<ArtifactTag>] {
    &self.tags
  }

  pub fn len(&self) -> usize {
    self.tags.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tags.is_empty()
  }
}
