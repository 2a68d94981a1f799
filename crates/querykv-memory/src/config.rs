use querykv_query::Projection;
use serde::{Deserialize, Serialize};

/// Options for a [`MemoryRepository`](crate::MemoryRepository). All fields
/// fall back to defaults when missing from a config document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Attribute path holding each document's key. Defaults to `"_id"`.
    #[serde(default = "default_pk_path")]
    pub pk_path: String,
    /// Default projection for object queries. Empty means every attribute.
    #[serde(default)]
    pub projection: Vec<String>,
}

fn default_pk_path() -> String {
    "_id".to_string()
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            pk_path: default_pk_path(),
            projection: Vec::new(),
        }
    }
}

impl RepositoryConfig {
    pub fn projection(&self) -> Projection {
        Projection::of(self.projection.iter().cloned())
    }
}
