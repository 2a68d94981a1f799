use std::path::PathBuf;

use querykv_memory::RepositoryConfig;

use crate::error::Error;

#[derive(Debug, Clone)]
pub struct InspectConfig {
    /// JSON file holding an array of documents.
    pub data: PathBuf,
    pub repository: RepositoryConfig,
}

impl InspectConfig {
    /// Read `QUERYKV_DATA`, `QUERYKV_PK_PATH` and `QUERYKV_PROJECTION`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let data = var("QUERYKV_DATA").ok_or(Error::MissingEnv("QUERYKV_DATA"))?;

        let mut repository = RepositoryConfig::default();
        if let Some(pk_path) = var("QUERYKV_PK_PATH").filter(|s| !s.is_empty()) {
            repository.pk_path = pk_path;
        }
        if let Some(projection) = var("QUERYKV_PROJECTION") {
            repository.projection = split_list(&projection);
        }

        Ok(Self {
            data: PathBuf::from(data),
            repository,
        })
    }
}

/// Comma separated names, blanks dropped.
pub(crate) fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
        .collect()
}
