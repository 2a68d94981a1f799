use std::error::Error as StdError;
use std::fmt;

use querykv_record::RecordError;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// An argument was rejected before the repository was touched.
    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Two keys mapped to the same value in a collector that indexes both ways.
    #[error("duplicate value: {0}")]
    DuplicateValue(String),

    #[error("cannot materialize record {key}: {reason}")]
    Materialize { key: String, reason: String },

    #[error("record error: {0}")]
    Record(RecordError),

    #[error("repository error: {0}")]
    Repository(#[source] Box<dyn StdError + Send + Sync>),
}

impl QueryError {
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Wrap a backend failure, keeping it as the error source.
    pub fn repository(e: impl StdError + Send + Sync + 'static) -> Self {
        Self::Repository(Box::new(e))
    }

    /// Object maker failure for the record identified by `key`.
    pub fn materialize(key: &impl fmt::Debug, reason: impl Into<String>) -> Self {
        Self::Materialize {
            key: format!("{key:?}"),
            reason: reason.into(),
        }
    }
}

impl From<RecordError> for QueryError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::DuplicateKey(key) => Self::DuplicateKey(key),
            other => Self::Record(other),
        }
    }
}
