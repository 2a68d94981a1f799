use querykv_query::QueryError;
use querykv_record::RecordError;

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("write lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("document #{index} has no usable key at `{path}`")]
    MissingKey { index: usize, path: String },

    #[error("document #{index}: {source}")]
    Document {
        index: usize,
        #[source]
        source: RecordError,
    },
}

impl From<MemoryError> for QueryError {
    fn from(e: MemoryError) -> Self {
        QueryError::repository(e)
    }
}
