use querykv_memory::MemoryError;
use querykv_query::QueryError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("usage: {0}")]
    Usage(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("load error: {0}")]
    Load(#[from] MemoryError),
}
