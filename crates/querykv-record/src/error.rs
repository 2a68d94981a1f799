#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("unsupported bson type for attribute `{attribute}`: {element_type}")]
    UnsupportedType {
        attribute: String,
        element_type: String,
    },
}
