use std::fs;

use querykv_memory::MemoryRepository;
use querykv_query::{Attributes, QueryError, QueryFacade, Record};
use serde::Serialize;
use tracing::info;

use crate::config::InspectConfig;
use crate::error::Error;

/// A loaded document: its key plus whatever attributes were projected.
/// Attributes stay nested so one named like the key cannot replace it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub key: String,
    pub attributes: Attributes,
}

pub type Dataset = QueryFacade<MemoryRepository<String>, String, Document>;

fn make_document(record: Record<String>) -> Result<Document, QueryError> {
    Ok(Document {
        key: record.key,
        attributes: record.attributes,
    })
}

fn document_key(document: &Document) -> String {
    document.key.clone()
}

/// Load the configured data file into a queryable dataset.
pub fn open(config: &InspectConfig) -> Result<Dataset, Error> {
    let raw = fs::read_to_string(&config.data)?;
    let documents: Vec<bson::Document> = serde_json::from_str(&raw)?;

    let projection = config.repository.projection();
    let repo = MemoryRepository::with_config(config.repository.clone());
    let count = repo.load_documents(documents)?;
    info!(
        count,
        path = %config.data.display(),
        projection = ?projection.names(),
        "dataset loaded"
    );

    Ok(QueryFacade::new(repo, make_document, document_key).with_projection(projection))
}
