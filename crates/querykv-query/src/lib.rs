pub mod collect;
mod error;
mod facade;
mod interface;
pub mod predicates;
mod selector;

pub use error::QueryError;
pub use facade::QueryFacade;
pub use interface::{
    EntryStream, Fetch, ObjectStream, QueryInterface, ResultMapper, ResultObjectMaker,
};
pub use predicates::EntryFilter;
pub use querykv_record::{Attributes, Record, RecordError, RecordKey, RecordSet, Value};
pub use selector::{KeySelector, Projection};
