mod error;
mod record;
mod value;

pub use error::RecordError;
pub use record::{Record, RecordKey, RecordSet};
pub use value::{Attributes, Value, from_document, lookup};
