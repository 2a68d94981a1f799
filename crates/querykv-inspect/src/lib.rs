mod command;
mod config;
mod dataset;
mod error;

pub use command::{Command, run};
pub use config::InspectConfig;
pub use dataset::{Dataset, Document, open};
pub use error::Error;
