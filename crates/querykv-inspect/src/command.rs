use std::collections::BTreeMap;

use querykv_query::collect::{entries_to_map, entry_stream};
use querykv_query::predicates::attribute_equals;
use querykv_query::{
    EntryFilter, Fetch, KeySelector, Projection, QueryInterface, Record, RecordSet, Value,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::split_list;
use crate::dataset::{Dataset, Document};
use crate::error::Error;

pub const USAGE: &str = "querykv-inspect <exists KEY | get KEY | keys ATTR=VALUE | entries ATTR=VALUE [ATTR,...] | all>";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Exists(String),
    Get(String),
    /// Keys of documents whose materialized attribute equals `value`. Only
    /// attributes in the default projection are visible here.
    Keys { attribute: String, value: Value },
    /// Records with at least one attribute equal to `value` under `attribute`,
    /// restricted to `projection`.
    Entries {
        attribute: String,
        value: Value,
        projection: Projection,
    },
    All,
}

impl Command {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, Error> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        match args.as_slice() {
            ["exists", key] => Ok(Command::Exists(key.to_string())),
            ["get", key] => Ok(Command::Get(key.to_string())),
            ["keys", condition] => {
                let (attribute, value) = parse_condition(condition)?;
                Ok(Command::Keys { attribute, value })
            }
            ["entries", condition, rest @ ..] if rest.len() <= 1 => {
                let (attribute, value) = parse_condition(condition)?;
                let projection = rest
                    .first()
                    .map(|names| Projection::of(split_list(names)))
                    .unwrap_or_default();
                Ok(Command::Entries {
                    attribute,
                    value,
                    projection,
                })
            }
            ["all"] => Ok(Command::All),
            _ => Err(Error::Usage(USAGE.to_string())),
        }
    }
}

fn parse_condition(condition: &str) -> Result<(String, Value), Error> {
    let (attribute, raw) = condition
        .split_once('=')
        .ok_or_else(|| Error::Usage(format!("expected ATTR=VALUE, got `{condition}`")))?;
    let attribute = attribute.trim();
    if attribute.is_empty() {
        return Err(Error::Usage(format!("missing attribute in `{condition}`")));
    }
    Ok((attribute.to_string(), parse_value(raw)))
}

/// JSON when it parses, plain text otherwise.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn run(dataset: &Dataset, command: &Command) -> Result<serde_json::Value, Error> {
    debug!(?command, "running");
    let output = match command {
        Command::Exists(key) => json!({ "key": key, "exists": dataset.exists(key)? }),
        Command::Get(key) => serde_json::to_value(dataset.query_for_object(key)?)?,
        Command::Keys { attribute, value } => {
            if !dataset.projection_attributes().contains(attribute) {
                warn!(%attribute, "attribute is outside the default projection; nothing can match");
            }
            let keys = dataset
                .query_for_keys(|doc: &Document| doc.attributes.get(attribute) == Some(value))?;
            serde_json::to_value(keys)?
        }
        Command::Entries {
            attribute,
            value,
            projection,
        } => {
            let filter = EntryFilter::matching(attribute_equals(attribute.clone(), value.clone()));
            let records: Vec<Record<String>> = dataset
                .query_for_entry_stream(&KeySelector::All, filter, projection)?
                .collect();
            serde_json::to_value(records)?
        }
        Command::All => {
            let documents = dataset.query_for_details(
                &KeySelector::All,
                dataset.projection_attributes(),
                |records: RecordSet<String>| {
                    entries_to_map::<BTreeMap<_, _>, _, _, _>(entry_stream(records))
                },
            )??;
            serde_json::to_value(documents)?
        }
    };
    Ok(output)
}
