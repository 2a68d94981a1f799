use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::value::{Attributes, Value};

/// Bounds every record key satisfies. Blanket-implemented.
pub trait RecordKey: Clone + Eq + Hash + fmt::Debug {}

impl<K: Clone + Eq + Hash + fmt::Debug> RecordKey for K {}

/// One key paired with its attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<K> {
    pub key: K,
    pub attributes: Attributes,
}

impl<K> Record<K> {
    pub fn new(key: K, attributes: Attributes) -> Self {
        Self { key, attributes }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn into_parts(self) -> (K, Attributes) {
        (self.key, self.attributes)
    }
}

/// Key to attribute-map collection handed to result mappers.
///
/// Keeps records in the order the repository emitted them and refuses to
/// hold the same key twice.
#[derive(Debug, Clone)]
pub struct RecordSet<K> {
    records: Vec<Record<K>>,
    index: HashMap<K, usize>,
}

impl<K> RecordSet<K> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record<K>> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.records.iter().map(|r| &r.key)
    }
}

impl<K: RecordKey> RecordSet<K> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Append a record. Fails if `key` is already present.
    pub fn insert(&mut self, key: K, attributes: Attributes) -> Result<(), RecordError> {
        if self.index.contains_key(&key) {
            return Err(RecordError::DuplicateKey(format!("{key:?}")));
        }
        self.index.insert(key.clone(), self.records.len());
        self.records.push(Record::new(key, attributes));
        Ok(())
    }

    pub fn push(&mut self, record: Record<K>) -> Result<(), RecordError> {
        self.insert(record.key, record.attributes)
    }

    pub fn get(&self, key: &K) -> Option<&Attributes> {
        self.index.get(key).map(|&i| &self.records[i].attributes)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn try_from_records<I>(records: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = Record<K>>,
    {
        let records = records.into_iter();
        let mut set = Self::with_capacity(records.size_hint().0);
        for record in records {
            set.push(record)?;
        }
        Ok(set)
    }
}

impl<K: RecordKey> Default for RecordSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq> PartialEq for RecordSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<K> IntoIterator for RecordSet<K> {
    type Item = Record<K>;
    type IntoIter = std::vec::IntoIter<Record<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a RecordSet<K> {
    type Item = &'a Record<K>;
    type IntoIter = std::slice::Iter<'a, Record<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
