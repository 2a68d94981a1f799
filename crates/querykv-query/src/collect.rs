//! Entry helpers and map collectors for custom result mappers.

use std::collections::hash_map;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry as IndexEntry;
use querykv_record::{Attributes, Record, RecordKey, RecordSet};

use crate::error::QueryError;

pub fn entry<K, V>(key: K, value: V) -> (K, V) {
    (key, value)
}

pub fn key_stream<K>(records: &RecordSet<K>) -> impl Iterator<Item = &K> {
    records.keys()
}

/// Flatten a record set into owned `(key, attributes)` entries.
pub fn entry_stream<K>(records: RecordSet<K>) -> impl Iterator<Item = (K, Attributes)> {
    records.into_iter().map(Record::into_parts)
}

/// A map that refuses to overwrite.
pub trait EntryMap<K, V>: Default {
    fn try_insert_entry(&mut self, key: K, value: V) -> Result<(), QueryError>;
}

impl<K: RecordKey, V> EntryMap<K, V> for HashMap<K, V> {
    fn try_insert_entry(&mut self, key: K, value: V) -> Result<(), QueryError> {
        match self.entry(key) {
            hash_map::Entry::Occupied(e) => Err(duplicate(e.key())),
            hash_map::Entry::Vacant(e) => {
                e.insert(value);
                Ok(())
            }
        }
    }
}

impl<K: Ord + fmt::Debug, V> EntryMap<K, V> for BTreeMap<K, V> {
    fn try_insert_entry(&mut self, key: K, value: V) -> Result<(), QueryError> {
        if self.contains_key(&key) {
            return Err(duplicate(&key));
        }
        self.insert(key, value);
        Ok(())
    }
}

/// Keeps entries in arrival order.
impl<K: RecordKey, V> EntryMap<K, V> for IndexMap<K, V> {
    fn try_insert_entry(&mut self, key: K, value: V) -> Result<(), QueryError> {
        match self.entry(key) {
            IndexEntry::Occupied(e) => Err(duplicate(e.key())),
            IndexEntry::Vacant(e) => {
                e.insert(value);
                Ok(())
            }
        }
    }
}

impl<K: RecordKey> EntryMap<K, Attributes> for RecordSet<K> {
    fn try_insert_entry(&mut self, key: K, value: Attributes) -> Result<(), QueryError> {
        Ok(self.insert(key, value)?)
    }
}

/// A map that is also indexed by value. Keys and values are each unique.
#[derive(Debug, Clone)]
pub struct BiMap<K, V> {
    forward: HashMap<K, V>,
    backward: HashMap<V, K>,
}

impl<K, V> Default for BiMap<K, V> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }
}

impl<K: RecordKey, V: RecordKey> BiMap<K, V> {
    pub fn get(&self, key: &K) -> Option<&V> {
        self.forward.get(key)
    }

    pub fn get_by_value(&self, value: &V) -> Option<&K> {
        self.backward.get(value)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl<K: RecordKey, V: RecordKey> EntryMap<K, V> for BiMap<K, V> {
    fn try_insert_entry(&mut self, key: K, value: V) -> Result<(), QueryError> {
        if self.forward.contains_key(&key) {
            return Err(duplicate(&key));
        }
        if self.backward.contains_key(&value) {
            return Err(QueryError::DuplicateValue(format!("{value:?}")));
        }
        self.backward.insert(value.clone(), key.clone());
        self.forward.insert(key, value);
        Ok(())
    }
}

/// Collect entries into `M`, failing on the first repeated key.
pub fn entries_to_map<M, K, V, I>(entries: I) -> Result<M, QueryError>
where
    M: EntryMap<K, V>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut map = M::default();
    for (key, value) in entries {
        map.try_insert_entry(key, value)?;
    }
    Ok(map)
}

pub fn entries_to_ordered_map<K, V, I>(entries: I) -> Result<IndexMap<K, V>, QueryError>
where
    K: RecordKey,
    I: IntoIterator<Item = (K, V)>,
{
    entries_to_map(entries)
}

/// Like [`entries_to_map`], but a repeated value fails too.
pub fn entries_to_bimap<K, V, I>(entries: I) -> Result<BiMap<K, V>, QueryError>
where
    K: RecordKey,
    V: RecordKey,
    I: IntoIterator<Item = (K, V)>,
{
    entries_to_map(entries)
}

pub fn map_entry<K1, V1, K2, V2>(
    key_fn: impl Fn(K1) -> K2,
    value_fn: impl Fn(V1) -> V2,
) -> impl Fn((K1, V1)) -> (K2, V2) {
    move |(k, v)| (key_fn(k), value_fn(v))
}

pub fn map_key<K1, K2, V>(key_fn: impl Fn(K1) -> K2) -> impl Fn((K1, V)) -> (K2, V) {
    move |(k, v)| (key_fn(k), v)
}

pub fn map_value<K, V1, V2>(value_fn: impl Fn(V1) -> V2) -> impl Fn((K, V1)) -> (K, V2) {
    move |(k, v)| (k, value_fn(v))
}

fn duplicate(key: &impl fmt::Debug) -> QueryError {
    QueryError::DuplicateKey(format!("{key:?}"))
}
