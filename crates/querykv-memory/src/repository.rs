use std::fmt;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use imbl::OrdMap;
use querykv_query::{Fetch, KeySelector, Projection, QueryError, ResultMapper};
use querykv_record::{Attributes, RecordKey, RecordSet, Value, from_document, lookup};
use tracing::{debug, warn};

use crate::config::RepositoryConfig;
use crate::error::MemoryError;

type Records<K> = OrdMap<K, Attributes>;

/// Key types that can be read out of a loaded document.
pub trait DocumentKey: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

/// Integer keys are rendered as text so numeric `_id`s load too.
impl DocumentKey for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Int(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl DocumentKey for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

/// Snapshot-read, single-writer record map.
///
/// Every fetch works on one snapshot, so a concurrent write never shows up
/// halfway through a query. Snapshots are cheap thanks to imbl structural
/// sharing.
pub struct MemoryRepository<K: Ord + Clone> {
    records: ArcSwap<Records<K>>,
    write_lock: Mutex<()>,
    config: RepositoryConfig,
}

impl<K: RecordKey + Ord> MemoryRepository<K> {
    pub fn new() -> Self {
        Self::with_config(RepositoryConfig::default())
    }

    pub fn with_config(config: RepositoryConfig) -> Self {
        Self {
            records: ArcSwap::from_pointee(OrdMap::new()),
            write_lock: Mutex::new(()),
            config,
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.load().is_empty()
    }

    /// Insert or replace a record, returning the previous attributes.
    pub fn insert(&self, key: K, attributes: Attributes) -> Result<Option<Attributes>, MemoryError> {
        self.write(|data| data.insert(key, attributes))
    }

    pub fn remove(&self, key: &K) -> Result<Option<Attributes>, MemoryError> {
        self.write(|data| data.remove(key))
    }

    pub fn clear(&self) -> Result<(), MemoryError> {
        self.write(|data| data.clear())
    }

    fn snapshot(&self) -> Arc<Records<K>> {
        self.records.load_full()
    }

    /// Apply `f` to a copy of the current map and publish the result.
    fn write<T>(&self, f: impl FnOnce(&mut Records<K>) -> T) -> Result<T, MemoryError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| MemoryError::LockPoisoned(e.to_string()))?;
        let mut data = (**self.records.load()).clone();
        let out = f(&mut data);
        self.records.store(Arc::new(data));
        Ok(out)
    }
}

impl<K: RecordKey + Ord + DocumentKey> MemoryRepository<K> {
    /// Load documents, reading each key from the configured `pk_path`.
    ///
    /// A top-level key attribute is dropped from the stored attributes.
    /// All documents are converted before any is published, so a bad
    /// document leaves the repository untouched.
    pub fn load_documents<I>(&self, documents: I) -> Result<usize, MemoryError>
    where
        I: IntoIterator<Item = bson::Document>,
    {
        let pk_path = self.config.pk_path.as_str();
        let mut loaded = Vec::new();
        for (index, doc) in documents.into_iter().enumerate() {
            let mut attributes =
                from_document(doc).map_err(|source| MemoryError::Document { index, source })?;
            let key = lookup(&attributes, pk_path)
                .and_then(K::from_value)
                .ok_or_else(|| MemoryError::MissingKey {
                    index,
                    path: pk_path.to_string(),
                })?;
            if !pk_path.contains('.') {
                attributes.remove(pk_path);
            }
            loaded.push((key, attributes));
        }

        let count = loaded.len();
        self.write(|data| {
            for (key, attributes) in loaded {
                if data.insert(key.clone(), attributes).is_some() {
                    warn!(?key, "document replaces existing record");
                }
            }
        })?;
        debug!(count, total = self.len(), "documents loaded");
        Ok(count)
    }
}

impl<K: RecordKey + Ord> Default for MemoryRepository<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RecordKey + Ord> Fetch<K> for MemoryRepository<K> {
    /// All-keys fetches emit in key order. Explicit selections emit in
    /// selector order with unknown keys left out.
    fn fetch<T, M>(
        &self,
        keys: &KeySelector<K>,
        attributes: &Projection,
        mapper: M,
    ) -> Result<T, QueryError>
    where
        M: ResultMapper<K, T>,
    {
        let snapshot = self.snapshot();
        let records = match keys.explicit() {
            None => {
                let mut set = RecordSet::with_capacity(snapshot.len());
                for (key, attrs) in snapshot.iter() {
                    set.insert(key.clone(), attributes.apply(attrs))?;
                }
                set
            }
            Some(wanted) => {
                let mut set = RecordSet::with_capacity(wanted.len());
                for key in wanted {
                    if let Some(attrs) = snapshot.get(key) {
                        set.insert(key.clone(), attributes.apply(attrs))?;
                    }
                }
                set
            }
        };
        debug!(
            all = keys.is_all(),
            projection = attributes.len(),
            records = records.len(),
            "fetch served"
        );
        Ok(mapper.map(records))
    }

    fn exists(&self, key: &K) -> Result<bool, QueryError> {
        Ok(self.snapshot().contains_key(key))
    }
}

impl<K: Ord + Clone> fmt::Debug for MemoryRepository<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("records", &self.records.load().len())
            .field("config", &self.config)
            .finish()
    }
}
