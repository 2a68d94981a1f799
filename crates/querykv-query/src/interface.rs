use querykv_record::{Record, RecordKey, RecordSet};
use tracing::trace;

use crate::error::QueryError;
use crate::predicates::{EntryFilter, always_true};
use crate::selector::{KeySelector, Projection};

/// Lazily materialized objects. Items fail individually when the object
/// maker rejects a record.
pub type ObjectStream<'a, R> = Box<dyn Iterator<Item = Result<R, QueryError>> + 'a>;

/// Lazily filtered raw records.
pub type EntryStream<'a, K> = Box<dyn Iterator<Item = Record<K>> + 'a>;

/// Turns the whole key to attribute-map collection of one fetch into `T`.
///
/// Any `FnOnce(RecordSet<K>) -> T` is a mapper.
pub trait ResultMapper<K, T> {
    fn map(self, records: RecordSet<K>) -> T;
}

impl<K, T, F> ResultMapper<K, T> for F
where
    F: FnOnce(RecordSet<K>) -> T,
{
    fn map(self, records: RecordSet<K>) -> T {
        self(records)
    }
}

/// Builds one domain object from one record.
///
/// Must fail explicitly (see [`QueryError::materialize`]) rather than panic
/// when a record lacks what the object needs.
pub trait ResultObjectMaker<K, R> {
    fn make(&self, record: Record<K>) -> Result<R, QueryError>;
}

impl<K, R, F> ResultObjectMaker<K, R> for F
where
    F: Fn(Record<K>) -> Result<R, QueryError>,
{
    fn make(&self, record: Record<K>) -> Result<R, QueryError> {
        self(record)
    }
}

/// The one primitive a repository has to answer.
pub trait Fetch<K: RecordKey> {
    /// Resolve `keys` (every key for the all-keys sentinel), restrict each
    /// record to `attributes` (every attribute when empty), and hand the
    /// assembled set to `mapper`.
    ///
    /// Unknown keys are omitted, never reported as failures.
    fn fetch<T, M>(
        &self,
        keys: &KeySelector<K>,
        attributes: &Projection,
        mapper: M,
    ) -> Result<T, QueryError>
    where
        M: ResultMapper<K, T>;

    /// Side-effect free existence check. Repositories with a cheaper lookup
    /// should override this.
    fn exists(&self, key: &K) -> Result<bool, QueryError> {
        self.fetch(
            &KeySelector::one(key.clone()),
            &Projection::all(),
            |records: RecordSet<K>| records.contains_key(key),
        )
    }
}

/// Query operations derived from [`Fetch`] plus the materialization
/// collaborators.
///
/// Implementors supply the object maker, the inverse key function and the
/// default projection; everything else is provided.
pub trait QueryInterface<K: RecordKey, R>: Fetch<K> {
    fn object_maker(&self) -> &dyn ResultObjectMaker<K, R>;

    /// Recover the key an object was built from. Must satisfy
    /// `object_to_key(make(record)) == record.key`.
    fn object_to_key(&self, object: &R) -> K;

    /// Attributes fetched when materializing objects.
    fn projection_attributes(&self) -> &Projection;

    /// Fetch with a caller-chosen result shape.
    fn query_for_details<T, M>(
        &self,
        keys: &KeySelector<K>,
        attributes: &Projection,
        mapper: M,
    ) -> Result<T, QueryError>
    where
        M: ResultMapper<K, T>,
    {
        attributes.validate()?;
        self.fetch(keys, attributes, mapper)
    }

    fn query_for_records(
        &self,
        keys: &KeySelector<K>,
        attributes: &Projection,
    ) -> Result<RecordSet<K>, QueryError> {
        self.query_for_details(keys, attributes, |records: RecordSet<K>| records)
    }

    /// The object for `key`, or `None` when the repository does not know it.
    fn query_for_object(&self, key: &K) -> Result<Option<R>, QueryError> {
        trace!(?key, "query_for_object");
        self.query_for_object_stream(&KeySelector::one(key.clone()), always_true::<R>)?
            .next()
            .transpose()
    }

    fn query_for_objects<P>(
        &self,
        keys: &KeySelector<K>,
        predicate: P,
    ) -> Result<Vec<R>, QueryError>
    where
        P: Fn(&R) -> bool,
    {
        self.query_for_object_stream(keys, predicate)?.collect()
    }

    /// Materialize records in fetch order and keep objects matching
    /// `predicate`. Nothing is materialized until the stream is pulled.
    fn query_for_object_stream<'a, P>(
        &'a self,
        keys: &KeySelector<K>,
        predicate: P,
    ) -> Result<ObjectStream<'a, R>, QueryError>
    where
        P: Fn(&R) -> bool + 'a,
        K: 'a,
        R: 'a,
    {
        trace!(all = keys.is_all(), "query_for_object_stream");
        let maker = self.object_maker();
        let entries =
            self.query_for_entry_stream(keys, EntryFilter::Any, self.projection_attributes())?;
        Ok(Box::new(
            entries
                .map(move |record| maker.make(record))
                .filter(move |made| match made {
                    Ok(object) => predicate(object),
                    Err(_) => true,
                }),
        ))
    }

    /// Records for which at least one attribute entry satisfies `filter`.
    ///
    /// The filter decides which records survive, not which attributes do:
    /// a surviving record keeps its whole projected attribute map.
    fn query_for_entry_stream<'a>(
        &'a self,
        keys: &KeySelector<K>,
        filter: EntryFilter<'a>,
        attributes: &Projection,
    ) -> Result<EntryStream<'a, K>, QueryError>
    where
        K: 'a,
    {
        let records = self.query_for_records(keys, attributes)?;
        trace!(fetched = records.len(), "query_for_entry_stream");
        Ok(Box::new(
            records
                .into_iter()
                .filter(move |record| filter.matches(record)),
        ))
    }

    /// Key of the first object, across all keys, matching `predicate`.
    fn query_for_key<P>(&self, predicate: P) -> Result<Option<K>, QueryError>
    where
        P: Fn(&R) -> bool,
    {
        let first = self
            .query_for_object_stream(&KeySelector::All, predicate)?
            .next()
            .transpose()?;
        Ok(first.map(|object| self.object_to_key(&object)))
    }

    /// Keys of every object matching `predicate`.
    fn query_for_keys<P>(&self, predicate: P) -> Result<Vec<K>, QueryError>
    where
        P: Fn(&R) -> bool,
    {
        self.query_for_object_stream(&KeySelector::All, predicate)?
            .map(|made| made.map(|object| self.object_to_key(&object)))
            .collect()
    }
}
