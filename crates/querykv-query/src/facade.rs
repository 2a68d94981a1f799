use std::fmt;

use querykv_record::RecordKey;

use crate::error::QueryError;
use crate::interface::{Fetch, QueryInterface, ResultMapper, ResultObjectMaker};
use crate::selector::{KeySelector, Projection};

type KeyFn<K, R> = Box<dyn Fn(&R) -> K + Send + Sync>;
type MakerFn<K, R> = Box<dyn ResultObjectMaker<K, R> + Send + Sync>;

/// A repository bundled with the collaborators that turn its records into
/// `R`. This is the usual way to get [`QueryInterface`] over any
/// [`Fetch`] implementation.
pub struct QueryFacade<Repo, K, R> {
    repository: Repo,
    maker: MakerFn<K, R>,
    key_of: KeyFn<K, R>,
    projection: Projection,
}

impl<Repo, K, R> QueryFacade<Repo, K, R>
where
    Repo: Fetch<K>,
    K: RecordKey,
{
    /// Objects are materialized from every attribute until
    /// [`with_projection`](Self::with_projection) narrows it.
    pub fn new<M, F>(repository: Repo, maker: M, key_of: F) -> Self
    where
        M: ResultObjectMaker<K, R> + Send + Sync + 'static,
        F: Fn(&R) -> K + Send + Sync + 'static,
    {
        Self {
            repository,
            maker: Box::new(maker),
            key_of: Box::new(key_of),
            projection: Projection::all(),
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn repository(&self) -> &Repo {
        &self.repository
    }

    pub fn into_repository(self) -> Repo {
        self.repository
    }
}

impl<Repo, K, R> Fetch<K> for QueryFacade<Repo, K, R>
where
    Repo: Fetch<K>,
    K: RecordKey,
{
    fn fetch<T, M>(
        &self,
        keys: &KeySelector<K>,
        attributes: &Projection,
        mapper: M,
    ) -> Result<T, QueryError>
    where
        M: ResultMapper<K, T>,
    {
        self.repository.fetch(keys, attributes, mapper)
    }

    fn exists(&self, key: &K) -> Result<bool, QueryError> {
        self.repository.exists(key)
    }
}

impl<Repo, K, R> QueryInterface<K, R> for QueryFacade<Repo, K, R>
where
    Repo: Fetch<K>,
    K: RecordKey,
{
    fn object_maker(&self) -> &dyn ResultObjectMaker<K, R> {
        &*self.maker
    }

    fn object_to_key(&self, object: &R) -> K {
        (self.key_of)(object)
    }

    fn projection_attributes(&self) -> &Projection {
        &self.projection
    }
}

impl<Repo: fmt::Debug, K, R> fmt::Debug for QueryFacade<Repo, K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryFacade")
            .field("repository", &self.repository)
            .field("projection", &self.projection)
            .finish_non_exhaustive()
    }
}
