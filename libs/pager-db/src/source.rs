//! The data-source capability consumed by the pager.
//!
//! A source addresses fields through its own key type (`Key`): a column enum
//! for SQL, an accessor for in-memory data. Field names are mapped to keys once
//! per request via [`QueryableSource::resolve`].

use async_trait::async_trait;
use pager_core::{Filter, SortDirection};

#[async_trait]
pub trait QueryableSource: Send + Sync {
    type Record: Send;
    type Key: Clone + Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;
    type Query: OrderedQuery<Record = Self::Record, Key = Self::Key, Error = Self::Error>;

    /// Map a field path (possibly dotted) to a source key. `None` when the
    /// record type does not expose it.
    fn resolve(&self, path: &str) -> Option<Self::Key>;

    /// Number of records matching `filter`.
    async fn count(&self, filter: &Filter<Self::Key>) -> Result<u64, Self::Error>;

    /// Handle over all records matching `filter`, not yet materialized.
    fn filter(&self, filter: &Filter<Self::Key>) -> Self::Query;
}

/// A filtered, composable, not yet materialized query.
#[async_trait]
pub trait OrderedQuery: Sized + Send {
    type Record: Send;
    type Key: Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replace any existing ordering with `key` as the primary sort key.
    fn order_by(self, key: &Self::Key, direction: SortDirection) -> Self;

    /// Append a tie-break key after the existing ones.
    fn then_by(self, key: &Self::Key, direction: SortDirection) -> Self;

    /// Materialize exactly the requested window.
    async fn skip_take(self, skip: u64, take: u64) -> Result<Vec<Self::Record>, Self::Error>;
}
