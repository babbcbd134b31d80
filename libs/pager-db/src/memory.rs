//! In-process data source over a shared `Vec`.
//!
//! Insertion order is the base order: sorting is stable, so rows that tie on
//! every sort key keep the order they were inserted in.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use pager_core::{Filter, SortDirection, Value};
use parking_lot::RwLock;

use crate::fields::{FieldAccessor, FieldMap};
use crate::source::{OrderedQuery, QueryableSource};

/// Records that can flag themselves deleted.
pub trait SoftDelete {
    fn mark_deleted(&mut self);
}

pub struct MemorySource<R> {
    rows: Arc<RwLock<Vec<R>>>,
    fields: Arc<FieldMap<R>>,
}

impl<R> Clone for MemorySource<R> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            fields: self.fields.clone(),
        }
    }
}

impl<R> MemorySource<R> {
    pub fn new(fields: FieldMap<R>) -> Self {
        Self::with_rows(fields, Vec::new())
    }

    pub fn with_rows(fields: FieldMap<R>, rows: impl IntoIterator<Item = R>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows.into_iter().collect())),
            fields: Arc::new(fields),
        }
    }

    pub fn fields(&self) -> &FieldMap<R> {
        &self.fields
    }

    pub fn insert(&self, record: R) {
        self.rows.write().push(record);
    }

    /// Apply `update` to every record matching `pred`; returns how many.
    pub fn update_where(
        &self,
        pred: impl Fn(&R) -> bool,
        mut update: impl FnMut(&mut R),
    ) -> usize {
        let mut rows = self.rows.write();
        let mut touched = 0;
        for row in rows.iter_mut().filter(|r| pred(r)) {
            update(row);
            touched += 1;
        }
        touched
    }

    pub fn soft_delete_where(&self, pred: impl Fn(&R) -> bool) -> usize
    where
        R: SoftDelete,
    {
        self.update_where(pred, R::mark_deleted)
    }

    /// Number of stored records, deleted ones included.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    fn count_matching(&self, filter: &Filter<FieldAccessor<R>>) -> u64 {
        let rows = self.rows.read();
        rows.iter()
            .filter(|r| filter.matches(*r, &read_field::<R>))
            .count() as u64
    }
}

fn read_field<R>(key: &FieldAccessor<R>, record: &R) -> Value {
    key.read(record)
}

#[async_trait]
impl<R> QueryableSource for MemorySource<R>
where
    R: Clone + Send + Sync + 'static,
{
    type Record = R;
    type Key = FieldAccessor<R>;
    type Error = Infallible;
    type Query = MemoryQuery<R>;

    fn resolve(&self, path: &str) -> Option<Self::Key> {
        self.fields.get(path)
    }

    async fn count(&self, filter: &Filter<Self::Key>) -> Result<u64, Infallible> {
        Ok(self.count_matching(filter))
    }

    fn filter(&self, filter: &Filter<Self::Key>) -> MemoryQuery<R> {
        MemoryQuery {
            rows: self.rows.clone(),
            filter: filter.clone(),
            order: Vec::new(),
        }
    }
}

pub struct MemoryQuery<R> {
    rows: Arc<RwLock<Vec<R>>>,
    filter: Filter<FieldAccessor<R>>,
    order: Vec<(FieldAccessor<R>, SortDirection)>,
}

impl<R: Clone> MemoryQuery<R> {
    fn window(&self, skip: u64, take: u64) -> Vec<R> {
        let rows = self.rows.read();

        let mut matching: Vec<(Vec<Value>, &R)> = rows
            .iter()
            .filter(|r| self.filter.matches(*r, &read_field::<R>))
            .map(|r| (self.order.iter().map(|(k, _)| k.read(r)).collect(), r))
            .collect();

        matching.sort_by(|(a, _), (b, _)| self.compare(a, b));

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let take = usize::try_from(take).unwrap_or(usize::MAX);
        matching
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|(_, r)| r.clone())
            .collect()
    }

    fn compare(&self, a: &[Value], b: &[Value]) -> Ordering {
        for (((_, direction), a), b) in self.order.iter().zip(a).zip(b) {
            let ord = match direction {
                SortDirection::Ascending => a.sort_cmp(b),
                SortDirection::Descending => b.sort_cmp(a),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

#[async_trait]
impl<R> OrderedQuery for MemoryQuery<R>
where
    R: Clone + Send + Sync + 'static,
{
    type Record = R;
    type Key = FieldAccessor<R>;
    type Error = Infallible;

    fn order_by(mut self, key: &Self::Key, direction: SortDirection) -> Self {
        self.order.clear();
        self.order.push((key.clone(), direction));
        self
    }

    fn then_by(mut self, key: &Self::Key, direction: SortDirection) -> Self {
        self.order.push((key.clone(), direction));
        self
    }

    async fn skip_take(self, skip: u64, take: u64) -> Result<Vec<R>, Infallible> {
        Ok(self.window(skip, take))
    }
}
