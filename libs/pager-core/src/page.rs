use serde::{Deserialize, Serialize};

use crate::query::QueryParameters;
use crate::window;

/// One page of projected records plus the parameters actually used to
/// produce it (corrected index, fresh total count).
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub query: QueryParameters,
}

impl<T> PagedResult<T> {
    /// Create a new page with items and the parameters used
    pub fn new(items: Vec<T>, query: QueryParameters) -> Self {
        Self { items, query }
    }

    /// Create an empty page for the given parameters
    pub fn empty(query: QueryParameters) -> Self {
        Self {
            items: Vec::new(),
            query,
        }
    }

    /// Map items while preserving the query (record->view mapping convenience)
    pub fn map_items<U>(self, mut f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(&mut f).collect(),
            query: self.query,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page_count(&self) -> u64 {
        window::page_count(self.query.total_count, self.query.page_size)
    }

    pub fn has_next_page(&self) -> bool {
        let next = self.query.page_index.saturating_add(1);
        u64::try_from(next).is_ok_and(|next| next < self.page_count())
    }
}
