use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sort::{SortDirection, SortOrder};
use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: i64 = 25;
pub const DEFAULT_PAGE_INDEX: i64 = 0;
pub const DEFAULT_SORT_COLUMN: &str = "name";

/// Per-request paging, sorting and search parameters.
///
/// `page_index` is zero-based. `total_count` is owned by the engine: whatever
/// the caller sends is overwritten with the freshly measured count.
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryParameters {
    pub page_index: i64,
    pub page_size: i64,
    pub total_count: u64,
    pub sort_spec: String,
    pub sort_direction: SortDirection,
    pub search_key: String,
    pub is_default_sort: bool,
    /// Optional foreign-key scope, see `Pageable::RELATIVE_FIELD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_id: Option<Uuid>,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE_INDEX,
            page_size: DEFAULT_PAGE_SIZE,
            total_count: 0,
            sort_spec: DEFAULT_SORT_COLUMN.to_string(),
            sort_direction: SortDirection::Descending,
            search_key: String::new(),
            is_default_sort: true,
            relative_id: None,
        }
    }
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone these parameters as an explicit follow-up request.
    ///
    /// Everything is carried over except the default-sort flag, which is
    /// always cleared.
    #[must_use]
    pub fn follow_up(&self) -> Self {
        Self {
            is_default_sort: false,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_page(mut self, page_index: i64, page_size: i64) -> Self {
        self.page_index = page_index;
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search_key: impl Into<String>) -> Self {
        self.search_key = search_key.into();
        self
    }

    /// Request an explicit sort.
    #[must_use]
    pub fn with_sort(mut self, sort_spec: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_spec = sort_spec.into();
        self.sort_direction = direction;
        self.is_default_sort = false;
        self
    }

    /// Request an explicit sort from an already built order.
    #[must_use]
    pub fn with_order(self, order: &SortOrder) -> Self {
        let direction = order
            .primary()
            .map(|k| k.direction)
            .unwrap_or(self.sort_direction);
        self.with_sort(order.to_spec_string(), direction)
    }

    #[must_use]
    pub fn with_relative_id(mut self, relative_id: Uuid) -> Self {
        self.relative_id = Some(relative_id);
        self
    }

    pub fn has_sorting_condition(&self) -> bool {
        !self.sort_spec.trim().is_empty() && !self.is_default_sort
    }

    pub fn has_paging_condition(&self) -> bool {
        self.page_index > DEFAULT_PAGE_INDEX && self.page_size > DEFAULT_PAGE_SIZE
    }

    pub fn has_search(&self) -> bool {
        !self.search_key.trim().is_empty()
    }

    /// Offset of the first row of the requested page. Never negative.
    pub fn skip_value(&self) -> u64 {
        let skip = self.page_index.saturating_mul(self.page_size);
        u64::try_from(skip).unwrap_or(0)
    }

    /// Reject parameters that make the window math ill-defined.
    ///
    /// A negative `page_index` is tolerated (its skip clamps to zero); a
    /// non-positive `page_size` is not.
    pub fn validate(&self) -> Result<()> {
        if self.page_size <= 0 {
            return Err(Error::InvalidPageSize(self.page_size));
        }
        Ok(())
    }
}
