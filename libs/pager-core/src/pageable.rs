use crate::filter::Filter;
use crate::sort::{SortDirection, SortOrder};

/// Per-record-type paging behavior.
///
/// Every item has a default matching the conventional record shape (a
/// `name` display field and a `deleted` soft-delete flag); record types
/// override what differs.
pub trait Pageable {
    /// Field used by the default ordering and the default search.
    const DISPLAY_FIELD: &'static str = "name";
    /// Boolean soft-delete flag. Flagged records never appear in a page.
    const DELETED_FIELD: &'static str = "deleted";
    /// Final ascending tie-break appended to every ordering, when declared.
    const TIEBREAKER: Option<&'static str> = None;
    /// Foreign-key field matched against `QueryParameters::relative_id`.
    const RELATIVE_FIELD: Option<&'static str> = None;

    /// Ordering used when the request carries no explicit sort. The first key
    /// is primary; further keys are the default tie-breaks.
    fn default_order() -> SortOrder {
        SortOrder::single(Self::DISPLAY_FIELD, SortDirection::Ascending)
    }

    /// What "search" means for this record type. Only called with a
    /// non-empty, trimmed key.
    fn search_filter(search_key: &str) -> Filter {
        Filter::contains(Self::DISPLAY_FIELD, search_key)
    }
}
