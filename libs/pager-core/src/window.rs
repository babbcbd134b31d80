//! Page window calculation and out-of-range index correction.
//!
//! Indexing is zero-based everywhere: page `i` starts at row `i * page_size`.

use crate::query::QueryParameters;

/// The skip/take pair materialized for one page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page_index: i64,
    pub skip: u64,
    pub take: u64,
}

impl PageWindow {
    /// Window for already adjusted parameters. Assumes a validated page size.
    pub fn for_query(query: &QueryParameters) -> Self {
        Self {
            page_index: query.page_index,
            skip: query.skip_value(),
            take: u64::try_from(query.page_size).unwrap_or(0),
        }
    }
}

/// Number of pages needed for `result_count` rows.
pub fn page_count(result_count: u64, page_size: i64) -> u64 {
    match u64::try_from(page_size) {
        Ok(size) if size > 0 => result_count.div_ceil(size),
        _ => 0,
    }
}

/// Index of the last page that holds data; 0 when there is none.
pub fn last_page_index(result_count: u64, page_size: i64) -> i64 {
    let pages = page_count(result_count, page_size);
    i64::try_from(pages.saturating_sub(1)).unwrap_or(i64::MAX)
}

/// Return `query` with `total_count` set to `result_count` and, when the
/// requested page lies entirely past the data, the index moved back to the
/// last page that has data.
///
/// The input is left untouched. A negative index is not corrected here: its
/// skip already clamps to zero.
pub fn adjust_page(query: &QueryParameters, result_count: u64) -> QueryParameters {
    let mut adjusted = query.clone();
    if adjusted.page_index > 0 && adjusted.skip_value() >= result_count {
        adjusted.page_index = last_page_index(result_count, adjusted.page_size);
    }
    adjusted.total_count = result_count;
    adjusted
}
