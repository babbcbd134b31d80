//! Paging contracts and the pure parts of page-query composition.
//!
//! This crate knows nothing about storage. It parses sort specs, composes the
//! predicate every page query runs under, and computes the page window. The
//! `pager-db` crate drives data sources with these pieces.

pub mod error;
pub mod filter;
pub mod page;
pub mod pageable;
pub mod query;
pub mod sort;
pub mod window;

pub use error::{Error, Result};
pub use filter::{baseline_filter, compose_filter, Filter, Value};
pub use page::PagedResult;
pub use pageable::Pageable;
pub use query::{QueryParameters, DEFAULT_PAGE_INDEX, DEFAULT_PAGE_SIZE, DEFAULT_SORT_COLUMN};
pub use sort::{parse_sort_spec, SortDescription, SortDirection, SortOrder, MAX_SORT_KEYS};
pub use window::{adjust_page, PageWindow};
