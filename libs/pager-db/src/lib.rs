//! Page serving over queryable data sources.
//!
//! A [`Pager`] turns a [`QueryParameters`] request into a [`PagedResult`]:
//! it composes the filter, counts, corrects out-of-range page indexes, orders,
//! windows and projects. Data access goes through the [`QueryableSource`]
//! capability, implemented here for in-memory data ([`MemorySource`]) and,
//! with the `sea-orm` feature, for SeaORM entities ([`sea::SeaSource`]).
//!
//! # Features
//! - `sea-orm`: the SeaORM source
//! - `pg`, `mysql`, `sqlite`: enable the matching SeaORM SQLx backend
//!
//! # Example
//! ```rust
//! use pager_db::{FieldMap, MemorySource, Pageable, Pager, QueryParameters, Value};
//!
//! #[derive(Clone)]
//! struct Tag {
//!     name: String,
//!     deleted: bool,
//! }
//!
//! impl Pageable for Tag {}
//!
//! # tokio_test_block(async {
//! let fields = FieldMap::new()
//!     .insert("name", |t: &Tag| Value::from(&t.name))
//!     .insert("deleted", |t: &Tag| Value::from(t.deleted));
//! let source = MemorySource::with_rows(
//!     fields,
//!     vec![Tag { name: "rust".into(), deleted: false }],
//! );
//!
//! let pager = Pager::new(source);
//! let page = pager
//!     .get_page(&QueryParameters::new(), |t| t.name)
//!     .await
//!     .unwrap();
//! assert_eq!(page.items, vec!["rust".to_string()]);
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod config;
pub mod fields;
pub mod memory;
pub mod ordering;
pub mod pager;
#[cfg(feature = "sea-orm")]
pub mod sea;
pub mod source;

pub use config::{ConfigError, PagerConfig};
pub use fields::{FieldAccessor, FieldMap};
pub use memory::{MemoryQuery, MemorySource, SoftDelete};
pub use ordering::{apply_order, effective_order, resolve_order};
pub use pager::{PageError, Pager};
pub use source::{OrderedQuery, QueryableSource};

// Re-export the contracts callers need alongside the pager
pub use pager_core::{
    Filter, PagedResult, Pageable, QueryParameters, SortDescription, SortDirection, SortOrder,
    Value,
};
