//! The pagination orchestrator.

use pager_core::{adjust_page, compose_filter, PageWindow, Pageable, PagedResult, QueryParameters};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::{ConfigError, PagerConfig};
use crate::ordering::{apply_order, effective_order, resolve_order};
use crate::source::{OrderedQuery, QueryableSource};

#[derive(Debug, Error)]
pub enum PageError<E>
where
    E: std::error::Error + 'static,
{
    /// The request itself is malformed.
    #[error(transparent)]
    Request(#[from] pager_core::Error),

    /// The data source failed; passed through untouched.
    #[error(transparent)]
    Source(E),
}

impl<E> PageError<E>
where
    E: std::error::Error + 'static,
{
    pub fn is_request(&self) -> bool {
        matches!(self, PageError::Request(_))
    }

    pub fn code(&self) -> &'static str {
        match self {
            PageError::Request(e) => e.code(),
            PageError::Source(_) => "SOURCE_FAILURE",
        }
    }
}

/// Serves pages of `S::Record` from one data source.
///
/// Holds no per-request state; one instance can serve concurrent calls.
pub struct Pager<S> {
    source: S,
    config: PagerConfig,
}

impl<S> Pager<S>
where
    S: QueryableSource,
    S::Record: Pageable,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: PagerConfig::default(),
        }
    }

    /// Fails if `config` does not pass [`PagerConfig::validate`].
    pub fn with_config(source: S, config: PagerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// First-page parameters sized per configuration.
    pub fn new_query(&self) -> QueryParameters {
        QueryParameters::new().with_page(0, self.config.default_page_size)
    }

    /// Fetch one page and project each of its records with `project`.
    ///
    /// The returned parameters carry the fresh total count and, if the
    /// requested page was past the data, the corrected index. `query` itself
    /// is not modified.
    #[instrument(
        name = "pager.get_page",
        skip(self, query, project),
        fields(page_index = query.page_index, page_size = query.page_size)
    )]
    pub async fn get_page<V, F>(
        &self,
        query: &QueryParameters,
        project: F,
    ) -> Result<PagedResult<V>, PageError<S::Error>>
    where
        F: FnMut(S::Record) -> V,
    {
        query.validate()?;
        let query = self.clamp_page_size(query);

        let filter = compose_filter::<S::Record>(&query)?
            .resolve(|path| self.source.resolve(path))?;
        let order = effective_order::<S::Record>(&query)?;
        let order_keys = resolve_order(&self.source, &order)?;

        let total = self
            .source
            .count(&filter)
            .await
            .map_err(PageError::Source)?;
        debug!(total, "counted matching records");

        let adjusted = adjust_page(&query, total);
        if adjusted.page_index != query.page_index {
            info!(
                requested = query.page_index,
                corrected = adjusted.page_index,
                total,
                "page index past the data, moved to last page"
            );
        }

        let window = PageWindow::for_query(&adjusted);
        debug!(
            skip = window.skip,
            take = window.take,
            order = %order.to_spec_string(),
            "fetching page"
        );

        let rows = apply_order(self.source.filter(&filter), &order_keys)
            .skip_take(window.skip, window.take)
            .await
            .map_err(PageError::Source)?;

        let items: Vec<V> = rows.into_iter().map(project).collect();
        debug!(returned = items.len(), "page ready");
        Ok(PagedResult::new(items, adjusted))
    }

    /// [`Pager::get_page`] projecting through `From`.
    pub async fn get_page_into<V>(
        &self,
        query: &QueryParameters,
    ) -> Result<PagedResult<V>, PageError<S::Error>>
    where
        V: From<S::Record>,
    {
        self.get_page(query, V::from).await
    }

    fn clamp_page_size(&self, query: &QueryParameters) -> QueryParameters {
        let mut query = query.clone();
        if let Some(max) = self.config.max_page_size {
            if query.page_size > max {
                warn!(requested = query.page_size, max, "page size above maximum, clamping");
                query.page_size = max;
            }
        }
        query
    }
}
