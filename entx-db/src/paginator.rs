//! Page-number pagination over any [`PaginatedQuery`].
//!
//! The paginator counts the unrestricted rows, restricts the query to the
//! requested window, fetches it and assembles a [`PageResult`] with
//! `first` / `last` / `next` / `prev` links. Query errors are returned
//! exactly as the query produced them.
//!
//! A request beyond the last page is not clamped: `current_page` echoes the
//! requested page, the fetched slice is whatever the query returns for that
//! offset (normally nothing) and `from` / `to` are both reported as `0`.

use tracing::debug;

use crate::config::PaginationConfig;
use crate::context::QueryContext;
use crate::links::PageLinks;
use crate::repository::paginate::PaginatedQuery;
use crate::repository::pagination::{PageRequest, PageResult};

/// Computes paginated results and their navigation links.
///
/// # Example
/// ```
/// use entx_db::{MemoryQuery, PageLinks, PageRequest, Paginator, QueryContext};
/// use url::Url;
///
/// # tokio_test::block_on(async {
/// let paginator = Paginator::default();
/// let links = PageLinks::from_request(&Url::parse("http://localhost/items").unwrap());
/// let mut query = MemoryQuery::new((1..=25).collect::<Vec<u32>>());
///
/// let page = paginator
///     .get_page(&QueryContext::new(), &PageRequest::new(3, 10), &mut query, &links)
///     .await
///     .unwrap();
///
/// assert_eq!(page.last_page, 3);
/// assert_eq!((page.from, page.to), (21, 25));
/// assert_eq!(page.data, vec![21, 22, 23, 24, 25]);
/// assert_eq!(page.next_page_url, "");
/// # });
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Paginator {
    config: PaginationConfig,
}

impl Paginator {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Fetch the page described by `request` from `query`.
    ///
    /// Remember to add the ordering to `query` before calling this.
    ///
    /// # Errors
    /// Returns the query's own error when counting or fetching fails; no
    /// partial result is produced.
    pub async fn get_page<V, Q>(
        &self,
        ctx: &QueryContext,
        request: &PageRequest,
        query: &mut Q,
        links: &PageLinks,
    ) -> Result<PageResult<V>, Q::Error>
    where
        Q: PaginatedQuery<V>,
    {
        let per_page = request.effective_per_page(self.config.default_per_page);
        let page = request.effective_page();

        let total = query.count(ctx).await?;
        if total == 0 {
            debug!(page, per_page, "paginated query matched no rows");
            return Ok(PageResult::empty(per_page, links));
        }

        let offset = request.offset(self.config.default_per_page);
        let data = query.restrict(offset, per_page).fetch(ctx).await?;

        let last_page = total.div_ceil(per_page).max(1);
        let last_page_url = if last_page <= 1 {
            String::new()
        } else {
            links.page_url(last_page, per_page)
        };

        let next_page_url = match page.checked_add(1) {
            Some(next) if next <= last_page => links.page_url(next, per_page),
            _ => String::new(),
        };

        let prev_page_url = if page <= 1 {
            String::new()
        } else {
            links.page_url(page - 1, per_page)
        };

        let (from, to) = if offset < total {
            (offset + 1, page.saturating_mul(per_page).min(total))
        } else {
            (0, 0)
        };

        debug!(
            total,
            page,
            per_page,
            last_page,
            from,
            to,
            rows = data.len(),
            "paginated query fetched"
        );

        Ok(PageResult {
            total,
            per_page,
            current_page: page,
            last_page,
            first_page_url: links.page_url(1, per_page),
            last_page_url,
            next_page_url,
            prev_page_url,
            path: links.path(),
            from,
            to,
            data,
        })
    }

    /// Same as [`Paginator::get_page`], converting each fetched row with
    /// `mapper`. The mapper also receives the 0-based index of the row
    /// within the page.
    pub async fn get_page_mapped<I, V, Q, F>(
        &self,
        ctx: &QueryContext,
        request: &PageRequest,
        query: &mut Q,
        links: &PageLinks,
        mapper: F,
    ) -> Result<PageResult<V>, Q::Error>
    where
        Q: PaginatedQuery<I>,
        F: FnMut(I, usize) -> V,
    {
        let page = self.get_page(ctx, request, query, links).await?;
        Ok(page.map_data(mapper))
    }
}
