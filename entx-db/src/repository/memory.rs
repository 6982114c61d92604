use async_trait::async_trait;
use entx_api::error::QueryError;

use crate::context::QueryContext;
use crate::repository::paginate::PaginatedQuery;

type TrashedFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Paginated query over rows already held in memory.
///
/// Rows are returned in the order they were given. When a trashed predicate
/// is set, matching rows behave like soft-deleted records: they are left out
/// of both `count` and `fetch` unless the context includes trashed rows.
///
/// # Example
/// ```
/// use entx_db::repository::memory::MemoryQuery;
///
/// let query = MemoryQuery::new(vec![(1, false), (2, true), (3, false)])
///     .with_trashed(|row: &(i32, bool)| row.1);
/// ```
pub struct MemoryQuery<T> {
    rows: Vec<T>,
    trashed: Option<TrashedFn<T>>,
    offset: u64,
    limit: Option<u64>,
}

impl<T: Clone> MemoryQuery<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            trashed: None,
            offset: 0,
            limit: None,
        }
    }

    /// Mark the rows matching `predicate` as soft-deleted.
    pub fn with_trashed<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.trashed = Some(Box::new(predicate));
        self
    }

    fn visible<'a>(&'a self, ctx: &QueryContext) -> impl Iterator<Item = &'a T> + 'a {
        let include_trashed = ctx.includes_trashed();
        let trashed = self.trashed.as_ref();
        self.rows
            .iter()
            .filter(move |row| include_trashed || !trashed.is_some_and(|is_trashed| is_trashed(*row)))
    }
}

#[async_trait]
impl<T> PaginatedQuery<T> for MemoryQuery<T>
where
    T: Clone + Send + Sync,
{
    type Error = QueryError;

    async fn count(&self, ctx: &QueryContext) -> Result<u64, QueryError> {
        ctx.check()?;
        Ok(self.visible(ctx).count() as u64)
    }

    fn restrict(&mut self, offset: u64, limit: u64) -> &mut Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    async fn fetch(&mut self, ctx: &QueryContext) -> Result<Vec<T>, QueryError> {
        ctx.check()?;
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = self
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(self.visible(ctx).skip(skip).take(take).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_restrict_slices_rows() {
        let ctx = QueryContext::new();
        let mut query = MemoryQuery::new((1..=7).collect::<Vec<u32>>());

        assert_eq!(assert_ok!(query.count(&ctx).await), 7);
        assert_eq!(assert_ok!(query.fetch(&ctx).await).len(), 7);

        let rows = assert_ok!(query.restrict(3, 3).fetch(&ctx).await);
        assert_eq!(rows, vec![4, 5, 6]);

        // count ignores the restriction
        assert_eq!(assert_ok!(query.count(&ctx).await), 7);

        let rows = assert_ok!(query.restrict(6, 3).fetch(&ctx).await);
        assert_eq!(rows, vec![7]);

        let rows = assert_ok!(query.restrict(100, 3).fetch(&ctx).await);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_trashed_rows_are_filtered() {
        let rows = vec![("a", false), ("b", true), ("c", false)];
        let mut query = MemoryQuery::new(rows).with_trashed(|row: &(&str, bool)| row.1);

        let ctx = QueryContext::new();
        assert_eq!(assert_ok!(query.count(&ctx).await), 2);
        let names: Vec<_> = assert_ok!(query.fetch(&ctx).await).into_iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["a", "c"]);

        let ctx = ctx.include_trashed();
        assert_eq!(assert_ok!(query.count(&ctx).await), 3);
    }

    #[tokio::test]
    async fn test_cancelled_context_fails() {
        let ctx = QueryContext::new();
        ctx.cancel();
        let mut query = MemoryQuery::new(vec![1, 2, 3]);

        assert!(matches!(query.count(&ctx).await, Err(QueryError::Cancelled)));
        assert!(matches!(query.fetch(&ctx).await, Err(QueryError::Cancelled)));
    }
}
