use async_trait::async_trait;

use crate::context::QueryContext;

/// Capability a query must expose to be paginated
///
/// The paginator reads the unrestricted total through `count`, then narrows
/// the query with `restrict` and reads one page through `fetch`. `count`
/// must not be affected by an earlier `restrict`. Add the `ORDER BY` to the
/// underlying query before paginating it, otherwise pages are not stable.
///
/// # Type Parameters
/// * `V` - The row type returned by `fetch`
///
/// # Example
/// ```ignore
/// #[async_trait]
/// impl PaginatedQuery<ItemModel> for ItemQuery {
///     type Error = QueryError;
///
///     async fn count(&self, ctx: &QueryContext) -> Result<u64, QueryError> { ... }
///     fn restrict(&mut self, offset: u64, limit: u64) -> &mut Self { ... }
///     async fn fetch(&mut self, ctx: &QueryContext) -> Result<Vec<ItemModel>, QueryError> { ... }
/// }
/// ```
#[async_trait]
pub trait PaginatedQuery<V>: Send {
    /// Error returned by `count` and `fetch`, handed back to the caller
    /// unchanged by the paginator.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Count all rows matched by the query, ignoring any restriction
    async fn count(&self, ctx: &QueryContext) -> Result<u64, Self::Error>;

    /// Restrict the next `fetch` to `limit` rows after skipping `offset`
    fn restrict(&mut self, offset: u64, limit: u64) -> &mut Self
    where
        Self: Sized;

    /// Fetch the rows of the current restriction, in query order
    async fn fetch(&mut self, ctx: &QueryContext) -> Result<Vec<V>, Self::Error>;
}
