use async_trait::async_trait;
use entx_api::error::QueryError;
use entx_api::openapi::FIELD_DELETED_AT;
use entx_db::context::QueryContext;
use entx_db::repository::paginate::PaginatedQuery;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

use crate::utils::{is_valid_identifier, TryFromRow};

/// Ordering direction for sorted queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    fn as_sql(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Paginated query over a single PostgreSQL table
///
/// Counts with `SELECT COUNT(*)` and fetches with `LIMIT` / `OFFSET`. When
/// soft delete is enabled, rows with a non-null `deleted_at` are skipped by
/// both statements unless the context includes trashed rows.
///
/// # Example
/// ```ignore
/// let mut query = PgPageQuery::<ItemModel>::new(pool.clone(), "item")?
///     .order_by("id", OrderDirection::Asc)?
///     .soft_delete(true);
///
/// let page = Paginator::default()
///     .get_page(&ctx, &PageRequest::new(2, 20), &mut query, &links)
///     .await?;
/// ```
pub struct PgPageQuery<T> {
    pool: Arc<PgPool>,
    table: String,
    order_by: Vec<(String, OrderDirection)>,
    soft_delete: bool,
    offset: u64,
    limit: Option<u64>,
    _row: PhantomData<fn() -> T>,
}

impl<T> PgPageQuery<T> {
    pub fn new(pool: Arc<PgPool>, table: &str) -> Result<Self, QueryError> {
        if !is_valid_identifier(table) {
            return Err(QueryError::fetch(format!("Invalid table name: {table:?}")));
        }
        Ok(Self {
            pool,
            table: table.to_string(),
            order_by: Vec::new(),
            soft_delete: false,
            offset: 0,
            limit: None,
            _row: PhantomData,
        })
    }

    /// Append a sort column. Columns are applied in the order they are added.
    pub fn order_by(mut self, column: &str, direction: OrderDirection) -> Result<Self, QueryError> {
        if !is_valid_identifier(column) {
            return Err(QueryError::fetch(format!("Invalid column name: {column:?}")));
        }
        self.order_by.push((column.to_string(), direction));
        Ok(self)
    }

    /// Skip rows whose `deleted_at` is set.
    pub fn soft_delete(mut self, enabled: bool) -> Self {
        self.soft_delete = enabled;
        self
    }

    fn where_clause(&self, ctx: &QueryContext) -> String {
        if self.soft_delete && !ctx.includes_trashed() {
            format!(" WHERE {FIELD_DELETED_AT} IS NULL")
        } else {
            String::new()
        }
    }

    pub fn count_sql(&self, ctx: &QueryContext) -> String {
        format!("SELECT COUNT(*) FROM {}{}", self.table, self.where_clause(ctx))
    }

    /// Select statement binding the limit as `$1` and the offset as `$2`.
    pub fn fetch_sql(&self, ctx: &QueryContext) -> String {
        let mut sql = format!("SELECT * FROM {}{}", self.table, self.where_clause(ctx));
        if !self.order_by.is_empty() {
            let columns: Vec<String> = self
                .order_by
                .iter()
                .map(|(column, direction)| format!("{column} {}", direction.as_sql()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&columns.join(", "));
        }
        sql.push_str(" LIMIT $1 OFFSET $2");
        sql
    }
}

/// Runs `fut` unless the context is already done, aborting it when the
/// context is cancelled or its deadline passes.
async fn run_in_context<R, F>(ctx: &QueryContext, fut: F) -> Result<R, QueryError>
where
    F: Future<Output = Result<R, QueryError>>,
{
    ctx.check()?;
    let bounded = async {
        match ctx.deadline() {
            Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                Ok(result) => result,
                Err(_) => Err(QueryError::DeadlineExceeded),
            },
            None => fut.await,
        }
    };
    tokio::select! {
        _ = ctx.cancelled() => Err(QueryError::Cancelled),
        result = bounded => result,
    }
}

fn to_bind(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl<T> PaginatedQuery<T> for PgPageQuery<T>
where
    T: TryFromRow<PgRow> + Send,
{
    type Error = QueryError;

    async fn count(&self, ctx: &QueryContext) -> Result<u64, QueryError> {
        let sql = self.count_sql(ctx);
        trace!(%sql, "counting rows");

        let total: i64 = run_in_context(ctx, async {
            sqlx::query_scalar::<_, i64>(&sql)
                .fetch_one(&*self.pool)
                .await
                .map_err(QueryError::count)
        })
        .await?;

        Ok(total.max(0) as u64)
    }

    fn restrict(&mut self, offset: u64, limit: u64) -> &mut Self {
        self.offset = offset;
        self.limit = Some(limit);
        self
    }

    async fn fetch(&mut self, ctx: &QueryContext) -> Result<Vec<T>, QueryError> {
        let sql = self.fetch_sql(ctx);
        let limit = self.limit.map_or(i64::MAX, to_bind);
        let offset = to_bind(self.offset);
        trace!(%sql, limit, offset, "fetching rows");

        let rows = run_in_context(ctx, async {
            sqlx::query(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(&*self.pool)
                .await
                .map_err(QueryError::fetch)
        })
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(T::try_from_row(&row).map_err(QueryError::Decode)?);
        }
        Ok(items)
    }
}
