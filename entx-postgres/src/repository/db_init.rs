//! Database initialization and cleanup utilities
//!
//! Executes the SQL files shipped in `migrations/` and `cleanup/` so the
//! tables backing paginated queries can be created and dropped without a
//! migration runner.

use sqlx::PgPool;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Initialize the database by executing migration files in ascending order
///
/// # Example
///
/// ```rust,no_run
/// use sqlx::PgPool;
/// use entx_postgres::repository::db_init::init_database;
///
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// init_database(pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn init_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    execute_sql_files_in_order(pool, &migrations_dir, true).await
}

/// Cleanup the database by executing cleanup files in descending order
pub async fn cleanup_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let cleanup_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cleanup");
    execute_sql_files_in_order(pool, &cleanup_dir, false).await
}

/// Execute the `.sql` files of `dir` sorted by file name
async fn execute_sql_files_in_order(
    pool: &PgPool,
    dir: &Path,
    ascending: bool,
) -> Result<(), sqlx::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.path().extension().and_then(|s| s.to_str()) == Some("sql")
        })
        .collect();

    entries.sort_by(|a, b| {
        let ordering = a.file_name().cmp(&b.file_name());
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });

    for entry in entries {
        let path = entry.path();
        debug!(file = %path.display(), "executing sql file");
        let sql = fs::read_to_string(&path)?;
        sqlx::raw_sql(&sql).execute(pool).await?;
    }

    Ok(())
}
