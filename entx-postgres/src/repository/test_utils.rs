use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use std::error::Error;
use uuid::Uuid;

use crate::utils::TryFromRow;

#[derive(Debug, Clone, PartialEq)]
pub struct PageItemModel {
    pub id: Uuid,
    pub name: String,
    pub position: i32,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFromRow<PgRow> for PageItemModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn Error + Send + Sync>> {
        Ok(PageItemModel {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            position: row.try_get("position")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }
}

/// Replace the content of `page_item` with `count` rows numbered from 1.
/// Rows whose position is listed in `trashed` get a `deleted_at` timestamp.
pub async fn create_test_items(
    pool: &PgPool,
    count: i32,
    trashed: &[i32],
) -> Result<Vec<PageItemModel>, Box<dyn Error + Send + Sync>> {
    sqlx::query("DELETE FROM page_item").execute(pool).await?;

    let mut items = Vec::with_capacity(count.max(0) as usize);
    for position in 1..=count {
        let item = PageItemModel {
            id: Uuid::new_v4(),
            name: format!("item-{position}"),
            position,
            deleted_at: trashed.contains(&position).then(Utc::now),
        };
        sqlx::query(
            r#"
            INSERT INTO page_item (id, name, position, deleted_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.position)
        .bind(item.deleted_at)
        .execute(pool)
        .await?;
        items.push(item);
    }

    Ok(items)
}
