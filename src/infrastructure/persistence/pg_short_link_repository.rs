//! PostgreSQL implementation of the short link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_alias;

/// PostgreSQL repository for short links.
///
/// Alias uniqueness is enforced by the `short_links_alias_key` constraint, and
/// `created_at` is filled by the column default when the row is inserted.
pub struct PgShortLinkRepository {
    pool: Arc<PgPool>,
}

impl PgShortLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    id: i64,
    alias: String,
    original_url: String,
    created_at: DateTime<Utc>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink::new(row.id, row.alias, row.original_url, row.created_at)
    }
}

#[async_trait]
impl ShortLinkRepository for PgShortLinkRepository {
    async fn exists_by_alias(&self, alias: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM short_links WHERE alias = $1)",
        )
        .bind(alias)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT id, alias, original_url, created_at
            FROM short_links
            WHERE alias = $1
            "#,
        )
        .bind(alias)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn save(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let result = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            INSERT INTO short_links (alias, original_url)
            VALUES ($1, $2)
            RETURNING id, alias, original_url, created_at
            "#,
        )
        .bind(&new_link.alias)
        .bind(&new_link.original_url)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation_on_alias(&e) => {
                Err(AppError::AliasAlreadyExists(new_link.alias))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_all(&self) -> Result<Vec<ShortLink>, AppError> {
        let rows = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT id, alias, original_url, created_at
            FROM short_links
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ShortLink::from).collect())
    }

    async fn delete_by_alias(&self, alias: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM short_links WHERE alias = $1")
            .bind(alias)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
