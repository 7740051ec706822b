use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{
    Category, CategoryChanges, CategoryFilter, CategoryStatus,
};
use crate::shared::types::Paging;

const CATEGORY_COLUMNS: &str =
    "id, name, image, position, description, parent_id, status, created_at, updated_at";

/// Storage operations for categories. Owns no business rules: status is never
/// checked here except for excluding deleted rows from `list`.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Fetch by id regardless of status
    async fn get(&self, id: Uuid) -> Result<Option<Category>>;

    /// Non-deleted rows matching `filter`, newest id first. Writes the total
    /// match count into `paging.total`.
    async fn list(&self, filter: &CategoryFilter, paging: &mut Paging) -> Result<Vec<Category>>;

    /// Returns `false` if a row with the same id already exists
    async fn insert(&self, category: &Category) -> Result<bool>;

    /// Returns `false` if no row has this id
    async fn update(&self, id: Uuid, changes: &CategoryChanges) -> Result<bool>;

    /// Removes the row when `hard`, otherwise marks it deleted and stamps
    /// `updated_at`. Returns `false` if no row has this id.
    async fn delete(&self, id: Uuid, hard: bool, updated_at: DateTime<Utc>) -> Result<bool>;
}

/// PostgreSQL-backed repository
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for PgCategoryRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgCategoryRepository")
            .field("pool", &"<PgPool>")
            .finish()
    }
}

/// Appends `WHERE status <> 'deleted' AND <col> = $n ...` for every set filter field
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &CategoryFilter) {
    qb.push(" WHERE status <> ");
    qb.push_bind(CategoryStatus::Deleted);

    if let Some(name) = &filter.name {
        qb.push(" AND name = ");
        qb.push_bind(name.clone());
    }
    if let Some(position) = filter.position {
        qb.push(" AND position = ");
        qb.push_bind(position);
    }
    if let Some(parent_id) = filter.parent_id {
        qb.push(" AND parent_id = ");
        qb.push_bind(parent_id);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ");
        qb.push_bind(status);
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);

        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn list(&self, filter: &CategoryFilter, paging: &mut Paging) -> Result<Vec<Category>> {
        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM categories");
        push_filter(&mut count_qb, filter);

        let total: i64 = count_qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count categories: {:?}", e);
                AppError::Database(e)
            })?;
        paging.total = total;

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM categories",
            CATEGORY_COLUMNS
        ));
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY id DESC LIMIT ");
        qb.push_bind(paging.limit());
        qb.push(" OFFSET ");
        qb.push_bind(paging.offset());

        qb.build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn insert(&self, category: &Category) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO categories
                (id, name, image, position, description, parent_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.image)
        .bind(category.position)
        .bind(&category.description)
        .bind(category.parent_id)
        .bind(category.status)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert category {}: {:?}", category.id, e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, id: Uuid, changes: &CategoryChanges) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = COALESCE($1, name),
                image = COALESCE($2, image),
                position = COALESCE($3, position),
                description = COALESCE($4, description),
                parent_id = COALESCE($5, parent_id),
                status = COALESCE($6, status),
                updated_at = $7
            WHERE id = $8
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.image)
        .bind(changes.position)
        .bind(&changes.description)
        .bind(changes.parent_id)
        .bind(changes.status)
        .bind(changes.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update category {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid, hard: bool, updated_at: DateTime<Utc>) -> Result<bool> {
        let query = if hard {
            sqlx::query("DELETE FROM categories WHERE id = $1").bind(id)
        } else {
            sqlx::query("UPDATE categories SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(CategoryStatus::Deleted)
                .bind(updated_at)
        };

        let result = query.execute(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to delete category {} (hard={}): {:?}", id, hard, e);
            AppError::Database(e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
