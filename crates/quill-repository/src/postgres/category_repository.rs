//! PostgreSQL category repository implementation.

use super::range_bounds;
use crate::{traits::CategoryRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quill_core::{Category, CategoryId, QuillError, QuillResult, RecordRange};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL category repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = CategoryRepository)]
pub struct PgCategoryRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgCategoryRepository {
    /// Creates a new PostgreSQL category repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CATEGORY_COLUMNS: &str = "id, name, description, created_at, updated_at";

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, category: &Category) -> QuillResult<Category> {
        debug!("Inserting category: {}", category.name);

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&category.name)
        .bind(&category.description)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: CategoryId) -> QuillResult<Option<Category>> {
        debug!("Finding category by id: {}", id);

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Category::from))
    }

    async fn find_range(&self, range: RecordRange) -> QuillResult<Vec<Category>> {
        debug!("Finding categories in range: {}", range);
        let (offset, limit) = range_bounds(range)?;

        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            SELECT {CATEGORY_COLUMNS} FROM categories
            WHERE deleted_at IS NULL
            ORDER BY id
            OFFSET $1 LIMIT $2
            "#
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn update(&self, category: &Category) -> QuillResult<Category> {
        debug!("Updating category: {}", category.id);

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            UPDATE categories
            SET name = $2, description = $3, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(category.id.into_inner())
        .bind(&category.name)
        .bind(&category.description)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Category::from)
            .ok_or_else(|| QuillError::not_found("Category", category.id))
    }

    async fn delete(&self, id: CategoryId) -> QuillResult<Option<Category>> {
        debug!("Soft-deleting category: {}", id);

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            r#"
            UPDATE categories SET deleted_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Category::from))
    }
}
