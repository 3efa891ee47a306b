//! PostgreSQL post repository implementation.

use super::range_bounds;
use crate::{traits::PostRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quill_core::{CategoryId, Post, PostId, QuillError, QuillResult, RecordRange, UserId};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// PostgreSQL post repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = PostRepository)]
pub struct PgPostRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgPostRepository {
    /// Creates a new PostgreSQL post repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    category_id: i64,
    user_id: i64,
    title: String,
    content: String,
    published: bool,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::new(row.id),
            category_id: CategoryId::new(row.category_id),
            user_id: UserId::new(row.user_id),
            title: row.title,
            content: row.content,
            published: row.published,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const POST_COLUMNS: &str =
    "id, category_id, user_id, title, content, published, slug, created_at, updated_at";

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: &Post) -> QuillResult<Post> {
        debug!("Inserting post: {}", post.slug);

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (category_id, user_id, title, content, published, slug)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post.category_id.into_inner())
        .bind(post.user_id.into_inner())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.published)
        .bind(&post.slug)
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: PostId) -> QuillResult<Option<Post>> {
        debug!("Finding post by id: {}", id);

        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Post::from))
    }

    async fn find_range(&self, range: RecordRange) -> QuillResult<Vec<Post>> {
        debug!("Finding posts in range: {}", range);
        let (offset, limit) = range_bounds(range)?;

        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE deleted_at IS NULL
            ORDER BY id
            OFFSET $1 LIMIT $2
            "#
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn update(&self, post: &Post) -> QuillResult<Post> {
        debug!("Updating post: {}", post.id);

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET category_id = $2, user_id = $3, title = $4, content = $5,
                published = $6, slug = $7, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post.id.into_inner())
        .bind(post.category_id.into_inner())
        .bind(post.user_id.into_inner())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.published)
        .bind(&post.slug)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Post::from)
            .ok_or_else(|| QuillError::not_found("Post", post.id))
    }

    async fn delete(&self, id: PostId) -> QuillResult<Option<Post>> {
        debug!("Soft-deleting post: {}", id);

        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts SET deleted_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Post::from))
    }
}
