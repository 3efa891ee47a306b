//! Post-related DTOs.

use chrono::{DateTime, Utc};
use quill_core::rules::{blank_or_text, not_blank};
use quill_core::{CategoryId, Post, PostId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Request to create a post. The author is taken from the caller's token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[validate(custom(function = "assigned_category", message = "Category is required"))]
    pub category_id: CategoryId,

    #[validate(
        length(max = 200, message = "Title cannot exceed 200 characters"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: String,

    #[validate(custom(function = "not_blank", message = "Content is required"))]
    pub content: String,

    #[serde(default)]
    pub published: bool,
}

/// Sparse post update. Empty strings, a zero category and `false` are left
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub category_id: CategoryId,

    #[validate(
        length(max = 200, message = "Title cannot exceed 200 characters"),
        custom(function = "blank_or_text", message = "Title cannot be whitespace")
    )]
    pub title: String,

    pub content: String,

    pub published: bool,
}

fn assigned_category(id: &CategoryId) -> Result<(), ValidationError> {
    if id.into_inner() > 0 {
        Ok(())
    } else {
        Err(ValidationError::new("required"))
    }
}

/// Post response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostResponse {
    pub id: PostId,
    pub category_id: CategoryId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            category_id: post.category_id,
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            published: post.published,
            slug: post.slug,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
