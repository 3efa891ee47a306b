//! Post record and slug derivation.

use crate::{CategoryId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
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

impl Post {
    /// Creates an unsaved post with a slug derived from its title.
    #[must_use]
    pub fn new(
        category_id: CategoryId,
        user_id: UserId,
        title: String,
        content: String,
        published: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PostId::default(),
            category_id,
            user_id,
            slug: slugify(&title),
            title,
            content,
            published,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Derives a slug from a title: lowercased, every space replaced by a hyphen.
///
/// Runs of spaces are not collapsed and no other characters are touched.
#[must_use]
pub fn slugify(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}
