//! Partial-update merge.
//!
//! A patch field is applied only when it differs from its type's zero value:
//! the empty string, `false`, or an id of zero. A field can therefore never
//! be cleared through a patch. Merging is pure; the store stamps
//! `updated_at` when the merged record is persisted.

use quill_core::{slugify, Category, CategoryId, Post, User};

/// Applies a sparse patch onto a full record.
pub trait Merge<P> {
    fn merge(&mut self, patch: P);
}

/// Sparse user update. `password_hash` is already hashed by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Sparse category update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: String,
    pub description: String,
}

/// Sparse post update.
///
/// `published` can only be switched on: `false` is indistinguishable from
/// "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub category_id: CategoryId,
    pub title: String,
    pub content: String,
    pub published: bool,
}

fn apply_text(target: &mut String, value: String) -> bool {
    if value.is_empty() {
        return false;
    }
    *target = value;
    true
}

impl Merge<UserPatch> for User {
    fn merge(&mut self, patch: UserPatch) {
        apply_text(&mut self.name, patch.name);
        apply_text(&mut self.email, patch.email);
        apply_text(&mut self.password_hash, patch.password_hash);
    }
}

impl Merge<CategoryPatch> for Category {
    fn merge(&mut self, patch: CategoryPatch) {
        apply_text(&mut self.name, patch.name);
        apply_text(&mut self.description, patch.description);
    }
}

impl Merge<PostPatch> for Post {
    fn merge(&mut self, patch: PostPatch) {
        if apply_text(&mut self.title, patch.title) {
            self.slug = slugify(&self.title);
        }
        apply_text(&mut self.content, patch.content);
        if !patch.category_id.is_zero() {
            self.category_id = patch.category_id;
        }
        if patch.published {
            self.published = true;
        }
    }
}
