//! Record store trait definitions.

use async_trait::async_trait;
use quill_core::{
    Category, CategoryId, Interface, Post, PostId, QuillResult, RecordRange, User, UserId,
};

/// User record store.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Inserts a user and returns it with its store-assigned id.
    async fn create(&self, user: &User) -> QuillResult<User>;

    /// Finds a live user by ID.
    async fn find_by_id(&self, id: UserId) -> QuillResult<Option<User>>;

    /// Finds a live user by email.
    async fn find_by_email(&self, email: &str) -> QuillResult<Option<User>>;

    /// Returns live users in id order within the inclusive range.
    async fn find_range(&self, range: RecordRange) -> QuillResult<Vec<User>>;

    /// Persists every field of an existing user.
    async fn update(&self, user: &User) -> QuillResult<User>;

    /// Soft-deletes a user, returning the deleted record if it existed.
    async fn delete(&self, id: UserId) -> QuillResult<Option<User>>;
}

/// Category record store.
#[async_trait]
pub trait CategoryRepository: Interface + Send + Sync {
    /// Inserts a category and returns it with its store-assigned id.
    async fn create(&self, category: &Category) -> QuillResult<Category>;

    /// Finds a live category by ID.
    async fn find_by_id(&self, id: CategoryId) -> QuillResult<Option<Category>>;

    /// Returns live categories in id order within the inclusive range.
    async fn find_range(&self, range: RecordRange) -> QuillResult<Vec<Category>>;

    /// Persists every field of an existing category.
    async fn update(&self, category: &Category) -> QuillResult<Category>;

    /// Soft-deletes a category, returning the deleted record if it existed.
    async fn delete(&self, id: CategoryId) -> QuillResult<Option<Category>>;
}

/// Post record store.
#[async_trait]
pub trait PostRepository: Interface + Send + Sync {
    /// Inserts a post and returns it with its store-assigned id.
    async fn create(&self, post: &Post) -> QuillResult<Post>;

    /// Finds a live post by ID.
    async fn find_by_id(&self, id: PostId) -> QuillResult<Option<Post>>;

    /// Returns live posts in id order within the inclusive range.
    async fn find_range(&self, range: RecordRange) -> QuillResult<Vec<Post>>;

    /// Persists every field of an existing post.
    async fn update(&self, post: &Post) -> QuillResult<Post>;

    /// Soft-deletes a post, returning the deleted record if it existed.
    async fn delete(&self, id: PostId) -> QuillResult<Option<Post>>;
}
