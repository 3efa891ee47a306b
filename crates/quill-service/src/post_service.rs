//! Post service trait definition.

use crate::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};
use async_trait::async_trait;
use quill_core::{Interface, PostId, QuillResult, RecordRange, UserId};

/// Post service trait.
#[async_trait]
pub trait PostService: Interface + Send + Sync {
    /// Creates a post authored by `author`. The slug is derived from the title.
    async fn create_post(&self, author: UserId, request: CreatePostRequest)
        -> QuillResult<PostResponse>;

    /// Gets a post by ID.
    async fn get_post(&self, id: PostId) -> QuillResult<PostResponse>;

    /// Lists posts in the inclusive range.
    async fn list_posts(&self, range: RecordRange) -> QuillResult<Vec<PostResponse>>;

    /// Applies a sparse update. A new title re-derives the slug.
    async fn update_post(&self, id: PostId, request: UpdatePostRequest) -> QuillResult<PostResponse>;

    /// Deletes a post and returns the deleted record.
    async fn delete_post(&self, id: PostId) -> QuillResult<PostResponse>;
}
