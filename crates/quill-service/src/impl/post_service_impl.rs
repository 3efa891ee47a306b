//! Post service implementation.

use crate::cache::{cache_keys::POSTS, CacheExt, CacheInterface};
use crate::dto::{CreatePostRequest, PostResponse, UpdatePostRequest};
use crate::merge::{Merge, PostPatch};
use crate::post_service::PostService;
use async_trait::async_trait;
use quill_core::{Post, PostId, QuillError, QuillResult, RecordRange, UserId, ValidateExt};
use quill_repository::PostRepository;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Cache-aside post service.
///
/// Slugs are not checked for collisions here; the store's unique index
/// turns a duplicate into `Conflict`.
#[derive(Component)]
#[shaku(interface = PostService)]
pub struct PostServiceComponent {
    #[shaku(inject)]
    post_repository: Arc<dyn PostRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    entry_ttl: Duration,
}

impl PostServiceComponent {
    /// Creates a post service outside the DI container.
    #[must_use]
    pub fn new(
        post_repository: Arc<dyn PostRepository>,
        cache: Arc<dyn CacheInterface>,
        entry_ttl: Duration,
    ) -> Self {
        Self {
            post_repository,
            cache,
            entry_ttl,
        }
    }

    /// Builds the component parameters for DI registration.
    #[must_use]
    pub fn parameters(entry_ttl: Duration) -> PostServiceComponentParameters {
        PostServiceComponentParameters { entry_ttl }
    }

    async fn load(&self, id: PostId) -> QuillResult<Post> {
        self.post_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| QuillError::not_found("Post", id))
    }
}

#[async_trait]
impl PostService for PostServiceComponent {
    async fn create_post(
        &self,
        author: UserId,
        request: CreatePostRequest,
    ) -> QuillResult<PostResponse> {
        debug!("Creating post '{}' for user {}", request.title, author);

        request.validate_request()?;

        let post = Post::new(
            request.category_id,
            author,
            request.title,
            request.content,
            request.published,
        );
        let saved = self.post_repository.create(&post).await?;

        self.cache
            .set(&POSTS.record(saved.id), &saved, self.entry_ttl)
            .await?;
        self.cache.delete_by_prefix(&POSTS.collection_prefix()).await?;

        info!(post_id = %saved.id, slug = %saved.slug, "Post created");
        Ok(PostResponse::from(saved))
    }

    async fn get_post(&self, id: PostId) -> QuillResult<PostResponse> {
        let post: Post = self
            .cache
            .read_through(&POSTS.record(id), self.entry_ttl, || self.load(id))
            .await?;

        Ok(PostResponse::from(post))
    }

    async fn list_posts(&self, range: RecordRange) -> QuillResult<Vec<PostResponse>> {
        let posts: Vec<Post> = self
            .cache
            .read_through(&POSTS.page(range), self.entry_ttl, || {
                self.post_repository.find_range(range)
            })
            .await?;

        Ok(posts.into_iter().map(PostResponse::from).collect())
    }

    async fn update_post(&self, id: PostId, request: UpdatePostRequest) -> QuillResult<PostResponse> {
        debug!("Updating post: {}", id);

        request.validate_request()?;

        let key = POSTS.record(id);
        let mut post = match self.cache.lookup::<Post>(&key).await {
            Some(cached) => cached,
            None => self.load(id).await?,
        };

        post.merge(PostPatch {
            category_id: request.category_id,
            title: request.title,
            content: request.content,
            published: request.published,
        });

        let updated = self.post_repository.update(&post).await?;

        self.cache.invalidate(&key, &POSTS.collection_prefix()).await?;
        self.cache.set(&key, &updated, self.entry_ttl).await?;

        info!(post_id = %id, slug = %updated.slug, "Post updated");
        Ok(PostResponse::from(updated))
    }

    async fn delete_post(&self, id: PostId) -> QuillResult<PostResponse> {
        debug!("Deleting post: {}", id);

        self.cache
            .invalidate(&POSTS.record(id), &POSTS.collection_prefix())
            .await?;

        let deleted = self
            .post_repository
            .delete(id)
            .await?
            .ok_or_else(|| QuillError::not_found("Post", id))?;

        info!("Post deleted: {}", id);
        Ok(PostResponse::from(deleted))
    }
}

impl std::fmt::Debug for PostServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostServiceComponent")
            .field("entry_ttl", &self.entry_ttl)
            .finish_non_exhaustive()
    }
}
