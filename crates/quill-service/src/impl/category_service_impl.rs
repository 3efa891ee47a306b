//! Category service implementation.

use crate::cache::{cache_keys::CATEGORIES, CacheExt, CacheInterface};
use crate::category_service::CategoryService;
use crate::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::merge::{CategoryPatch, Merge};
use async_trait::async_trait;
use quill_core::{Category, CategoryId, QuillError, QuillResult, RecordRange, ValidateExt};
use quill_repository::CategoryRepository;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Cache-aside category service.
#[derive(Component)]
#[shaku(interface = CategoryService)]
pub struct CategoryServiceComponent {
    #[shaku(inject)]
    category_repository: Arc<dyn CategoryRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    entry_ttl: Duration,
}

impl CategoryServiceComponent {
    /// Creates a category service outside the DI container.
    #[must_use]
    pub fn new(
        category_repository: Arc<dyn CategoryRepository>,
        cache: Arc<dyn CacheInterface>,
        entry_ttl: Duration,
    ) -> Self {
        Self {
            category_repository,
            cache,
            entry_ttl,
        }
    }

    /// Builds the component parameters for DI registration.
    #[must_use]
    pub fn parameters(entry_ttl: Duration) -> CategoryServiceComponentParameters {
        CategoryServiceComponentParameters { entry_ttl }
    }

    async fn load(&self, id: CategoryId) -> QuillResult<Category> {
        self.category_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| QuillError::not_found("Category", id))
    }
}

#[async_trait]
impl CategoryService for CategoryServiceComponent {
    async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> QuillResult<CategoryResponse> {
        debug!("Creating category: {}", request.name);

        request.validate_request()?;

        let category = Category::new(request.name, request.description);
        let saved = self.category_repository.create(&category).await?;

        self.cache
            .set(&CATEGORIES.record(saved.id), &saved, self.entry_ttl)
            .await?;
        self.cache
            .delete_by_prefix(&CATEGORIES.collection_prefix())
            .await?;

        info!("Category created: {}", saved.id);
        Ok(CategoryResponse::from(saved))
    }

    async fn get_category(&self, id: CategoryId) -> QuillResult<CategoryResponse> {
        let category: Category = self
            .cache
            .read_through(&CATEGORIES.record(id), self.entry_ttl, || self.load(id))
            .await?;

        Ok(CategoryResponse::from(category))
    }

    async fn list_categories(&self, range: RecordRange) -> QuillResult<Vec<CategoryResponse>> {
        let categories: Vec<Category> = self
            .cache
            .read_through(&CATEGORIES.page(range), self.entry_ttl, || {
                self.category_repository.find_range(range)
            })
            .await?;

        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    async fn update_category(
        &self,
        id: CategoryId,
        request: UpdateCategoryRequest,
    ) -> QuillResult<CategoryResponse> {
        debug!("Updating category: {}", id);

        request.validate_request()?;

        let key = CATEGORIES.record(id);
        let mut category = match self.cache.lookup::<Category>(&key).await {
            Some(cached) => cached,
            None => self.load(id).await?,
        };

        category.merge(CategoryPatch {
            name: request.name,
            description: request.description,
        });

        let updated = self.category_repository.update(&category).await?;

        self.cache
            .invalidate(&key, &CATEGORIES.collection_prefix())
            .await?;
        self.cache.set(&key, &updated, self.entry_ttl).await?;

        info!("Category updated: {}", id);
        Ok(CategoryResponse::from(updated))
    }

    async fn delete_category(&self, id: CategoryId) -> QuillResult<CategoryResponse> {
        debug!("Deleting category: {}", id);

        self.cache
            .invalidate(&CATEGORIES.record(id), &CATEGORIES.collection_prefix())
            .await?;

        let deleted = self
            .category_repository
            .delete(id)
            .await?
            .ok_or_else(|| QuillError::not_found("Category", id))?;

        info!("Category deleted: {}", id);
        Ok(CategoryResponse::from(deleted))
    }
}

impl std::fmt::Debug for CategoryServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryServiceComponent")
            .field("entry_ttl", &self.entry_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MockCacheInterface;
    use crate::testing::{InMemoryCache, InMemoryCategoryRepository};
    use mockall::Sequence;

    fn create_request(name: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.to_string(),
            description: "About things".to_string(),
        }
    }

    fn service_with(
        cache: Arc<dyn CacheInterface>,
    ) -> (Arc<InMemoryCategoryRepository>, CategoryServiceComponent) {
        let repo = Arc::new(InMemoryCategoryRepository::new());
        let service =
            CategoryServiceComponent::new(repo.clone(), cache, Duration::from_secs(300));
        (repo, service)
    }

    #[tokio::test]
    async fn test_create_caches_record_then_clears_pages() {
        let mut cache = MockCacheInterface::new();
        let mut seq = Sequence::new();
        cache
            .expect_set_raw()
            .withf(|key, _, ttl| key == "category:1" && *ttl == Duration::from_secs(300))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        cache
            .expect_delete_by_prefix()
            .withf(|key| key == "categories:")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(3));

        let (_, service) = service_with(Arc::new(cache));
        let created = service.create_category(create_request("Rust")).await.unwrap();
        assert_eq!(created.id, CategoryId::new(1));
    }

    #[tokio::test]
    async fn test_delete_invalidates_before_store_delete() {
        let mut cache = MockCacheInterface::new();
        let mut seq = Sequence::new();
        cache
            .expect_delete()
            .withf(|key| key == "category:7")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(false));
        cache
            .expect_delete_by_prefix()
            .withf(|key| key == "categories:")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(0));

        let (_, service) = service_with(Arc::new(cache));
        let result = service.delete_category(CategoryId::new(7)).await;
        assert!(matches!(result, Err(QuillError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_cache_write_failure_fails_create_after_commit() {
        let cache = Arc::new(InMemoryCache::new());
        cache.fail_writes(true);
        let (repo, service) = service_with(cache.clone());

        let result = service.create_category(create_request("Rust")).await;
        assert!(matches!(result, Err(QuillError::Cache(_))));

        // The store write is not rolled back.
        let stored = repo.find_by_id(CategoryId::new(1)).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_cache_read_failure_falls_back_to_store() {
        let cache = Arc::new(InMemoryCache::new());
        let (repo, service) = service_with(cache.clone());
        let created = service.create_category(create_request("Rust")).await.unwrap();

        cache.fail_reads(true);
        let fetched = service.get_category(created.id).await.unwrap();
        assert_eq!(fetched.name, "Rust");
        assert_eq!(repo.reads(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let cache = Arc::new(InMemoryCache::new());
        let (repo, service) = service_with(cache.clone());
        let created = service.create_category(create_request("Rust")).await.unwrap();

        cache.insert_raw(&CATEGORIES.record(created.id), "{not json");
        let fetched = service.get_category(created.id).await.unwrap();
        assert_eq!(fetched.name, "Rust");
        assert_eq!(repo.reads(), 1);

        // Repopulated with a valid entry.
        service.get_category(created.id).await.unwrap();
        assert_eq!(repo.reads(), 1);
    }

    #[tokio::test]
    async fn test_list_is_cached_per_range() {
        let cache = Arc::new(InMemoryCache::new());
        let (repo, service) = service_with(cache.clone());
        for name in ["Rust", "Go", "Zig"] {
            service.create_category(create_request(name)).await.unwrap();
        }

        let page = service
            .list_categories(RecordRange::new(0, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert!(cache.contains("categories:0-1"));

        service
            .list_categories(RecordRange::new(0, 1).unwrap())
            .await
            .unwrap();
        assert_eq!(repo.reads(), 1);

        service
            .list_categories(RecordRange::new(1, 2).unwrap())
            .await
            .unwrap();
        assert_eq!(repo.reads(), 2);
    }

    #[tokio::test]
    async fn test_update_merges_over_cached_base() {
        let cache = Arc::new(InMemoryCache::new());
        let (repo, service) = service_with(cache.clone());
        let created = service.create_category(create_request("Rust")).await.unwrap();

        let updated = service
            .update_category(
                created.id,
                UpdateCategoryRequest {
                    description: "Systems programming".to_string(),
                    ..UpdateCategoryRequest::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Rust");
        assert_eq!(updated.description, "Systems programming");
        assert_eq!(repo.reads(), 0);
        assert_eq!(
            service.get_category(created.id).await.unwrap().description,
            "Systems programming"
        );
    }

    #[tokio::test]
    async fn test_update_clears_pages_and_next_page_read_hits_store() {
        let cache = Arc::new(InMemoryCache::new());
        let (repo, service) = service_with(cache.clone());
        let created = service.create_category(create_request("Rust")).await.unwrap();
        let range = RecordRange::new(0, 10).unwrap();
        service.list_categories(range).await.unwrap();
        assert!(cache.contains("categories:0-10"));
        let reads_before = repo.reads();

        service
            .update_category(
                created.id,
                UpdateCategoryRequest {
                    name: "Rustacean".to_string(),
                    ..UpdateCategoryRequest::default()
                },
            )
            .await
            .unwrap();
        assert!(!cache.contains("categories:0-10"));

        let page = service.list_categories(range).await.unwrap();
        assert_eq!(repo.reads(), reads_before + 1);
        assert_eq!(page[0].name, "Rustacean");
    }

    #[tokio::test]
    async fn test_update_to_taken_name_is_conflict() {
        let cache = Arc::new(InMemoryCache::new());
        let (_, service) = service_with(cache);
        service.create_category(create_request("Rust")).await.unwrap();
        let go = service.create_category(create_request("Go")).await.unwrap();

        let result = service
            .update_category(
                go.id,
                UpdateCategoryRequest {
                    name: "Rust".to_string(),
                    ..UpdateCategoryRequest::default()
                },
            )
            .await;
        assert!(matches!(result, Err(QuillError::Conflict(_))));
    }
}
