//! User service implementation.

use crate::cache::{cache_keys::USERS, CacheExt, CacheInterface};
use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use crate::merge::{Merge, UserPatch};
use crate::user_service::UserService;
use async_trait::async_trait;
use quill_core::{QuillError, QuillResult, RecordRange, Role, User, UserId, ValidateExt};
use quill_repository::UserRepository;
use quill_security::PasswordHasherInterface;
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Cache-aside user service.
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct UserServiceComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    /// TTL for cached records and pages; zero never expires.
    entry_ttl: Duration,
}

impl UserServiceComponent {
    /// Creates a user service outside the DI container.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        cache: Arc<dyn CacheInterface>,
        entry_ttl: Duration,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            cache,
            entry_ttl,
        }
    }

    /// Builds the component parameters for DI registration.
    #[must_use]
    pub fn parameters(entry_ttl: Duration) -> UserServiceComponentParameters {
        UserServiceComponentParameters { entry_ttl }
    }

    async fn load(&self, id: UserId) -> QuillResult<User> {
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| QuillError::not_found("User", id))
    }
}

#[async_trait]
impl UserService for UserServiceComponent {
    async fn create_user(&self, request: CreateUserRequest) -> QuillResult<UserResponse> {
        debug!("Creating user: {}", request.email);

        request.validate_request()?;

        let password_hash = self.password_hasher.hash(&request.password)?;
        let user = User::new(request.name, request.email, password_hash, Role::User);

        let saved = self.user_repository.create(&user).await?;

        self.cache
            .set(&USERS.record(saved.id), &saved, self.entry_ttl)
            .await?;
        self.cache.delete_by_prefix(&USERS.collection_prefix()).await?;

        info!("User created: {}", saved.id);
        Ok(UserResponse::from(saved))
    }

    async fn get_user(&self, id: UserId) -> QuillResult<UserResponse> {
        debug!("Getting user: {}", id);

        let user: User = self
            .cache
            .read_through(&USERS.record(id), self.entry_ttl, || self.load(id))
            .await?;

        Ok(UserResponse::from(user))
    }

    async fn list_users(&self, range: RecordRange) -> QuillResult<Vec<UserResponse>> {
        debug!("Listing users {}", range);

        let users: Vec<User> = self
            .cache
            .read_through(&USERS.page(range), self.entry_ttl, || {
                self.user_repository.find_range(range)
            })
            .await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn update_user(
        &self,
        id: UserId,
        request: UpdateUserRequest,
    ) -> QuillResult<UserResponse> {
        debug!("Updating user: {}", id);

        request.validate_request()?;

        let key = USERS.record(id);
        let mut user = match self.cache.lookup::<User>(&key).await {
            Some(cached) => cached,
            None => self.load(id).await?,
        };

        let password_hash = if request.password.is_empty() {
            String::new()
        } else {
            self.password_hasher.hash(&request.password)?
        };
        user.merge(UserPatch {
            name: request.name,
            email: request.email,
            password_hash,
        });

        let updated = self.user_repository.update(&user).await?;

        self.cache.invalidate(&key, &USERS.collection_prefix()).await?;
        self.cache.set(&key, &updated, self.entry_ttl).await?;

        info!("User updated: {}", id);
        Ok(UserResponse::from(updated))
    }

    async fn delete_user(&self, id: UserId) -> QuillResult<UserResponse> {
        debug!("Deleting user: {}", id);

        self.cache
            .invalidate(&USERS.record(id), &USERS.collection_prefix())
            .await?;

        let deleted = self
            .user_repository
            .delete(id)
            .await?
            .ok_or_else(|| QuillError::not_found("User", id))?;

        info!("User deleted: {}", id);
        Ok(UserResponse::from(deleted))
    }
}

impl std::fmt::Debug for UserServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceComponent")
            .field("entry_ttl", &self.entry_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryCache, InMemoryUserRepository};
    use quill_security::PasswordHasher;

    struct Fixture {
        repo: Arc<InMemoryUserRepository>,
        cache: Arc<InMemoryCache>,
        hasher: Arc<PasswordHasher>,
        service: UserServiceComponent,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryUserRepository::new());
        let cache = Arc::new(InMemoryCache::new());
        let hasher = Arc::new(PasswordHasher::with_cost(1));
        let service = UserServiceComponent::new(
            repo.clone(),
            hasher.clone(),
            cache.clone(),
            Duration::ZERO,
        );
        Fixture {
            repo,
            cache,
            hasher,
            service,
        }
    }

    fn create_request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password_and_caches_record() {
        let f = fixture();

        let created = f.service.create_user(create_request("ana@example.com")).await.unwrap();
        assert_eq!(created.role, Role::User);

        let cached: User = serde_json::from_str(
            &f.cache.get_raw(&USERS.record(created.id)).await.unwrap().unwrap(),
        )
        .unwrap();
        assert_ne!(cached.password_hash, "password123");
        assert!(f.hasher.verify("password123", &cached.password_hash).unwrap());
        assert_eq!(f.cache.ttl_of(&USERS.record(created.id)), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_create_user_clears_pages_and_next_page_read_hits_store() {
        let f = fixture();
        f.service.create_user(create_request("ana@example.com")).await.unwrap();
        let range = RecordRange::new(0, 10).unwrap();
        f.service.list_users(range).await.unwrap();
        assert!(f.cache.contains("users:0-10"));
        let reads_before = f.repo.reads();

        f.service.create_user(create_request("bea@example.com")).await.unwrap();
        assert!(!f.cache.contains("users:0-10"));

        let page = f.service.list_users(range).await.unwrap();
        assert_eq!(f.repo.reads(), reads_before + 1);
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_request() {
        let f = fixture();
        let mut request = create_request("not-an-email");
        request.password = "short".to_string();

        let result = f.service.create_user(request).await;
        assert!(matches!(result, Err(QuillError::Validation(_))));
        assert!(f.cache.keys().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let f = fixture();
        f.service.create_user(create_request("ana@example.com")).await.unwrap();

        let result = f.service.create_user(create_request("ana@example.com")).await;
        assert!(matches!(result, Err(QuillError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_get_user_reads_store_once() {
        let f = fixture();
        let saved = f
            .repo
            .create(&User::new(
                "Ana".to_string(),
                "ana@example.com".to_string(),
                "hash".to_string(),
                Role::User,
            ))
            .await
            .unwrap();

        f.service.get_user(saved.id).await.unwrap();
        assert_eq!(f.repo.reads(), 1);

        let again = f.service.get_user(saved.id).await.unwrap();
        assert_eq!(f.repo.reads(), 1);
        assert_eq!(again.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_get_missing_user_is_not_cached() {
        let f = fixture();

        let result = f.service.get_user(UserId::new(42)).await;
        assert!(matches!(result, Err(QuillError::NotFound { .. })));
        assert!(!f.cache.contains("user:42"));

        let _ = f.service.get_user(UserId::new(42)).await;
        assert_eq!(f.repo.reads(), 2);
    }

    #[tokio::test]
    async fn test_update_rehashes_password_and_refreshes_cache() {
        let f = fixture();
        let created = f.service.create_user(create_request("ana@example.com")).await.unwrap();
        f.service.list_users(RecordRange::new(0, 10).unwrap()).await.unwrap();
        assert!(f.cache.contains("users:0-10"));

        let updated = f
            .service
            .update_user(
                created.id,
                UpdateUserRequest {
                    name: "Bea".to_string(),
                    password: "new password".to_string(),
                    ..UpdateUserRequest::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Bea");
        assert_eq!(updated.email, "ana@example.com");
        assert!(!f.cache.contains("users:0-10"));

        let cached: User = serde_json::from_str(
            &f.cache.get_raw(&USERS.record(created.id)).await.unwrap().unwrap(),
        )
        .unwrap();
        assert_eq!(cached.name, "Bea");
        assert!(f.hasher.verify("new password", &cached.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let f = fixture();
        let result = f
            .service
            .update_user(UserId::new(9), UpdateUserRequest::default())
            .await;
        assert!(matches!(result, Err(QuillError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let f = fixture();
        let created = f.service.create_user(create_request("ana@example.com")).await.unwrap();

        let deleted = f.service.delete_user(created.id).await.unwrap();
        assert_eq!(deleted.id, created.id);
        assert!(!f.cache.contains(&USERS.record(created.id)));

        let result = f.service.get_user(created.id).await;
        assert!(matches!(result, Err(QuillError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_clears_pages_and_next_page_read_hits_store() {
        let f = fixture();
        let kept = f.service.create_user(create_request("ana@example.com")).await.unwrap();
        let doomed = f.service.create_user(create_request("bea@example.com")).await.unwrap();
        let range = RecordRange::new(0, 10).unwrap();
        f.service.list_users(range).await.unwrap();
        assert!(f.cache.contains("users:0-10"));
        let reads_before = f.repo.reads();

        f.service.delete_user(doomed.id).await.unwrap();
        assert!(!f.cache.contains("users:0-10"));

        let page = f.service.list_users(range).await.unwrap();
        assert_eq!(f.repo.reads(), reads_before + 1);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let f = fixture();
        let result = f.service.delete_user(UserId::new(3)).await;
        assert!(matches!(result, Err(QuillError::NotFound { .. })));
    }
}
