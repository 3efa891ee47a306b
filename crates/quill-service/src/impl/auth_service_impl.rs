//! Authentication service implementation.

use crate::auth_service::AuthService;
use crate::dto::{LoginRequest, LoginResponse};
use async_trait::async_trait;
use quill_core::{QuillError, QuillResult, ValidateExt};
use quill_repository::UserRepository;
use quill_security::{Claims, PasswordHasherInterface, TokenProviderInterface};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Authentication service backed by the user store.
///
/// Logins read the store directly so a stale cached user can never
/// authenticate.
#[derive(Component)]
#[shaku(interface = AuthService)]
pub struct AuthServiceComponent {
    #[shaku(inject)]
    user_repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    token_provider: Arc<dyn TokenProviderInterface>,
}

impl AuthServiceComponent {
    /// Creates an auth service outside the DI container.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        token_provider: Arc<dyn TokenProviderInterface>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_provider,
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceComponent {
    async fn login(&self, request: LoginRequest) -> QuillResult<LoginResponse> {
        debug!("Login attempt for: {}", request.email);

        request.validate_request()?;

        let Some(user) = self.user_repository.find_by_email(&request.email).await? else {
            warn!("Login failed: unknown email");
            return Err(QuillError::unauthorized(INVALID_CREDENTIALS));
        };

        if !self
            .password_hasher
            .verify(&request.password, &user.password_hash)?
        {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(QuillError::unauthorized(INVALID_CREDENTIALS));
        }

        let tokens = self.token_provider.generate_token_pair(&user)?;

        info!("User logged in: {}", user.id);
        Ok(LoginResponse {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> QuillResult<String> {
        let claims = self.token_provider.validate_refresh_token(refresh_token)?;

        let user = self
            .user_repository
            .find_by_email(&claims.email)
            .await?
            .ok_or_else(|| QuillError::unauthorized("user no longer exists"))?;

        let access_token = self.token_provider.generate_access_token(&user)?;

        debug!("Access token refreshed for user {}", user.id);
        Ok(access_token)
    }

    fn validate_access_token(&self, token: &str) -> QuillResult<Claims> {
        self.token_provider.validate_access_token(token)
    }

    fn refresh_token_max_age(&self) -> i64 {
        self.token_provider.refresh_token_ttl_secs()
    }

    fn access_token_max_age(&self) -> i64 {
        self.token_provider.access_token_ttl_secs()
    }
}

impl std::fmt::Debug for AuthServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceComponent").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryUserRepository;
    use quill_core::{Role, User, UserId};
    use quill_security::{PasswordHasher, TokenProvider};

    const REFRESH_SECRET: &str = "refresh-secret-key-that-is-at-least-32-chars";
    const ACCESS_SECRET: &str = "access-secret-key-that-is-at-least-32-chars!";

    struct Fixture {
        repo: Arc<InMemoryUserRepository>,
        tokens: Arc<TokenProvider>,
        service: AuthServiceComponent,
    }

    async fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(PasswordHasher::with_cost(1));
        let tokens = Arc::new(TokenProvider::new(REFRESH_SECRET, ACCESS_SECRET, 7, 900));

        let hash = hasher.hash("password123").unwrap();
        repo.create(&User::new(
            "Ana".to_string(),
            "ana@example.com".to_string(),
            hash,
            Role::Admin,
        ))
        .await
        .unwrap();

        let service = AuthServiceComponent::new(repo.clone(), hasher, tokens.clone());
        Fixture {
            repo,
            tokens,
            service,
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_token_pair() {
        let f = fixture().await;

        let response = f
            .service
            .login(login("ana@example.com", "password123"))
            .await
            .unwrap();

        let access = f.tokens.validate_access_token(&response.access_token).unwrap();
        assert_eq!(access.sub, UserId::new(1));
        assert_eq!(access.role, Role::Admin);
        let refresh = f.tokens.validate_refresh_token(&response.refresh_token).unwrap();
        assert_eq!(refresh.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let f = fixture().await;
        let result = f.service.login(login("ana@example.com", "wrong-password")).await;
        assert!(matches!(result, Err(QuillError::Unauthorized(ref m)) if m == INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_unauthorized() {
        let f = fixture().await;
        let result = f.service.login(login("bob@example.com", "password123")).await;
        assert!(matches!(result, Err(QuillError::Unauthorized(ref m)) if m == INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_login_malformed_request_is_validation_error() {
        let f = fixture().await;
        let result = f.service.login(login("not-an-email", "short")).await;
        assert!(matches!(result, Err(QuillError::Validation(_))));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_access_token() {
        let f = fixture().await;
        let response = f
            .service
            .login(login("ana@example.com", "password123"))
            .await
            .unwrap();

        let access_token = f.service.refresh(&response.refresh_token).await.unwrap();
        let claims = f.service.validate_access_token(&access_token).unwrap();
        assert!(claims.is_access_token());
        assert_eq!(claims.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let f = fixture().await;
        let response = f
            .service
            .login(login("ana@example.com", "password123"))
            .await
            .unwrap();

        let result = f.service.refresh(&response.access_token).await;
        assert!(matches!(result, Err(QuillError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_refresh_for_deleted_user_is_unauthorized() {
        let f = fixture().await;
        let response = f
            .service
            .login(login("ana@example.com", "password123"))
            .await
            .unwrap();
        f.repo.delete(UserId::new(1)).await.unwrap();

        let result = f.service.refresh(&response.refresh_token).await;
        assert!(matches!(result, Err(QuillError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_token_max_ages() {
        let f = fixture().await;
        assert_eq!(f.service.refresh_token_max_age(), 7 * 86_400);
        assert_eq!(f.service.access_token_max_age(), 900);
    }
}
