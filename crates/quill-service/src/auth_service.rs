//! Authentication service trait definition.

use crate::dto::{LoginRequest, LoginResponse};
use async_trait::async_trait;
use quill_core::{Interface, QuillResult};
use quill_security::Claims;

/// Authentication service trait.
///
/// Tokens are stateless: nothing is stored server side, so logout is purely
/// a client concern.
#[async_trait]
pub trait AuthService: Interface + Send + Sync {
    /// Verifies credentials and issues a refresh and an access token.
    ///
    /// An unknown email and a wrong password are both `Unauthorized`.
    async fn login(&self, request: LoginRequest) -> QuillResult<LoginResponse>;

    /// Exchanges a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> QuillResult<String>;

    /// Validates an access token and returns its claims.
    fn validate_access_token(&self, token: &str) -> QuillResult<Claims>;

    /// Refresh token lifetime in seconds.
    fn refresh_token_max_age(&self) -> i64;

    /// Access token lifetime in seconds.
    fn access_token_max_age(&self) -> i64;
}
