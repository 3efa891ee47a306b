//! Token claims extractor.

use crate::responses::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use quill_core::QuillError;
use quill_security::Claims;

/// Extractor for authenticated caller claims.
///
/// Claims are placed in the request extensions by the auth middleware once
/// the access token validates. Their absence means the token was missing,
/// malformed or expired.
pub struct AuthenticatedUser(pub Claims);

impl std::ops::Deref for AuthenticatedUser {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or_else(|| QuillError::unauthorized("missing or invalid access token").into())
    }
}
