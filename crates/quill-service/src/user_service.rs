//! User service trait definition.

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use async_trait::async_trait;
use quill_core::{Interface, QuillResult, RecordRange, UserId};

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Creates a `User`-role account with a hashed password.
    async fn create_user(&self, request: CreateUserRequest) -> QuillResult<UserResponse>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> QuillResult<UserResponse>;

    /// Lists users in the inclusive range.
    async fn list_users(&self, range: RecordRange) -> QuillResult<Vec<UserResponse>>;

    /// Applies a sparse update. A supplied password is re-hashed.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest)
        -> QuillResult<UserResponse>;

    /// Deletes a user and returns the deleted record.
    async fn delete_user(&self, id: UserId) -> QuillResult<UserResponse>;
}
