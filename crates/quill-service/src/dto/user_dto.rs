//! User-related DTOs.

use chrono::{DateTime, Utc};
use quill_core::rules::{blank_or_text, not_blank};
use quill_core::{Role, User, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

/// Minimum password length for new and changed passwords.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Request to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(
        length(max = 100, message = "Name cannot exceed 100 characters"),
        custom(function = "not_blank", message = "Name is required")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Sparse user update. Empty fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[validate(
        length(max = 100, message = "Name cannot exceed 100 characters"),
        custom(function = "blank_or_text", message = "Name cannot be whitespace")
    )]
    pub name: String,

    #[validate(custom(function = "blank_or_email", message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(
        function = "blank_or_password",
        message = "Password must be at least 8 characters"
    ))]
    pub password: String,
}

fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}

fn blank_or_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().count() >= MIN_PASSWORD_LENGTH {
        Ok(())
    } else {
        Err(ValidationError::new("length"))
    }
}

/// User response DTO. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
