//! Category-related DTOs.

use chrono::{DateTime, Utc};
use quill_core::rules::{blank_or_text, not_blank};
use quill_core::{Category, CategoryId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(
        length(max = 100, message = "Name cannot exceed 100 characters"),
        custom(function = "not_blank", message = "Name is required")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: String,
}

/// Sparse category update. Empty fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct UpdateCategoryRequest {
    #[validate(
        length(max = 100, message = "Name cannot exceed 100 characters"),
        custom(function = "blank_or_text", message = "Name cannot be whitespace")
    )]
    pub name: String,

    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: String,
}

/// Category response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}
