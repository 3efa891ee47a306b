//! Category service trait definition.

use crate::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use async_trait::async_trait;
use quill_core::{CategoryId, Interface, QuillResult, RecordRange};

/// Category service trait.
#[async_trait]
pub trait CategoryService: Interface + Send + Sync {
    async fn create_category(&self, request: CreateCategoryRequest)
        -> QuillResult<CategoryResponse>;

    async fn get_category(&self, id: CategoryId) -> QuillResult<CategoryResponse>;

    async fn list_categories(&self, range: RecordRange) -> QuillResult<Vec<CategoryResponse>>;

    async fn update_category(
        &self,
        id: CategoryId,
        request: UpdateCategoryRequest,
    ) -> QuillResult<CategoryResponse>;

    async fn delete_category(&self, id: CategoryId) -> QuillResult<CategoryResponse>;
}
