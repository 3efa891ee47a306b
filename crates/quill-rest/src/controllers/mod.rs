//! REST controllers.

pub mod auth_controller;
pub mod category_controller;
pub mod health_controller;
pub mod post_controller;
pub mod user_controller;

use crate::responses::AppError;
use quill_core::QuillError;

/// Rejects a path id that is not an integer.
pub(crate) fn invalid_id(kind: &str, raw: &str) -> AppError {
    QuillError::validation(format!("Invalid {kind} ID: {raw}")).into()
}
