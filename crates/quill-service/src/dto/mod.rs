//! Data transfer objects.

mod auth_dto;
mod category_dto;
mod post_dto;
mod user_dto;

pub use auth_dto::*;
pub use category_dto::*;
pub use post_dto::*;
pub use user_dto::*;
