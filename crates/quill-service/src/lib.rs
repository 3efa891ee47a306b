//! # Quill Service
//!
//! Cache-aside services for users, categories and posts, plus
//! authentication.
//!
//! Reads go through the cache and fall back to the record store on a miss.
//! Writes hit the store first, then refresh the record's own entry and drop
//! every cached collection page of its family.

pub mod auth_service;
pub mod cache;
pub mod category_service;
pub mod dto;
pub mod r#impl;
pub mod merge;
pub mod post_service;
pub mod user_service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth_service::*;
pub use cache::*;
pub use category_service::*;
pub use dto::*;
pub use merge::*;
pub use post_service::*;
pub use r#impl::*;
pub use user_service::*;
