//! # Quill REST
//!
//! HTTP surface for Quill: registration and token endpoints, CRUD routes for
//! users, categories and posts, and a health check.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
