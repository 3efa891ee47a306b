//! # Quill Config
//!
//! Configuration management for Quill.
//! Layers TOML files and environment variables, then validates the result
//! once at startup. The loaded [`AppConfig`] is passed explicitly to every
//! component that needs it.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
