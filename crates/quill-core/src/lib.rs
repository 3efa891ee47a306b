//! # Quill Core
//!
//! Core types, domain records, and error definitions shared by every Quill crate.

pub mod domain;
pub mod error;
pub mod id;
pub mod range;
pub mod result;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use range::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::{module, Component, HasComponent, Interface};
