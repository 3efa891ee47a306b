//! # Quill Server Library
//!
//! Dependency injection wiring and startup helpers for the Quill binary.

pub mod di;
pub mod startup;
