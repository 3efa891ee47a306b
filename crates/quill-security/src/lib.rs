//! # Quill Security
//!
//! Stateless signed tokens, Argon2 password hashing, and role gating by
//! exact allow-set membership.

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::*;
pub use password::*;
pub use rbac::*;
