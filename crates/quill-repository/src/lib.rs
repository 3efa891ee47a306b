//! # Quill Repository
//!
//! Record stores for users, categories and posts. The store is the source of
//! truth; every family is soft-deleted through a `deleted_at` marker, and
//! uniqueness (user email, category name, post slug) holds among live rows.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>     (record store interface)
//! PgUserRepository                 (PostgreSQL / SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```

pub mod pool;
pub mod postgres;
pub mod traits;

pub use pool::*;
pub use postgres::*;
pub use traits::*;
