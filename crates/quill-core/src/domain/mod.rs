//! Domain records for the blog: users, categories and posts.

pub mod category;
pub mod post;
pub mod role;
pub mod user;

pub use category::*;
pub use post::*;
pub use role::*;
pub use user::*;
