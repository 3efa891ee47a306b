//! Service implementations wired through Shaku.

mod auth_service_impl;
mod category_service_impl;
mod post_service_impl;
mod user_service_impl;

pub use auth_service_impl::*;
pub use category_service_impl::*;
pub use post_service_impl::*;
pub use user_service_impl::*;
