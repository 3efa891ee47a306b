//! Custom Axum extractors.

mod claims;
mod range;
mod validated;

pub use claims::*;
pub use range::*;
pub use validated::*;
