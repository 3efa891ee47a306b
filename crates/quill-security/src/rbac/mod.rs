//! Role gating.

mod checker;

pub use checker::*;
