//! PostgreSQL record store implementations.

mod category_repository;
mod post_repository;
mod user_repository;

pub use category_repository::*;
pub use post_repository::*;
pub use user_repository::*;

use quill_core::{QuillError, QuillResult, RecordRange};

/// Converts a record range into `(OFFSET, LIMIT)` bind values.
pub(crate) fn range_bounds(range: RecordRange) -> QuillResult<(i64, i64)> {
    let offset = i64::try_from(range.offset())
        .map_err(|_| QuillError::validation("range start is too large"))?;
    let limit = i64::try_from(range.limit())
        .map_err(|_| QuillError::validation("range is too large"))?;
    Ok((offset, limit))
}
