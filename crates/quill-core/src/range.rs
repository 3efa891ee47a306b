//! Inclusive record ranges for collection reads.

use crate::{QuillError, QuillResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive `[start, end]` window over a record family, ordered by id.
///
/// The window size is `end - start + 1`; the store query is
/// `OFFSET start LIMIT size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRange {
    start: u64,
    end: u64,
}

impl RecordRange {
    /// Creates a range, rejecting `end < start`.
    pub fn new(start: u64, end: u64) -> QuillResult<Self> {
        if end < start {
            return Err(QuillError::validation(format!(
                "invalid range: end {end} is before start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> u64 {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> u64 {
        self.end
    }

    /// Returns the number of records the range spans.
    #[must_use]
    pub const fn size(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.start
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size()
    }
}

impl fmt::Display for RecordRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_size_is_inclusive() {
        let range = RecordRange::new(0, 10).unwrap();
        assert_eq!(range.size(), 11);
        assert_eq!(range.offset(), 0);
        assert_eq!(range.limit(), 11);

        let single = RecordRange::new(5, 5).unwrap();
        assert_eq!(single.size(), 1);
    }

    #[test]
    fn test_range_rejects_reversed_bounds() {
        let err = RecordRange::new(10, 2).unwrap_err();
        assert!(matches!(err, QuillError::Validation(_)));
    }

    #[test]
    fn test_range_display() {
        assert_eq!(RecordRange::new(3, 9).unwrap().to_string(), "3-9");
    }
}
