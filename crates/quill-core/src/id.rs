//! Typed ID wrappers for domain records.
//!
//! Ids are assigned by the record store. The zero value marks an id that
//! has not been assigned yet, and is treated as "absent" by partial updates.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::num::ParseIntError;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Wraps a raw store id.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Parses an id from a string.
            pub fn parse(s: &str) -> Result<Self, ParseIntError> {
                Ok(Self(s.trim().parse()?))
            }

            /// Returns the inner value.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }

            /// Returns true if the id has not been assigned.
            #[must_use]
            pub const fn is_zero(self) -> bool {
                self.0 == 0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

record_id!(
    /// A strongly-typed wrapper for user IDs.
    UserId
);

record_id!(
    /// A strongly-typed wrapper for category IDs.
    CategoryId
);

record_id!(
    /// A strongly-typed wrapper for post IDs.
    PostId
);
