//! Cache key scheme.
//!
//! A record lives at `<kind>:<id>` and a collection page at
//! `<collection>:<start>-<end>`. Keys carry no global namespace, so the
//! collection prefix of a family never matches one of its record keys.

use quill_core::RecordRange;
use std::fmt::Display;

/// Builds `<kind>:<param>`.
#[must_use]
pub fn key(kind: &str, param: impl Display) -> String {
    format!("{kind}:{param}")
}

/// Builds `<kind>:<p1>-<p2>-...-<pN>`, parameters joined in call order.
#[must_use]
pub fn key_with_params<I>(kind: &str, params: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let joined = params
        .into_iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("-");
    key(kind, joined)
}

/// Key names for one record family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Family {
    /// Namespace of individual records, e.g. `user`.
    pub kind: &'static str,
    /// Namespace of collection pages, e.g. `users`.
    pub collection: &'static str,
}

impl Family {
    /// Key of a single record.
    #[must_use]
    pub fn record(&self, id: impl Display) -> String {
        key(self.kind, id)
    }

    /// Key of one collection page.
    #[must_use]
    pub fn page(&self, range: RecordRange) -> String {
        key_with_params(self.collection, [range.start(), range.end()])
    }

    /// Prefix matching every collection page of the family.
    #[must_use]
    pub fn collection_prefix(&self) -> String {
        format!("{}:", self.collection)
    }
}

pub const USERS: Family = Family {
    kind: "user",
    collection: "users",
};

pub const CATEGORIES: Family = Family {
    kind: "category",
    collection: "categories",
};

pub const POSTS: Family = Family {
    kind: "post",
    collection: "posts",
};
