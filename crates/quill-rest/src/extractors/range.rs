//! Collection range extractor.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use quill_core::{QuillError, RecordRange};
use serde::Deserialize;

/// Raw `?start=&end=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl TryFrom<RangeQuery> for RecordRange {
    type Error = QuillError;

    fn try_from(query: RangeQuery) -> Result<Self, Self::Error> {
        match (query.start, query.end) {
            (Some(start), Some(end)) => RecordRange::new(start, end),
            _ => Err(QuillError::validation(
                "query parameters start and end are required",
            )),
        }
    }
}

/// Extracts a required inclusive range from the query string.
///
/// Missing, non-numeric or reversed bounds are rejected as bad requests.
#[derive(Debug, Clone, Copy)]
pub struct PageRange(pub RecordRange);

#[async_trait]
impl<S> FromRequestParts<S> for PageRange
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<RangeQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| QuillError::validation(e.body_text()))?;
        Ok(Self(RecordRange::try_from(query)?))
    }
}
