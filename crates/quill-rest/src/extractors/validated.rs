//! Validated JSON extractor.
//!
//! Deserializes a JSON body and runs its `validator` rules. Malformed JSON
//! and failed rules are both bad requests; rule failures carry field-level
//! details.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use quill_core::{field_errors, validation_errors_to_quill_error, QuillError};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that validates the deserialized value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| QuillError::validation(format!("Invalid JSON: {rejection}")))?;

        if let Err(errors) = value.validate() {
            let details = field_errors(&errors);
            return Err(AppError::from(validation_errors_to_quill_error(errors)).with_details(details));
        }

        Ok(Self(value))
    }
}
