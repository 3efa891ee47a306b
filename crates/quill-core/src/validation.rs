//! Validation utilities.

use crate::{FieldError, QuillError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `QuillError` on failure.
    fn validate_request(&self) -> Result<(), QuillError> {
        self.validate().map_err(validation_errors_to_quill_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `QuillError`.
#[must_use]
pub fn validation_errors_to_quill_error(errors: ValidationErrors) -> QuillError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    QuillError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that an optional partial-update string is not whitespace only.
    ///
    /// The empty string means "leave unchanged" and passes.
    pub fn blank_or_text(value: &str) -> Result<(), ValidationError> {
        if !value.is_empty() && value.trim().is_empty() {
            return Err(ValidationError::new("whitespace_only"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email address"))]
        email: String,
        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
    }

    #[test]
    fn test_validate_request_collects_messages() {
        let signup = Signup {
            email: "nope".into(),
            password: "short".into(),
        };
        let err = signup.validate_request().unwrap_err();
        match err {
            QuillError::Validation(msg) => {
                assert!(msg.contains("email: Invalid email address"));
                assert!(msg.contains("password: Password must be at least 8 characters"));
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let signup = Signup {
            email: "ana@example.com".into(),
            password: "long enough".into(),
        };
        assert!(signup.validate_request().is_ok());
    }

    #[test]
    fn test_rules() {
        assert!(rules::not_blank("x").is_ok());
        assert!(rules::not_blank("  ").is_err());
        assert!(rules::blank_or_text("").is_ok());
        assert!(rules::blank_or_text("   ").is_err());
        assert!(rules::blank_or_text("title").is_ok());
    }
}
