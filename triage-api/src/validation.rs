//! Validation Traits
//!
//! Request validation runs before any remote capability is touched. These
//! traits keep the handler-level checks consistent.

use crate::error::{ApiError, ApiResult};

/// Trait for validating non-empty strings.
pub trait ValidateNonEmpty {
    /// Validate that the value is non-empty and not whitespace-only.
    ///
    /// # Errors
    /// Returns a validation error naming the field.
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()>;
}

impl ValidateNonEmpty for str {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        if self.trim().is_empty() {
            return Err(ApiError::validation_failed(format!(
                "Required field '{}' is missing or empty",
                field_name
            )));
        }
        Ok(())
    }
}

impl ValidateNonEmpty for String {
    fn validate_non_empty(&self, field_name: &str) -> ApiResult<()> {
        self.as_str().validate_non_empty(field_name)
    }
}

/// Trait for validating maximum string length, in characters.
pub trait ValidateMaxLength {
    /// Validate that the value does not exceed `max` characters.
    fn validate_max_length(&self, field_name: &str, max: usize) -> ApiResult<()>;
}

impl ValidateMaxLength for str {
    fn validate_max_length(&self, field_name: &str, max: usize) -> ApiResult<()> {
        let length = self.chars().count();
        if length > max {
            return Err(ApiError::validation_failed(format!(
                "Field '{}' exceeds maximum length: {} > {}",
                field_name, length, max
            )));
        }
        Ok(())
    }
}

impl ValidateMaxLength for String {
    fn validate_max_length(&self, field_name: &str, max: usize) -> ApiResult<()> {
        self.as_str().validate_max_length(field_name, max)
    }
}
