//! Shared form-field validation helpers.
//!
//! Reusable checks applied at the input boundary by the store's create and
//! edit paths. The domain types themselves do not re-check.

use crate::error::CoreError;

/// Validate that a required text field is non-empty.
pub fn validate_required_text(value: &str, name: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}

/// Validate that a numeric amount is strictly positive.
pub fn validate_positive_amount(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a numeric amount is zero or greater.
pub fn validate_non_negative_amount(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a count is at least one.
pub fn validate_positive_count(value: u32, name: &str) -> Result<(), CoreError> {
    if value == 0 {
        return Err(CoreError::Validation(format!("{name} must be at least 1")));
    }
    Ok(())
}

/// Validate the shape of an email address.
///
/// Form-level check only: one `@` with text on both sides.
pub fn validate_email(value: &str) -> Result<(), CoreError> {
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() {
        return Err(CoreError::Validation(format!(
            "'{value}' is not a valid email address"
        )));
    }
    Ok(())
}
