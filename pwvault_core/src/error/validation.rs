//! Validation related error types

use thiserror::Error;

/// Argument validation errors
///
/// Raised synchronously, before any call into the native store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required parameter was empty or whitespace only
    #[error("Missing required parameter value: {parameter}")]
    MissingParameter { parameter: String },
}

impl ValidationError {
    /// Create a missing parameter error
    pub fn missing_parameter(parameter: &str) -> Self {
        Self::MissingParameter {
            parameter: parameter.to_string(),
        }
    }

    /// Name of the parameter that failed validation
    pub fn parameter(&self) -> &str {
        match self {
            Self::MissingParameter { parameter } => parameter,
        }
    }
}

/// Reject empty and whitespace-only values
pub(crate) fn require_value<'a>(
    parameter: &str,
    value: &'a str,
) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing_parameter(parameter));
    }
    Ok(value)
}
