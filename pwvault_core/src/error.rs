//! Error types for the password vault library
//!
//! Errors are grouped by where they originate so callers can tell a rejected
//! argument apart from a failure inside the platform credential store.

use thiserror::Error;

pub mod config;
pub mod store;
pub mod validation;

pub use self::config::ConfigError;
pub use self::store::StoreError;
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the password vault library
///
/// - Validation errors: a resource name, user name or record was rejected
///   before the native store was contacted
/// - Store errors: the native credential store reported a fault
/// - Config errors: layered configuration could not be loaded
#[derive(Error, Debug)]
pub enum Error {
    /// Input validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Native credential store errors
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Check if this error was raised by argument validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the native credential store
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn test_validation_error_conversion() {
        let error: Error = ValidationError::missing_parameter("resource_name").into();

        assert!(error.is_validation());
        assert!(!error.is_store());
        assert!(error.to_string().contains("resource_name"));
    }

    #[test]
    fn test_store_error_conversion() {
        let error: Error = StoreError::platform("vault locked").into();

        assert!(error.is_store());
        match error {
            Error::Store(StoreError::Platform { message }) => assert_eq!(message, "vault locked"),
            _ => panic!("Expected Store::Platform error"),
        }
    }

    #[test]
    fn test_transparent_display() {
        let inner = StoreError::not_found("intranet/", "alice");
        let expected = inner.to_string();
        let error = Error::Store(inner);

        assert_eq!(error.to_string(), expected);
        assert!(error.source().is_none());
    }
}
