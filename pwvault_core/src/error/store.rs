//! Native credential store error types

use thiserror::Error;

/// Faults reported by a native credential store
#[derive(Error, Debug)]
pub enum StoreError {
    /// No entry exists for the given resource and user
    #[error("Credential not found: {resource} / {user_name}")]
    NotFound { resource: String, user_name: String },

    /// The store rejected the values it was given
    #[error("Invalid input for credential store: {message}")]
    InvalidInput { message: String },

    /// The store refused access to the current user
    #[error("Failed to access credential store: {message}")]
    AccessDenied { message: String },

    /// Platform-specific error
    #[error("Platform error: {message}")]
    Platform { message: String },

    /// Shared store state was poisoned by a panicking writer
    #[error("Credential store lock poisoned")]
    LockPoisoned,

    /// The operation is not supported on this platform
    #[error("Credential store '{backend}' is not supported on this platform")]
    NotSupported { backend: String },
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(resource: &str, user_name: &str) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            user_name: user_name.to_string(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an access denied error
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied {
            message: message.into(),
        }
    }

    /// Create a platform error
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }

    /// Create a not supported error
    pub fn not_supported(backend: &str) -> Self {
        Self::NotSupported {
            backend: backend.to_string(),
        }
    }

    /// Check if this error means the entry does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = StoreError::not_found("intranet/", "alice");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("Credential not found"));
        assert!(error.to_string().contains("intranet/"));
        assert!(error.to_string().contains("alice"));
    }

    #[test]
    fn test_platform_error() {
        let error = StoreError::platform("0x80070005");
        assert!(!error.is_not_found());
        assert_eq!(error.to_string(), "Platform error: 0x80070005");
    }

    #[test]
    fn test_not_supported_error() {
        let error = StoreError::not_supported("windows-password-vault");
        assert!(error.to_string().contains("windows-password-vault"));
        assert!(error.to_string().contains("not supported"));
    }

    #[test]
    fn test_poison_conversion() {
        let lock = std::sync::Mutex::new(0u8);
        let poisoned = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = lock.lock().unwrap();
                    panic!("poison the lock");
                })
                .join()
                .ok();
            lock.lock().map(|_| ()).map_err(StoreError::from)
        });

        assert!(matches!(poisoned, Err(StoreError::LockPoisoned)));
    }
}
