//! Configuration error types

use thiserror::Error;

/// Errors raised while loading layered configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Figment failed to extract the configuration
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}
