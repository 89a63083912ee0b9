//! Test utilities for the password vault
//!
//! This crate provides a scriptable native store, credential builders and
//! logging setup for testing vault functionality.

pub mod builders;
pub mod logging;
pub mod mocks;

// Re-export commonly used types
pub use builders::CredentialBuilder;
pub use logging::init_test_logging;
pub use mocks::{MockCall, MockEntry, MockNativeStore, MockOperation};
