//! Test data builders

mod credential;

pub use credential::CredentialBuilder;
