//! Password Vault Core Library
//!
//! Create, read, update and delete named (resource, user) credentials in a
//! platform-native credential store, with passwords held in zeroing memory
//! buffers rather than plain strings.

pub mod config;
pub mod error;
pub mod security;

// Re-export main types
pub use config::{BackendKind, ConfigManager, VaultConfig};
pub use error::{Error, Result};
pub use security::{
    InMemoryStore, NativeCredentialStore, NativeEntry, PasswordVaultManager, SecureString,
    VaultCredential, VaultManager, complete_resource_name, create_vault_manager,
};
