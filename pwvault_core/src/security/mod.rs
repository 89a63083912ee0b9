//! Security module for credential management and protection
//!
//! This module provides the password vault manager, the secure string used
//! for every password it touches, and the native credential stores it can
//! delegate to.

pub mod credential;
pub mod manager;
pub mod memory;
pub mod native_store;
pub mod resource_name;
pub mod secure_string;

// Windows password vault backend
#[cfg(windows)]
pub mod windows_vault;

// Re-export main types
pub use credential::VaultCredential;
pub use manager::{PasswordVaultManager, VaultManager};
pub use memory::{InMemoryStore, MemoryEntry};
pub use native_store::{NativeCredentialStore, NativeEntry};
pub use resource_name::{RESOURCE_NAME_TAIL, complete_resource_name};
pub use secure_string::SecureString;

#[cfg(windows)]
pub use windows_vault::{WindowsPasswordVault, WindowsVaultEntry};

use crate::config::{BackendKind, VaultConfig};
use crate::error::Result;
use log::debug;

/// Create a new vault manager instance
///
/// This function returns a manager over the credential store selected by
/// `config`. The native backend is only available on Windows.
pub fn create_vault_manager(config: &VaultConfig) -> Result<Box<dyn PasswordVaultManager>> {
    debug!("Creating vault manager with {:?} backend", config.backend);

    match config.backend {
        BackendKind::Memory => Ok(Box::new(VaultManager::new(InMemoryStore::new()))),
        BackendKind::Native => native_vault_manager(),
    }
}

#[cfg(windows)]
fn native_vault_manager() -> Result<Box<dyn PasswordVaultManager>> {
    let store = WindowsPasswordVault::new()?;
    Ok(Box::new(VaultManager::new(store)))
}

#[cfg(not(windows))]
fn native_vault_manager() -> Result<Box<dyn PasswordVaultManager>> {
    Err(crate::error::StoreError::not_supported("native").into())
}
