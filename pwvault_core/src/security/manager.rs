//! Password vault manager
//!
//! Sits between application code and a [`NativeCredentialStore`]: validates
//! names, completes resource names, hands the store a short-lived plain-text
//! copy of each secret, and wraps every secret read back into a
//! [`SecureString`].

use crate::error::validation::require_value;
use crate::error::{Result, StoreError};
use crate::security::{
    NativeCredentialStore, NativeEntry, SecureString, VaultCredential, complete_resource_name,
};
use log::{debug, trace, warn};
use zeroize::Zeroizing;

/// Operations exposed by a password vault
///
/// Every operation works on the credential space of the current user.
pub trait PasswordVaultManager: Send + Sync {
    /// Get the name of the backing store
    fn name(&self) -> &str;

    /// Add a credential to the vault
    fn add_credential(&self, credential: &VaultCredential) -> Result<()>;

    /// Get the credential for a resource and user
    ///
    /// A missing entry is not an error: the returned record then carries an
    /// empty secret.
    fn get_credential(&self, resource_name: &str, user_name: &str) -> Result<VaultCredential>;

    /// Get every credential of the current user, in store order
    fn get_all_credentials(&self) -> Result<Vec<VaultCredential>>;

    /// Get every credential filed under a resource
    fn get_resource_credentials(&self, resource_name: &str) -> Result<Vec<VaultCredential>>;

    /// Get every credential belonging to a user
    fn get_user_credentials(&self, user_name: &str) -> Result<Vec<VaultCredential>>;

    /// Remove a credential
    ///
    /// Only argument validation can fail. A missing entry or a store fault
    /// during removal completes silently.
    fn remove_credential(&self, resource_name: &str, user_name: &str) -> Result<()>;

    /// Replace the secret of a credential, adding it when absent
    ///
    /// A failed update leaves the previously stored secret in place.
    fn update_credential(&self, credential: &VaultCredential) -> Result<()>;
}

/// Vault manager over a native credential store
pub struct VaultManager<S> {
    store: S,
}

impl<S: NativeCredentialStore> VaultManager<S> {
    /// Create a manager over `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Force-load the secret of an entry and turn it into a record
    ///
    /// An entry the store reports with a blank name is a store fault, not a
    /// caller error.
    fn wrap_entry(entry: &mut S::Entry) -> Result<VaultCredential> {
        entry.retrieve_secret()?;
        let secret = wrap_secret(entry.secret());
        let credential = VaultCredential::new(entry.resource()?, entry.user_name()?, secret)
            .map_err(|e| StoreError::invalid_input(format!("store returned unusable entry: {e}")))?;
        Ok(credential)
    }

    fn wrap_entries(entries: Vec<S::Entry>) -> Result<Vec<VaultCredential>> {
        entries
            .into_iter()
            .map(|mut entry| Self::wrap_entry(&mut entry))
            .collect()
    }
}

impl<S: NativeCredentialStore> PasswordVaultManager for VaultManager<S> {
    fn name(&self) -> &str {
        self.store.name()
    }

    fn add_credential(&self, credential: &VaultCredential) -> Result<()> {
        let resource_name = complete_resource_name(credential.resource_name())?;
        debug!(
            "Adding credential for {resource_name} / {}",
            credential.user_name()
        );

        let secret = credential.secret().reveal();
        self.store
            .add(&resource_name, credential.user_name(), &secret)?;
        Ok(())
    }

    fn get_credential(&self, resource_name: &str, user_name: &str) -> Result<VaultCredential> {
        require_value("resource_name", resource_name)?;
        require_value("user_name", user_name)?;

        let resource_name = complete_resource_name(resource_name)?;
        debug!("Retrieving credential for {resource_name} / {user_name}");

        let secret = match self.store.retrieve(&resource_name, user_name)? {
            Some(mut entry) => {
                entry.retrieve_secret()?;
                wrap_secret(entry.secret())
            }
            None => {
                trace!("No credential stored for {resource_name} / {user_name}");
                SecureString::default()
            }
        };

        Ok(VaultCredential::new(resource_name, user_name, secret)?)
    }

    fn get_all_credentials(&self) -> Result<Vec<VaultCredential>> {
        debug!("Retrieving all credentials from {}", self.store.name());
        Self::wrap_entries(self.store.retrieve_all()?)
    }

    fn get_resource_credentials(&self, resource_name: &str) -> Result<Vec<VaultCredential>> {
        require_value("resource_name", resource_name)?;

        let resource_name = complete_resource_name(resource_name)?;
        debug!("Retrieving credentials for resource {resource_name}");
        Self::wrap_entries(self.store.find_all_by_resource(&resource_name)?)
    }

    fn get_user_credentials(&self, user_name: &str) -> Result<Vec<VaultCredential>> {
        require_value("user_name", user_name)?;

        debug!("Retrieving credentials for user {user_name}");
        Self::wrap_entries(self.store.find_all_by_user(user_name)?)
    }

    fn remove_credential(&self, resource_name: &str, user_name: &str) -> Result<()> {
        require_value("resource_name", resource_name)?;
        require_value("user_name", user_name)?;

        let resource_name = complete_resource_name(resource_name)?;
        debug!("Removing credential for {resource_name} / {user_name}");

        let removal = self
            .store
            .retrieve(&resource_name, user_name)
            .and_then(|entry| match entry {
                Some(entry) => self.store.remove(&entry),
                None => {
                    trace!("Nothing to remove for {resource_name} / {user_name}");
                    Ok(())
                }
            });

        // The credential is gone either way; a fault here is only reported in the log
        if let Err(e) = removal {
            warn!("Ignoring failure while removing credential for {resource_name} / {user_name}: {e}");
        }

        Ok(())
    }

    fn update_credential(&self, credential: &VaultCredential) -> Result<()> {
        let resource_name = complete_resource_name(credential.resource_name())?;
        let user_name = credential.user_name();
        debug!("Updating credential for {resource_name} / {user_name}");

        let secret = credential.secret().reveal();
        let conflict = match self.store.add(&resource_name, user_name, &secret) {
            Ok(()) => return Ok(()),
            Err(e @ StoreError::InvalidInput { .. }) => e,
            Err(e) => return Err(e.into()),
        };

        // Store refuses to overwrite: swap the entry, keeping the old secret for rollback
        let Some(mut existing) = self.store.retrieve(&resource_name, user_name)? else {
            return Err(conflict.into());
        };
        existing.retrieve_secret()?;
        let previous = wrap_secret(existing.secret());
        self.store.remove(&existing)?;

        if let Err(e) = self.store.add(&resource_name, user_name, &secret) {
            let previous = previous.reveal();
            if let Err(restore) = self.store.add(&resource_name, user_name, &previous) {
                warn!("Failed to restore credential for {resource_name} / {user_name}: {restore}");
            }
            return Err(e.into());
        }

        Ok(())
    }
}

/// Move a plain-text secret from the store into a fresh secure buffer
fn wrap_secret(secret: Option<Zeroizing<String>>) -> SecureString {
    let mut buffer = SecureString::default();
    buffer.set_from(secret.as_deref().map(String::as_str));
    buffer
}
