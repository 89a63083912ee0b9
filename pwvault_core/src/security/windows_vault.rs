//! Windows password vault implementation
//!
//! Wraps `Windows.Security.Credentials.PasswordVault`, the per-user vault
//! behind the Credential Manager "Web Credentials" section. Entries are
//! protected at rest by the operating system and tied to the user account.

use crate::error::StoreError;
use crate::security::{NativeCredentialStore, NativeEntry};
use log::trace;
use windows::Foundation::Collections::IVectorView;
use windows::Security::Credentials::{PasswordCredential, PasswordVault};
use windows::core::HSTRING;
use zeroize::Zeroizing;

/// HRESULT_FROM_WIN32(ERROR_NOT_FOUND), raised by the vault for missing entries
const ELEMENT_NOT_FOUND: i32 = 0x80070490u32 as i32;

/// HRESULT_FROM_WIN32(ERROR_ACCESS_DENIED)
const ACCESS_DENIED: i32 = 0x80070005u32 as i32;

/// Windows password vault backend
pub struct WindowsPasswordVault {
    vault: PasswordVault,
}

/// Entry handle wrapping a vault `PasswordCredential`
pub struct WindowsVaultEntry {
    credential: PasswordCredential,
    retrieved: bool,
}

impl WindowsPasswordVault {
    /// Open the password vault of the current user
    pub fn new() -> Result<Self, StoreError> {
        let vault = PasswordVault::new().map_err(|e| platform_error("open password vault", &e))?;
        Ok(Self { vault })
    }

    fn collect(
        &self,
        operation: &str,
        view: windows::core::Result<IVectorView<PasswordCredential>>,
    ) -> Result<Vec<WindowsVaultEntry>, StoreError> {
        let view = match view {
            Ok(view) => view,
            // The vault reports an empty search result as "not found"
            Err(e) if e.code().0 == ELEMENT_NOT_FOUND => return Ok(Vec::new()),
            Err(e) => return Err(platform_error(operation, &e)),
        };

        let size = view.Size().map_err(|e| platform_error(operation, &e))?;
        let mut entries = Vec::with_capacity(size as usize);
        for index in 0..size {
            let credential = view.GetAt(index).map_err(|e| platform_error(operation, &e))?;
            entries.push(WindowsVaultEntry {
                credential,
                retrieved: false,
            });
        }

        trace!("Vault {operation} returned {size} entries");
        Ok(entries)
    }
}

impl NativeCredentialStore for WindowsPasswordVault {
    type Entry = WindowsVaultEntry;

    fn name(&self) -> &str {
        "windows-password-vault"
    }

    fn add(&self, resource: &str, user_name: &str, secret: &str) -> Result<(), StoreError> {
        // The HSTRING copy of the secret is released as soon as this scope ends
        let password = HSTRING::from(secret);
        let credential = PasswordCredential::CreatePasswordCredential(
            &HSTRING::from(resource),
            &HSTRING::from(user_name),
            &password,
        )
        .map_err(|e| platform_error("create credential", &e))?;

        self.vault
            .Add(&credential)
            .map_err(|e| platform_error("add credential", &e))
    }

    fn retrieve(
        &self,
        resource: &str,
        user_name: &str,
    ) -> Result<Option<WindowsVaultEntry>, StoreError> {
        match self
            .vault
            .Retrieve(&HSTRING::from(resource), &HSTRING::from(user_name))
        {
            Ok(credential) => Ok(Some(WindowsVaultEntry {
                credential,
                retrieved: false,
            })),
            // Credential not found - this is not an error, just None
            Err(e) if e.code().0 == ELEMENT_NOT_FOUND => Ok(None),
            Err(e) => Err(platform_error("retrieve credential", &e)),
        }
    }

    fn retrieve_all(&self) -> Result<Vec<WindowsVaultEntry>, StoreError> {
        self.collect("retrieve all", self.vault.RetrieveAll())
    }

    fn find_all_by_resource(&self, resource: &str) -> Result<Vec<WindowsVaultEntry>, StoreError> {
        self.collect(
            "find by resource",
            self.vault.FindAllByResource(&HSTRING::from(resource)),
        )
    }

    fn find_all_by_user(&self, user_name: &str) -> Result<Vec<WindowsVaultEntry>, StoreError> {
        self.collect(
            "find by user",
            self.vault.FindAllByUserName(&HSTRING::from(user_name)),
        )
    }

    fn remove(&self, entry: &WindowsVaultEntry) -> Result<(), StoreError> {
        self.vault
            .Remove(&entry.credential)
            .map_err(|e| platform_error("remove credential", &e))
    }
}

impl NativeEntry for WindowsVaultEntry {
    fn resource(&self) -> Result<String, StoreError> {
        self.credential
            .Resource()
            .map(|resource| resource.to_string_lossy())
            .map_err(|e| platform_error("read resource", &e))
    }

    fn user_name(&self) -> Result<String, StoreError> {
        self.credential
            .UserName()
            .map(|user_name| user_name.to_string_lossy())
            .map_err(|e| platform_error("read user name", &e))
    }

    fn retrieve_secret(&mut self) -> Result<(), StoreError> {
        self.credential
            .RetrievePassword()
            .map_err(|e| platform_error("retrieve password", &e))?;
        self.retrieved = true;
        Ok(())
    }

    fn secret(&self) -> Option<Zeroizing<String>> {
        if !self.retrieved {
            return None;
        }
        self.credential
            .Password()
            .ok()
            .map(|password| Zeroizing::new(password.to_string_lossy()))
    }
}

fn platform_error(operation: &str, error: &windows::core::Error) -> StoreError {
    let message = format!("Failed to {operation}: {error}");
    if error.code().0 == ACCESS_DENIED {
        StoreError::access_denied(message)
    } else {
        StoreError::platform(message)
    }
}
