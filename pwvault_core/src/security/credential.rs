//! Credential record exchanged with vault callers

use crate::error::ValidationError;
use crate::error::validation::require_value;
use crate::security::SecureString;
use std::fmt;

/// One credential entry of a password vault
///
/// Resource and user names are fixed at construction. The secret buffer may
/// be empty, and its contents stay under the control of whoever owns the
/// record.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultCredential {
    resource_name: String,
    user_name: String,
    secret: SecureString,
}

impl VaultCredential {
    /// Create a new credential
    ///
    /// Fails when `resource_name` or `user_name` is empty or whitespace only.
    pub fn new(
        resource_name: impl Into<String>,
        user_name: impl Into<String>,
        secret: impl Into<SecureString>,
    ) -> Result<Self, ValidationError> {
        let resource_name = resource_name.into();
        let user_name = user_name.into();

        require_value("resource_name", &resource_name)?;
        require_value("user_name", &user_name)?;

        Ok(Self {
            resource_name,
            user_name,
            secret: secret.into(),
        })
    }

    /// Resource name the credential is filed under
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// User name of the credential
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Secret buffer of the credential
    pub fn secret(&self) -> &SecureString {
        &self.secret
    }

    /// Consume the record, keeping only its secret
    pub fn into_secret(self) -> SecureString {
        self.secret
    }
}

impl fmt::Debug for VaultCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultCredential")
            .field("resource_name", &self.resource_name)
            .field("user_name", &self.user_name)
            .field("secret", &"***")
            .finish()
    }
}
