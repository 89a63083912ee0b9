//! Credential builder for creating test scenarios

use pwvault_core::error::ValidationError;
use pwvault_core::{SecureString, VaultCredential};

/// Builder for vault credentials with test defaults
pub struct CredentialBuilder {
    resource_name: String,
    user_name: String,
    secret: Option<String>,
}

impl Default for CredentialBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialBuilder {
    /// Create a builder for `test-resource` / `test-user` / `test-secret`
    pub fn new() -> Self {
        Self {
            resource_name: "test-resource".to_string(),
            user_name: "test-user".to_string(),
            secret: Some("test-secret".to_string()),
        }
    }

    /// Set resource name
    pub fn with_resource(mut self, resource_name: &str) -> Self {
        self.resource_name = resource_name.to_string();
        self
    }

    /// Set user name
    pub fn with_user(mut self, user_name: &str) -> Self {
        self.user_name = user_name.to_string();
        self
    }

    /// Set secret
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = Some(secret.to_string());
        self
    }

    /// Use an empty secret buffer
    pub fn without_secret(mut self) -> Self {
        self.secret = None;
        self
    }

    /// Build the credential
    pub fn build(self) -> Result<VaultCredential, ValidationError> {
        let mut secret = SecureString::default();
        secret.set_from(self.secret.as_deref());
        VaultCredential::new(self.resource_name, self.user_name, secret)
    }
}
