//! Native credential store capability
//!
//! This module defines the narrow interface the vault manager consumes from
//! a platform secret store. Stores group entries by resource name and then by
//! user name; reading an entry is two-phase, first locating its metadata and
//! then explicitly loading its secret.

use crate::error::StoreError;
use zeroize::Zeroizing;

/// One entry located in a native credential store
pub trait NativeEntry {
    /// Resource the entry is filed under
    fn resource(&self) -> Result<String, StoreError>;

    /// User name of the entry
    fn user_name(&self) -> Result<String, StoreError>;

    /// Load the secret of this entry from the store
    fn retrieve_secret(&mut self) -> Result<(), StoreError>;

    /// Plain-text secret, available only after [`NativeEntry::retrieve_secret`]
    ///
    /// `None` means the store has no retrievable secret for this entry.
    fn secret(&self) -> Option<Zeroizing<String>>;
}

/// Capability interface of a platform credential store
///
/// All calls are blocking. Stores are shared by every caller of the current
/// user, so implementations coordinate concurrent access themselves.
pub trait NativeCredentialStore: Send + Sync {
    /// Entry type produced by lookups
    type Entry: NativeEntry;

    /// Get the name of this credential store implementation
    fn name(&self) -> &str;

    /// Add an entry
    fn add(&self, resource: &str, user_name: &str, secret: &str) -> Result<(), StoreError>;

    /// Exact lookup; `Ok(None)` when no entry matches
    fn retrieve(&self, resource: &str, user_name: &str)
    -> Result<Option<Self::Entry>, StoreError>;

    /// Every entry visible to the current user, in store order
    fn retrieve_all(&self) -> Result<Vec<Self::Entry>, StoreError>;

    /// Entries filed under `resource`
    fn find_all_by_resource(&self, resource: &str) -> Result<Vec<Self::Entry>, StoreError>;

    /// Entries belonging to `user_name`
    fn find_all_by_user(&self, user_name: &str) -> Result<Vec<Self::Entry>, StoreError>;

    /// Remove a previously located entry
    fn remove(&self, entry: &Self::Entry) -> Result<(), StoreError>;
}
