//! Mock implementation of NativeCredentialStore for testing

use pwvault_core::error::StoreError;
use pwvault_core::security::{NativeCredentialStore, NativeEntry};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use zeroize::Zeroizing;

/// Store operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Add,
    Retrieve,
    RetrieveAll,
    FindAllByResource,
    FindAllByUser,
    RetrieveSecret,
    Remove,
}

/// A call received by the mock, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Add {
        resource: String,
        user_name: String,
        secret: String,
    },
    Retrieve {
        resource: String,
        user_name: String,
    },
    RetrieveAll,
    FindAllByResource {
        resource: String,
    },
    FindAllByUser {
        user_name: String,
    },
    RetrieveSecret {
        resource: String,
        user_name: String,
    },
    Remove {
        resource: String,
        user_name: String,
    },
}

/// Scriptable native credential store
///
/// Matching is exact (case-sensitive). Adding an existing pair fails, the
/// way a strict platform store rejects duplicates. Entries can be seeded
/// without a retrievable secret, and any operation can be made to fail.
///
/// # Examples
///
/// ```rust
/// use pwvault_core::{PasswordVaultManager, VaultManager};
/// use pwvault_test_utils::{MockNativeStore, MockOperation};
///
/// let store = MockNativeStore::new()
///     .with_entry("intranet/", "alice", "hunter2")
///     .fail_on(MockOperation::Remove, "vault is locked");
/// let vault = VaultManager::new(store);
///
/// // Removal faults are swallowed
/// assert!(vault.remove_credential("intranet", "alice").is_ok());
/// assert_eq!(vault.store().entry_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockNativeStore {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    entries: Vec<MockRecord>,
    failures: HashMap<MockOperation, String>,
    calls: Vec<MockCall>,
}

struct MockRecord {
    resource: String,
    user_name: String,
    secret: Option<Zeroizing<String>>,
}

impl MockState {
    fn record(&mut self, call: MockCall, operation: MockOperation) -> Result<(), StoreError> {
        self.calls.push(call);
        match self.failures.get(&operation) {
            Some(message) => Err(StoreError::platform(message.clone())),
            None => Ok(()),
        }
    }

    fn position(&self, resource: &str, user_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.resource == resource && entry.user_name == user_name)
    }
}

/// Entry handle returned by [`MockNativeStore`]
pub struct MockEntry {
    resource: String,
    user_name: String,
    secret: Option<Zeroizing<String>>,
    state: Arc<Mutex<MockState>>,
}

impl MockNativeStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry
    pub fn with_entry(self, resource: &str, user_name: &str, secret: &str) -> Self {
        self.seed(resource, user_name, Some(secret));
        self
    }

    /// Seed an entry whose secret cannot be retrieved
    pub fn with_entry_without_secret(self, resource: &str, user_name: &str) -> Self {
        self.seed(resource, user_name, None);
        self
    }

    /// Make every call of `operation` fail with a platform error
    pub fn fail_on(self, operation: MockOperation, message: &str) -> Self {
        self.lock()
            .failures
            .insert(operation, message.to_string());
        self
    }

    /// Stop failing `operation`
    pub fn recover(&self, operation: MockOperation) {
        self.lock().failures.remove(&operation);
    }

    /// Calls received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Number of entries held
    pub fn entry_count(&self) -> usize {
        self.lock().entries.len()
    }

    fn seed(&self, resource: &str, user_name: &str, secret: Option<&str>) {
        self.lock().entries.push(MockRecord {
            resource: resource.to_string(),
            user_name: user_name.to_string(),
            secret: secret.map(|secret| Zeroizing::new(secret.to_string())),
        });
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, record: &MockRecord) -> MockEntry {
        MockEntry {
            resource: record.resource.clone(),
            user_name: record.user_name.clone(),
            secret: None,
            state: Arc::clone(&self.state),
        }
    }

    fn collect<F>(
        &self,
        call: MockCall,
        operation: MockOperation,
        filter: F,
    ) -> Result<Vec<MockEntry>, StoreError>
    where
        F: Fn(&MockRecord) -> bool,
    {
        let mut state = self.lock();
        state.record(call, operation)?;
        Ok(state
            .entries
            .iter()
            .filter(|record| filter(record))
            .map(|record| self.handle(record))
            .collect())
    }
}

impl NativeCredentialStore for MockNativeStore {
    type Entry = MockEntry;

    fn name(&self) -> &str {
        "mock"
    }

    fn add(&self, resource: &str, user_name: &str, secret: &str) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.record(
            MockCall::Add {
                resource: resource.to_string(),
                user_name: user_name.to_string(),
                secret: secret.to_string(),
            },
            MockOperation::Add,
        )?;

        if state.position(resource, user_name).is_some() {
            return Err(StoreError::invalid_input(format!(
                "duplicate entry {resource} / {user_name}"
            )));
        }

        state.entries.push(MockRecord {
            resource: resource.to_string(),
            user_name: user_name.to_string(),
            secret: Some(Zeroizing::new(secret.to_string())),
        });
        Ok(())
    }

    fn retrieve(&self, resource: &str, user_name: &str) -> Result<Option<MockEntry>, StoreError> {
        let mut state = self.lock();
        state.record(
            MockCall::Retrieve {
                resource: resource.to_string(),
                user_name: user_name.to_string(),
            },
            MockOperation::Retrieve,
        )?;

        Ok(state
            .position(resource, user_name)
            .map(|index| self.handle(&state.entries[index])))
    }

    fn retrieve_all(&self) -> Result<Vec<MockEntry>, StoreError> {
        self.collect(MockCall::RetrieveAll, MockOperation::RetrieveAll, |_| true)
    }

    fn find_all_by_resource(&self, resource: &str) -> Result<Vec<MockEntry>, StoreError> {
        self.collect(
            MockCall::FindAllByResource {
                resource: resource.to_string(),
            },
            MockOperation::FindAllByResource,
            |record| record.resource == resource,
        )
    }

    fn find_all_by_user(&self, user_name: &str) -> Result<Vec<MockEntry>, StoreError> {
        self.collect(
            MockCall::FindAllByUser {
                user_name: user_name.to_string(),
            },
            MockOperation::FindAllByUser,
            |record| record.user_name == user_name,
        )
    }

    fn remove(&self, entry: &MockEntry) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.record(
            MockCall::Remove {
                resource: entry.resource.clone(),
                user_name: entry.user_name.clone(),
            },
            MockOperation::Remove,
        )?;

        let index = state
            .position(&entry.resource, &entry.user_name)
            .ok_or_else(|| StoreError::not_found(&entry.resource, &entry.user_name))?;
        state.entries.remove(index);
        Ok(())
    }
}

impl NativeEntry for MockEntry {
    fn resource(&self) -> Result<String, StoreError> {
        Ok(self.resource.clone())
    }

    fn user_name(&self) -> Result<String, StoreError> {
        Ok(self.user_name.clone())
    }

    fn retrieve_secret(&mut self) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.record(
            MockCall::RetrieveSecret {
                resource: self.resource.clone(),
                user_name: self.user_name.clone(),
            },
            MockOperation::RetrieveSecret,
        )?;

        let index = state
            .position(&self.resource, &self.user_name)
            .ok_or_else(|| StoreError::not_found(&self.resource, &self.user_name))?;
        self.secret = state.entries[index].secret.clone();
        Ok(())
    }

    fn secret(&self) -> Option<Zeroizing<String>> {
        self.secret.clone()
    }
}
