//! In-memory credential store
//!
//! A process-local stand-in for the platform vault. It follows the same
//! contract as the native backends: resources and user names match without
//! regard to ASCII case, adding an existing pair replaces its secret, and
//! secrets are only handed out after an explicit retrieve step. Nothing is
//! ever written to disk.

use crate::error::StoreError;
use crate::security::{NativeCredentialStore, NativeEntry};
use log::trace;
use std::sync::{Arc, PoisonError, RwLock};
use zeroize::Zeroizing;

/// Process-local credential store
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<Vec<StoredEntry>>>,
}

/// An entry as held by the store
struct StoredEntry {
    resource: String,
    user_name: String,
    secret: Zeroizing<String>,
}

impl StoredEntry {
    fn matches(&self, resource: &str, user_name: &str) -> bool {
        self.resource.eq_ignore_ascii_case(resource) && self.user_name.eq_ignore_ascii_case(user_name)
    }
}

/// Entry handle returned by [`InMemoryStore`] lookups
pub struct MemoryEntry {
    resource: String,
    user_name: String,
    secret: Option<Zeroizing<String>>,
    entries: Arc<RwLock<Vec<StoredEntry>>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn collect<F>(&self, filter: F) -> Result<Vec<MemoryEntry>, StoreError>
    where
        F: Fn(&StoredEntry) -> bool,
    {
        let entries = self.entries.read()?;
        Ok(entries
            .iter()
            .filter(|entry| filter(entry))
            .map(|entry| self.handle(entry))
            .collect())
    }

    fn handle(&self, entry: &StoredEntry) -> MemoryEntry {
        MemoryEntry {
            resource: entry.resource.clone(),
            user_name: entry.user_name.clone(),
            secret: None,
            entries: Arc::clone(&self.entries),
        }
    }
}

impl NativeCredentialStore for InMemoryStore {
    type Entry = MemoryEntry;

    fn name(&self) -> &str {
        "in-memory"
    }

    fn add(&self, resource: &str, user_name: &str, secret: &str) -> Result<(), StoreError> {
        if resource.trim().is_empty() {
            return Err(StoreError::invalid_input("resource must not be empty"));
        }
        if user_name.trim().is_empty() {
            return Err(StoreError::invalid_input("user name must not be empty"));
        }

        let mut entries = self.entries.write()?;
        match entries
            .iter_mut()
            .find(|entry| entry.matches(resource, user_name))
        {
            Some(existing) => {
                trace!("Replacing in-memory secret for {resource} / {user_name}");
                existing.secret = Zeroizing::new(secret.to_string());
            }
            None => {
                trace!("Adding in-memory entry for {resource} / {user_name}");
                entries.push(StoredEntry {
                    resource: resource.to_string(),
                    user_name: user_name.to_string(),
                    secret: Zeroizing::new(secret.to_string()),
                });
            }
        }

        Ok(())
    }

    fn retrieve(&self, resource: &str, user_name: &str) -> Result<Option<MemoryEntry>, StoreError> {
        let entries = self.entries.read()?;
        Ok(entries
            .iter()
            .find(|entry| entry.matches(resource, user_name))
            .map(|entry| self.handle(entry)))
    }

    fn retrieve_all(&self) -> Result<Vec<MemoryEntry>, StoreError> {
        self.collect(|_| true)
    }

    fn find_all_by_resource(&self, resource: &str) -> Result<Vec<MemoryEntry>, StoreError> {
        self.collect(|entry| entry.resource.eq_ignore_ascii_case(resource))
    }

    fn find_all_by_user(&self, user_name: &str) -> Result<Vec<MemoryEntry>, StoreError> {
        self.collect(|entry| entry.user_name.eq_ignore_ascii_case(user_name))
    }

    fn remove(&self, entry: &MemoryEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write()?;
        let position = entries
            .iter()
            .position(|stored| stored.matches(&entry.resource, &entry.user_name))
            .ok_or_else(|| StoreError::not_found(&entry.resource, &entry.user_name))?;

        trace!(
            "Removing in-memory entry for {} / {}",
            entry.resource, entry.user_name
        );
        entries.remove(position);
        Ok(())
    }
}

impl NativeEntry for MemoryEntry {
    fn resource(&self) -> Result<String, StoreError> {
        Ok(self.resource.clone())
    }

    fn user_name(&self) -> Result<String, StoreError> {
        Ok(self.user_name.clone())
    }

    fn retrieve_secret(&mut self) -> Result<(), StoreError> {
        let entries = self.entries.read()?;
        let stored = entries
            .iter()
            .find(|stored| stored.matches(&self.resource, &self.user_name))
            .ok_or_else(|| StoreError::not_found(&self.resource, &self.user_name))?;

        self.secret = Some(stored.secret.clone());
        Ok(())
    }

    fn secret(&self) -> Option<Zeroizing<String>> {
        self.secret.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_of(entry: &mut MemoryEntry) -> String {
        entry.retrieve_secret().unwrap();
        entry.secret().unwrap().to_string()
    }

    #[test]
    fn test_add_and_retrieve() {
        let store = InMemoryStore::new();
        store.add("intranet/", "alice", "hunter2").unwrap();

        let mut entry = store.retrieve("intranet/", "alice").unwrap().unwrap();
        assert_eq!(entry.resource().unwrap(), "intranet/");
        assert_eq!(entry.user_name().unwrap(), "alice");
        assert_eq!(secret_of(&mut entry), "hunter2");
    }

    #[test]
    fn test_secret_requires_explicit_retrieval() {
        let store = InMemoryStore::new();
        store.add("intranet/", "alice", "hunter2").unwrap();

        let entry = store.retrieve("intranet/", "alice").unwrap().unwrap();
        assert!(entry.secret().is_none());
    }

    #[test]
    fn test_retrieve_missing_is_none() {
        let store = InMemoryStore::new();
        assert!(store.retrieve("nowhere/", "nobody").unwrap().is_none());
    }

    #[test]
    fn test_matching_ignores_ascii_case() {
        let store = InMemoryStore::new();
        store.add("Intranet/", "Alice", "hunter2").unwrap();

        let mut entry = store.retrieve("INTRANET/", "alice").unwrap().unwrap();
        assert_eq!(entry.resource().unwrap(), "Intranet/");
        assert_eq!(secret_of(&mut entry), "hunter2");
    }

    #[test]
    fn test_add_existing_pair_replaces_secret() {
        let store = InMemoryStore::new();
        store.add("intranet/", "alice", "first").unwrap();
        store.add("intranet/", "alice", "second").unwrap();

        assert_eq!(store.len(), 1);
        let mut entry = store.retrieve("intranet/", "alice").unwrap().unwrap();
        assert_eq!(secret_of(&mut entry), "second");
    }

    #[test]
    fn test_add_rejects_blank_names() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.add("", "alice", "pw"),
            Err(StoreError::InvalidInput { .. })
        ));
        assert!(matches!(
            store.add("intranet/", " ", "pw"),
            Err(StoreError::InvalidInput { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_enumeration_keeps_insertion_order() {
        let store = InMemoryStore::new();
        store.add("b/", "bob", "1").unwrap();
        store.add("a/", "alice", "2").unwrap();
        store.add("b/", "alice", "3").unwrap();

        let all: Vec<_> = store
            .retrieve_all()
            .unwrap()
            .iter()
            .map(|entry| (entry.resource().unwrap(), entry.user_name().unwrap()))
            .collect();
        assert_eq!(
            all,
            vec![
                ("b/".to_string(), "bob".to_string()),
                ("a/".to_string(), "alice".to_string()),
                ("b/".to_string(), "alice".to_string()),
            ]
        );
    }

    #[test]
    fn test_find_by_resource_and_user() {
        let store = InMemoryStore::new();
        store.add("b/", "bob", "1").unwrap();
        store.add("a/", "alice", "2").unwrap();
        store.add("b/", "alice", "3").unwrap();

        assert_eq!(store.find_all_by_resource("b/").unwrap().len(), 2);
        assert_eq!(store.find_all_by_resource("c/").unwrap().len(), 0);
        assert_eq!(store.find_all_by_user("alice").unwrap().len(), 2);
        assert_eq!(store.find_all_by_user("carol").unwrap().len(), 0);
    }

    #[test]
    fn test_remove() {
        let store = InMemoryStore::new();
        store.add("intranet/", "alice", "hunter2").unwrap();

        let entry = store.retrieve("intranet/", "alice").unwrap().unwrap();
        store.remove(&entry).unwrap();
        assert!(store.is_empty());

        let error = store.remove(&entry).unwrap_err();
        assert!(error.is_not_found());
    }

    #[test]
    fn test_secret_of_removed_entry_is_not_found() {
        let store = InMemoryStore::new();
        store.add("intranet/", "alice", "hunter2").unwrap();

        let mut entry = store.retrieve("intranet/", "alice").unwrap().unwrap();
        let same = store.retrieve("intranet/", "alice").unwrap().unwrap();
        store.remove(&same).unwrap();

        assert!(entry.retrieve_secret().unwrap_err().is_not_found());
        assert!(entry.secret().is_none());
    }

    #[test]
    fn test_len_survives_poisoned_lock() {
        let store = InMemoryStore::new();
        store.add("intranet/", "alice", "hunter2").unwrap();

        std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = store.entries.write().unwrap();
                    panic!("poison the lock");
                })
                .join()
                .ok();
        });

        assert!(matches!(store.retrieve_all(), Err(StoreError::LockPoisoned)));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let store = InMemoryStore::new();
        let shared = store.clone();
        store.add("intranet/", "alice", "hunter2").unwrap();
        assert_eq!(shared.len(), 1);
    }
}
