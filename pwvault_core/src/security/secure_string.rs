//! Secure string implementation with automatic memory zeroing
//!
//! This module provides a SecureString type that holds a password in a
//! heap buffer which is wiped whenever it is cleared, grown or dropped.

use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Smallest allocation made once a SecureString starts holding data
const MIN_CAPACITY: usize = 16;

/// A mutable password buffer that zeros its memory
///
/// This type is designed to hold sensitive data like passwords and API keys.
/// It provides the following security features:
/// - Memory is zeroed on clear, on drop, and before a grown buffer replaces
///   the old allocation, so no stale copy is left behind by reallocation
/// - No Debug or Display implementation that could leak data
/// - No serde implementation, so it cannot be persisted in plain form
/// - Constant-time comparison
/// - Memory locking on supported platforms
///
/// Plain text is only available through [`SecureString::reveal`], which hands
/// out a copy that wipes itself when dropped.
#[derive(Zeroize)]
pub struct SecureString {
    inner: Vec<u8>,
    chars: usize,
}

impl SecureString {
    /// Create a new SecureString from a regular string
    ///
    /// The source string is zeroed once its contents have been copied.
    pub fn new(s: impl Into<String>) -> Self {
        let mut source = s.into();
        let mut secure = Self::with_capacity(source.len());
        secure.append(Some(source.as_str()));
        source.zeroize();
        secure
    }

    /// Create an empty SecureString with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        let inner = Vec::with_capacity(capacity);

        // Try to lock memory if supported
        #[cfg(unix)]
        Self::try_lock_memory(&inner);

        Self { inner, chars: 0 }
    }

    /// Append a value to the end of the buffer
    ///
    /// `None` is ignored.
    pub fn append(&mut self, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.reserve(value.len());
            self.inner.extend_from_slice(value.as_bytes());
            self.chars += value.chars().count();
        }
        self
    }

    /// Append a single character
    pub fn push(&mut self, c: char) -> &mut Self {
        let mut encoded = [0u8; 4];
        let value: &str = c.encode_utf8(&mut encoded);
        self.append(Some(value));
        encoded.zeroize();
        self
    }

    /// Replace the buffer contents with `value`
    ///
    /// Existing content is zeroed first, so a shorter value never leaves
    /// characters of a longer previous one behind. `None` leaves the buffer
    /// empty.
    pub fn set_from(&mut self, value: Option<&str>) -> &mut Self {
        self.clear();
        self.append(value)
    }

    /// Zero and empty the buffer, keeping its allocation
    pub fn clear(&mut self) {
        self.inner.zeroize();
        self.chars = 0;
    }

    /// Number of characters held
    pub fn len(&self) -> usize {
        self.chars
    }

    /// Check if the buffer holds no characters
    pub fn is_empty(&self) -> bool {
        self.chars == 0
    }

    /// Materialize the buffer as plain text
    ///
    /// The returned copy is owned by the caller and zeroed when it goes out of
    /// scope, including during unwinding. An empty buffer reveals `""`.
    pub fn reveal(&self) -> Zeroizing<String> {
        let mut plain = Zeroizing::new(String::with_capacity(self.inner.len()));
        plain.push_str(self.as_str());
        plain
    }

    /// Constant-time comparison
    pub fn constant_time_eq(&self, other: &Self) -> bool {
        if self.inner.len() != other.inner.len() {
            return false;
        }

        let mut result = 0u8;
        for (a, b) in self.inner.iter().zip(other.inner.iter()) {
            result |= a ^ b;
        }
        result == 0
    }

    // Contents only ever come from `&str`, so they are always valid UTF-8.
    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.inner).unwrap_or_default()
    }

    /// Make room for `additional` bytes without leaving a stale copy behind
    fn reserve(&mut self, additional: usize) {
        let required = self.inner.len() + additional;
        if required <= self.inner.capacity() {
            return;
        }

        let capacity = required
            .max(self.inner.capacity().saturating_mul(2))
            .max(MIN_CAPACITY);
        let mut grown = Vec::with_capacity(capacity);

        #[cfg(unix)]
        Self::try_lock_memory(&grown);

        grown.extend_from_slice(&self.inner);
        let mut previous = std::mem::replace(&mut self.inner, grown);
        previous.zeroize();

        #[cfg(unix)]
        Self::try_unlock_memory(&previous);
    }

    /// Page-aligned pointer and length covering the whole allocation
    #[cfg(unix)]
    fn locked_region(data: &Vec<u8>) -> Option<(*const libc::c_void, usize)> {
        use libc::{_SC_PAGESIZE, sysconf};

        if data.capacity() == 0 {
            return None;
        }

        let page_size = unsafe { sysconf(_SC_PAGESIZE) };
        if page_size <= 0 {
            return None;
        }
        let page_size = page_size as usize;

        let ptr = data.as_ptr() as usize;
        let aligned_ptr = ptr & !(page_size - 1);
        let offset = ptr - aligned_ptr;

        Some((aligned_ptr as *const libc::c_void, offset + data.capacity()))
    }

    /// Try to lock memory pages containing the secure data
    #[cfg(unix)]
    fn try_lock_memory(data: &Vec<u8>) {
        if let Some((ptr, len)) = Self::locked_region(data) {
            // Ignore errors - memory locking is best-effort
            let _ = unsafe { libc::mlock(ptr, len) };
        }
    }

    /// Unlock memory pages once they no longer hold secure data
    #[cfg(unix)]
    fn try_unlock_memory(data: &Vec<u8>) {
        if let Some((ptr, len)) = Self::locked_region(data) {
            let _ = unsafe { libc::munlock(ptr, len) };
        }
    }
}

impl Drop for SecureString {
    fn drop(&mut self) {
        self.inner.zeroize();

        #[cfg(unix)]
        Self::try_unlock_memory(&self.inner);
    }
}

impl Clone for SecureString {
    fn clone(&self) -> Self {
        let mut cloned = Self::with_capacity(self.inner.len());
        cloned.inner.extend_from_slice(&self.inner);
        cloned.chars = self.chars;
        cloned
    }
}

impl Default for SecureString {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

// Implement Debug to prevent accidental credential logging
impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString(***)")
    }
}

// Implement Display to prevent accidental credential logging
impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

impl PartialEq for SecureString {
    fn eq(&self, other: &Self) -> bool {
        self.constant_time_eq(other)
    }
}

impl Eq for SecureString {}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        let mut secure = Self::with_capacity(s.len());
        secure.append(Some(s));
        secure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_creation() {
        let secure = SecureString::new("test password");
        assert_eq!(secure.reveal().as_str(), "test password");
        assert_eq!(secure.len(), 13);
    }

    #[test]
    fn test_default_is_empty() {
        let secure = SecureString::default();
        assert!(secure.is_empty());
        assert_eq!(secure.len(), 0);
        assert_eq!(secure.reveal().as_str(), "");
    }

    #[test]
    fn test_append_ignores_none() {
        let mut secure = SecureString::new("abc");
        secure.append(None);
        assert_eq!(secure.reveal().as_str(), "abc");
        assert_eq!(secure.len(), 3);
    }

    #[test]
    fn test_append_extends_in_order() {
        let mut secure = SecureString::default();
        secure.append(Some("pass")).append(Some("word")).push('!');
        assert_eq!(secure.reveal().as_str(), "password!");
        assert_eq!(secure.len(), 9);
        assert!(!secure.is_empty());
    }

    #[test]
    fn test_len_counts_characters() {
        let secure = SecureString::new("pässwörd€");
        assert_eq!(secure.len(), 9);
        assert_eq!(secure.reveal().as_str(), "pässwörd€");
    }

    #[test]
    fn test_set_from_shorter_value_leaves_no_residue() {
        let mut secure = SecureString::new("a much longer previous password");
        secure.set_from(Some("short"));
        assert_eq!(secure.reveal().as_str(), "short");
        assert_eq!(secure.len(), 5);
    }

    #[test]
    fn test_set_from_none_empties() {
        let mut secure = SecureString::new("secret");
        secure.set_from(None);
        assert!(secure.is_empty());
        assert_eq!(secure.reveal().as_str(), "");

        secure.set_from(Some(""));
        assert!(secure.is_empty());
    }

    #[test]
    fn test_clear_zeroes_but_keeps_allocation() {
        let mut secure = SecureString::new("secret");
        let capacity = secure.inner.capacity();
        secure.clear();
        assert!(secure.is_empty());
        assert!(secure.inner.is_empty());
        assert_eq!(secure.inner.capacity(), capacity);
    }

    #[test]
    fn test_growth_preserves_contents() {
        let mut secure = SecureString::default();
        for _ in 0..100 {
            secure.push('x');
        }
        assert_eq!(secure.len(), 100);
        assert!(secure.inner.capacity() >= 100);
        assert_eq!(secure.reveal().as_str(), "x".repeat(100));
    }

    #[test]
    fn test_secure_string_debug() {
        let secure = SecureString::new("secret password");
        let debug_str = format!("{secure:?}");
        assert_eq!(debug_str, "SecureString(***)");
        assert!(!debug_str.contains("secret"));
    }

    #[test]
    fn test_secure_string_display() {
        let secure = SecureString::new("secret password");
        let display_str = format!("{secure}");
        assert_eq!(display_str, "***");
        assert!(!display_str.contains("secret"));
    }

    #[test]
    fn test_constant_time_comparison() {
        let secure1 = SecureString::new("password123");
        let secure2 = SecureString::new("password123");
        let secure3 = SecureString::new("different");

        assert!(secure1.constant_time_eq(&secure2));
        assert!(!secure1.constant_time_eq(&secure3));

        assert_eq!(secure1, secure2);
        assert_ne!(secure1, secure3);
    }

    #[test]
    fn test_clone() {
        let secure1 = SecureString::new("cloneable");
        let secure2 = secure1.clone();
        assert_eq!(secure1, secure2);
        assert_eq!(secure2.len(), 9);
    }

    #[test]
    fn test_zeroize_empties() {
        let mut secure = SecureString::new("wipe me");
        secure.zeroize();
        assert!(secure.is_empty());
        assert_eq!(secure.reveal().as_str(), "");
    }
}
