//! Typed JSON wrapper over durable storage.

use crate::{CacheError, DurableStorage};
use serde::{de::DeserializeOwned, Serialize};

/// Type-safe store over any [`DurableStorage`].
///
/// Values are stored as JSON text so they stay readable by other
/// clients of the same storage.
#[derive(Debug, Clone, Default)]
pub struct JsonStore<S> {
    storage: S,
}

impl<S: DurableStorage> JsonStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Get a value.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let record: Option<ConsentRecord> = store.get("cookie-consent")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.storage.get(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Set a value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let text = serde_json::to_string(value)?;
        self.storage.set(key, &text)
    }

    /// Delete a value.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.storage.remove(key)
    }

    /// Check if a key exists.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.storage.get(key)?.is_some())
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_available()
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Helper to build storage keys with namespacing.
///
/// # Example
///
/// ```rust
/// let key = comparo_cache::storage_key!("feed", "awin", 42);
/// assert_eq!(key, "feed:awin:42");
/// ```
#[macro_export]
macro_rules! storage_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStorage, UnavailableStorage};
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Clicks {
        count: u32,
    }

    #[test]
    fn test_json_store_roundtrip() {
        let store = JsonStore::new(MemoryStorage::new());
        assert!(!store.exists("clicks").unwrap());

        store.set("clicks", &Clicks { count: 3 }).unwrap();
        assert!(store.exists("clicks").unwrap());
        assert_eq!(
            store.get::<Clicks>("clicks").unwrap(),
            Some(Clicks { count: 3 })
        );
        assert_eq!(store.storage().get("clicks").unwrap().as_deref(), Some(r#"{"count":3}"#));

        store.delete("clicks").unwrap();
        assert_eq!(store.get::<Clicks>("clicks").unwrap(), None);
    }

    #[test]
    fn test_json_store_reports_corrupt_value() {
        let store = JsonStore::new(MemoryStorage::new());
        store.storage().set("clicks", "{oops").unwrap();

        let err = store.get::<Clicks>("clicks").unwrap_err();
        assert!(matches!(err, CacheError::SerializeError(_)));
    }

    #[test]
    fn test_json_store_over_unavailable_storage() {
        let store = JsonStore::new(UnavailableStorage);
        assert!(!store.is_available());
        store.set("clicks", &Clicks { count: 1 }).unwrap();
        assert_eq!(store.get::<Clicks>("clicks").unwrap(), None);
    }

    #[test]
    fn test_storage_key_macro() {
        let key = crate::storage_key!("consent", "v1");
        assert_eq!(key, "consent:v1");
    }
}
