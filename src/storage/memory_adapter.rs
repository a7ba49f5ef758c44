//! In-memory client and storage backends

use crate::error::{StorageError, StorageResult};
use crate::storage::adapter::{KeyValueClient, Record, Storage};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

fn poisoned<T>(_: PoisonError<T>) -> StorageError {
    StorageError::OperationFailed {
        operation: "lock".to_string(),
        reason: "memory store lock poisoned".to_string(),
    }
}

/// In-memory key-value client
///
/// Clones share the same underlying map, so a test can keep a handle to
/// inspect what an adapter wrote.
#[derive(Debug, Clone)]
pub struct MemoryClient {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryClient {
    /// Create a new memory client
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Raw text stored at a physical key
    pub fn raw(&self, key: &str) -> StorageResult<Option<String>> {
        let storage = self.data.read().map_err(poisoned)?;
        Ok(storage.get(key).cloned())
    }

    /// Number of stored keys
    pub fn len(&self) -> StorageResult<usize> {
        let storage = self.data.read().map_err(poisoned)?;
        Ok(storage.len())
    }

    /// Whether no key is stored
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Stored physical keys, sorted
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let storage = self.data.read().map_err(poisoned)?;
        let mut keys: Vec<String> = storage.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl KeyValueClient for MemoryClient {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut storage = self.data.write().map_err(poisoned)?;
        storage.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let storage = self.data.read().map_err(poisoned)?;
        Ok(storage.contains_key(key))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut storage = self.data.write().map_err(poisoned)?;
        storage.remove(key);
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<String> {
        let storage = self.data.read().map_err(poisoned)?;
        storage.get(key).cloned().ok_or_else(|| StorageError::NotFound {
            key: key.to_string(),
        })
    }
}

/// Storage backend keeping records in process memory
///
/// Records live in one table per storage name, so the same key can hold
/// different records under different storage names.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<HashMap<String, HashMap<String, Record>>>>,
}

impl MemoryStorage {
    /// Create an empty memory storage
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self, storage_name: &str, key: &str, data: &Record) -> StorageResult<()> {
        debug!(storage_name, key, "writing record");
        let mut tables = self.tables.write().map_err(poisoned)?;
        tables
            .entry(storage_name.to_string())
            .or_default()
            .insert(key.to_string(), data.clone());
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn supports_partial_updates(&self) -> bool {
        false
    }

    fn supports_composite_primary_keys(&self) -> bool {
        false
    }

    fn requires_composite_primary_keys(&self) -> bool {
        false
    }

    fn insert(&self, storage_name: &str, key: &str, data: &Record) -> StorageResult<()> {
        self.write(storage_name, key, data)
    }

    fn update(&self, storage_name: &str, key: &str, data: &Record) -> StorageResult<()> {
        self.write(storage_name, key, data)
    }

    fn delete(&self, storage_name: &str, key: &str) -> StorageResult<()> {
        let mut tables = self.tables.write().map_err(poisoned)?;
        if let Some(table) = tables.get_mut(storage_name) {
            table.remove(key);
        }
        Ok(())
    }

    fn find(&self, storage_name: &str, key: &str) -> StorageResult<Record> {
        let tables = self.tables.read().map_err(poisoned)?;
        tables
            .get(storage_name)
            .and_then(|table| table.get(key))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: format!("{}/{}", storage_name, key),
            })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn test_memory_client_operations() {
        let client = MemoryClient::new();
        assert!(client.is_empty().unwrap());
        assert!(!client.exists("k").unwrap());

        client.set("k", "v1").unwrap();
        client.set("k", "v2").unwrap();
        assert!(client.exists("k").unwrap());
        assert_eq!(client.get("k").unwrap(), "v2");
        assert_eq!(client.raw("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(client.len().unwrap(), 1);

        client.delete("k").unwrap();
        client.delete("k").unwrap();
        assert!(client.is_empty().unwrap());
        assert!(client.get("k").unwrap_err().is_not_found());
    }

    #[test]
    fn test_memory_client_clones_share_data() {
        let client = MemoryClient::new();
        let handle = client.clone();
        client.set("b", "2").unwrap();
        client.set("a", "1").unwrap();
        assert_eq!(handle.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_memory_client_poisoned_lock_is_an_error() {
        let client = MemoryClient::new();
        client.set("k", "v").unwrap();

        let handle = client.clone();
        let result = std::thread::spawn(move || {
            let _guard = handle.data.write().unwrap();
            panic!("writer died while holding the lock");
        })
        .join();
        assert!(result.is_err());

        for err in [
            client.len().unwrap_err(),
            client.is_empty().unwrap_err(),
            client.keys().unwrap_err(),
            client.raw("k").unwrap_err(),
            client.get("k").unwrap_err(),
            client.set("k", "v").unwrap_err(),
        ] {
            assert!(matches!(err, StorageError::OperationFailed { .. }));
        }
    }

    #[test]
    fn test_memory_storage_contract() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.name(), "memory");
        assert!(!storage.supports_partial_updates());
        assert!(!storage.supports_composite_primary_keys());
        assert!(!storage.requires_composite_primary_keys());

        let data = record(json!({"author": "John Doe"}));
        storage.insert("books", "1", &data).unwrap();
        assert_eq!(storage.find("books", "1").unwrap(), data);

        let updated = record(json!({"title": "example book updated"}));
        storage.update("books", "1", &updated).unwrap();
        assert_eq!(storage.find("books", "1").unwrap(), updated);

        storage.delete("books", "1").unwrap();
        storage.delete("books", "1").unwrap();
        assert!(storage.find("books", "1").unwrap_err().is_not_found());
    }

    #[test]
    fn test_memory_storage_tables_are_separate() {
        let storage = MemoryStorage::new();
        storage.insert("books", "1", &record(json!({"kind": "book"}))).unwrap();
        assert!(storage.find("authors", "1").unwrap_err().is_not_found());
        storage.delete("authors", "1").unwrap();
        assert!(storage.find("books", "1").is_ok());
    }
}
