//! Storage contract traits and the record type
//!
//! [`Storage`] is the inbound contract a repository layer programs against.
//! [`KeyValueClient`] is the outbound contract an adapter needs from its
//! backend driver.

use crate::error::StorageResult;
use std::sync::Arc;

/// Schema-less record persisted by a storage backend
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Storage backend contract consumed by the repository layer
///
/// Every backend exposes the same four operations and the same fixed
/// capability flags, so callers can decide up front whether they must merge
/// fields themselves before calling [`Storage::update`].
pub trait Storage: Send + Sync {
    /// Whether `update` can merge a subset of fields into an existing record
    fn supports_partial_updates(&self) -> bool;

    /// Whether keys made of several identifier parts are accepted
    fn supports_composite_primary_keys(&self) -> bool;

    /// Whether keys made of several identifier parts are mandatory
    fn requires_composite_primary_keys(&self) -> bool;

    /// Store a new record
    fn insert(&self, storage_name: &str, key: &str, data: &Record) -> StorageResult<()>;

    /// Replace an existing record
    fn update(&self, storage_name: &str, key: &str, data: &Record) -> StorageResult<()>;

    /// Remove a record; removing an absent key is not an error
    fn delete(&self, storage_name: &str, key: &str) -> StorageResult<()>;

    /// Load a record, failing with `NotFound` when the key is absent
    fn find(&self, storage_name: &str, key: &str) -> StorageResult<Record>;

    /// Name of the underlying storage
    fn name(&self) -> &'static str;
}

/// Minimal command set required from a key-value driver
pub trait KeyValueClient: Send + Sync {
    /// Store `value` at `key`, overwriting any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Check if key exists
    fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Delete key
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Retrieve the value stored at `key`
    fn get(&self, key: &str) -> StorageResult<String>;
}

impl<C: KeyValueClient + ?Sized> KeyValueClient for Arc<C> {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        (**self).exists(key)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        (**self).delete(key)
    }

    fn get(&self, key: &str) -> StorageResult<String> {
        (**self).get(key)
    }
}
