//! Redis storage adapter
//!
//! Stores each record as JSON text under `key_prefix + key`. Reads and
//! deletes check existence first, because a missing key and a stored falsy
//! value are not reliably distinguishable through `get` alone on every
//! driver.

use crate::error::{StorageError, StorageResult};
use crate::storage::adapter::{KeyValueClient, Record, Storage};
use crate::storage::storage_api::StoreConfig;
use tracing::debug;

/// Storage adapter over any Redis-style [`KeyValueClient`]
#[derive(Debug, Clone)]
pub struct RedisStorage<C> {
    client: C,
    config: StoreConfig,
}

impl<C: KeyValueClient> RedisStorage<C> {
    /// Create an adapter with the default configuration
    pub fn new(client: C) -> Self {
        Self::with_config(client, StoreConfig::default())
    }

    /// Create an adapter with an explicit configuration
    pub fn with_config(client: C, config: StoreConfig) -> Self {
        Self { client, config }
    }

    /// Physical key used against the backend for a logical key
    pub fn key_name(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix(), key)
    }

    /// Adapter configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Underlying client handle
    pub fn client(&self) -> &C {
        &self.client
    }

    fn write(&self, operation: &'static str, key: &str, data: &Record) -> StorageResult<()> {
        let value = serde_json::to_string(data)?;
        let key = self.key_name(key);
        debug!(operation, key = %key, bytes = value.len(), "writing record");
        self.client.set(&key, &value)
    }
}

impl<C: KeyValueClient> Storage for RedisStorage<C> {
    fn supports_partial_updates(&self) -> bool {
        false
    }

    fn supports_composite_primary_keys(&self) -> bool {
        false
    }

    fn requires_composite_primary_keys(&self) -> bool {
        false
    }

    fn insert(&self, _storage_name: &str, key: &str, data: &Record) -> StorageResult<()> {
        self.write("insert", key, data)
    }

    fn update(&self, _storage_name: &str, key: &str, data: &Record) -> StorageResult<()> {
        self.write("update", key, data)
    }

    fn delete(&self, _storage_name: &str, key: &str) -> StorageResult<()> {
        let key = self.key_name(key);
        if self.client.exists(&key)? {
            debug!(key = %key, "deleting record");
            self.client.delete(&key)?;
        }
        Ok(())
    }

    fn find(&self, _storage_name: &str, key: &str) -> StorageResult<Record> {
        let key = self.key_name(key);
        if !self.client.exists(&key)? {
            return Err(StorageError::NotFound { key });
        }

        debug!(key = %key, "reading record");
        let text = self.client.get(&key)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(feature = "redis")]
impl RedisStorage<redis::Client> {
    /// Open a Redis client for `url` and wrap it in an adapter
    ///
    /// No connection is made until the first operation.
    pub fn open(url: &str, config: StoreConfig) -> StorageResult<Self> {
        let client = redis::Client::open(url).map_err(StorageError::backend)?;
        Ok(Self::with_config(client, config))
    }
}
