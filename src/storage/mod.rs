//! Storage module for record persistence
//!
//! This module provides the storage contract consumed by a repository layer
//! and its backend implementations:
//! - **[`RedisStorage`]** - JSON records under a prefixed key namespace, over
//!   any Redis-style [`KeyValueClient`]
//! - **[`MemoryStorage`]** - records kept directly in process memory
//!
//! Clients for [`RedisStorage`]:
//! - **[`MemoryClient`]** - in-process map, handy for tests
//! - **[`LocalClient`]** - one file per key under a base directory
//! - **`redis::Client`** - a real Redis server (optional, requires `redis` feature)
//!
//! # Examples
//!
//! ```rust
//! use kv_storage::storage::{MemoryClient, Record, RedisStorage, Storage};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MemoryClient::new();
//! let storage = RedisStorage::new(client.clone());
//!
//! let mut book = Record::new();
//! book.insert("author".to_string(), json!("John Doe"));
//! book.insert("title".to_string(), json!("example book"));
//!
//! storage.insert("books", "1", &book)?;
//! assert_eq!(
//!     client.raw("doctrine:storage:1")?.as_deref(),
//!     Some(r#"{"author":"John Doe","title":"example book"}"#)
//! );
//! assert_eq!(storage.find("books", "1")?, book);
//!
//! storage.delete("books", "1")?;
//! assert!(storage.find("books", "1").unwrap_err().is_not_found());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod memory_adapter;
pub mod redis_storage;
pub mod storage_api;
pub mod storage_local;

#[cfg(feature = "redis")]
pub mod redis_client;

pub use adapter::{KeyValueClient, Record, Storage};
pub use memory_adapter::{MemoryClient, MemoryStorage};
pub use redis_storage::RedisStorage;
pub use storage_api::StoreConfig;
pub use storage_local::{LocalClient, LocalConfig};

use crate::error::{StorageError, StorageResult};

/// Storage constants
pub mod constants {
    //! Constants used throughout the storage module

    /// Default namespace prepended to every logical key
    pub const DEFAULT_KEY_PREFIX: &str = "doctrine:storage:";
}

/// Storage factory for creating storage instances
pub struct StorageFactory;

impl StorageFactory {
    /// Create a Redis-style adapter over an in-memory client
    pub fn create_memory(config: StoreConfig) -> RedisStorage<MemoryClient> {
        RedisStorage::with_config(MemoryClient::new(), config)
    }

    /// Create a Redis-style adapter over the local filesystem
    pub fn create_local(
        local_config: LocalConfig,
        config: StoreConfig,
    ) -> StorageResult<RedisStorage<LocalClient>> {
        Ok(RedisStorage::with_config(LocalClient::new(local_config)?, config))
    }

    /// Create an adapter for a Redis server (requires `redis` feature)
    #[cfg(feature = "redis")]
    pub fn create_redis(url: &str, config: StoreConfig) -> StorageResult<RedisStorage<redis::Client>> {
        RedisStorage::open(url, config)
    }

    /// Create storage from URL (convenience method)
    ///
    /// Supported schemes: `memory://`, `file://<path>` and, with the `redis`
    /// feature, `redis://` / `rediss://`.
    pub fn from_url(url: &str, config: StoreConfig) -> StorageResult<Box<dyn Storage>> {
        if url == "memory://" {
            Ok(Box::new(Self::create_memory(config)))
        } else if let Some(path) = url.strip_prefix("file://") {
            let local_config = LocalConfig {
                base_path: std::path::PathBuf::from(path),
                ..Default::default()
            };
            Ok(Box::new(Self::create_local(local_config, config)?))
        } else if url.starts_with("redis://") || url.starts_with("rediss://") {
            #[cfg(feature = "redis")]
            {
                Ok(Box::new(Self::create_redis(url, config)?))
            }
            #[cfg(not(feature = "redis"))]
            {
                let _ = config;
                Err(StorageError::OperationFailed {
                    operation: "parse_storage_url".to_string(),
                    reason: "Redis backend not available, enable the `redis` feature".to_string(),
                })
            }
        } else {
            Err(StorageError::InvalidArgument {
                reason: format!("Unsupported storage URL: {}", url),
            })
        }
    }
}
