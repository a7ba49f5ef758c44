//! # kv-storage
//!
//! Storage backends for a key-value abstraction layer. A repository layer maps
//! domain objects to plain [`Record`](storage::Record)s and hands them to a
//! [`Storage`](storage::Storage) implementation together with their key.
//!
//! ## Features
//!
//! - **Storage contract**: `insert`, `update`, `delete`, `find` and fixed capability flags
//! - **Redis adapter**: records stored as JSON text under a configurable key prefix
//! - **Clients**: in-memory and local filesystem clients, plus `redis::Client`
//!
//! ## Optional Features
//!
//! - `redis`: Redis server client via the `redis` crate
//!
//! ## Example
//!
//! ```rust
//! use kv_storage::prelude::*;
//!
//! let storage = RedisStorage::with_config(MemoryClient::new(), StoreConfig::with_key_prefix("app:"));
//! assert_eq!(storage.key_name("42"), "app:42");
//! assert_eq!(storage.name(), "redis");
//! assert!(!storage.supports_partial_updates());
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export core error types
pub use error::{Error, Result};

// Core modules
pub mod error;
pub mod storage;

// Utility modules
mod utils;

// Re-export commonly used types
pub mod prelude {
    //! Common types and traits for convenient importing

    pub use crate::error::{Error, Result, StorageError, StorageResult};
    pub use crate::storage::{
        KeyValueClient, LocalClient, LocalConfig, MemoryClient, MemoryStorage, Record,
        RedisStorage, Storage, StoreConfig,
    };
}

// Version information
/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
