//! [`KeyValueClient`] for the `redis` crate (requires `redis` feature)
//!
//! Each call takes a fresh synchronous connection from the client and issues
//! a single command. Driver errors are returned unchanged inside
//! [`StorageError::Backend`].

use crate::error::{StorageError, StorageResult};
use crate::storage::adapter::KeyValueClient;
use redis::{Client, Commands, Connection};

fn connection(client: &Client) -> StorageResult<Connection> {
    client.get_connection().map_err(StorageError::backend)
}

impl KeyValueClient for Client {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut conn = connection(self)?;
        conn.set::<_, _, ()>(key, value).map_err(StorageError::backend)
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let mut conn = connection(self)?;
        conn.exists(key).map_err(StorageError::backend)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut conn = connection(self)?;
        conn.del::<_, ()>(key).map_err(StorageError::backend)
    }

    fn get(&self, key: &str) -> StorageResult<String> {
        let mut conn = connection(self)?;
        conn.get(key).map_err(StorageError::backend)
    }
}
