//! Local filesystem key-value client
//!
//! Each key is stored in its own file under the base directory. The path is
//! the hex encoding of the key, split into segments of at most
//! [`PATH_SEGMENT_LEN`] characters: long keys become nested directories, so no
//! path component exceeds the file name limit and keys containing `:` or `/`
//! never escape the base directory.

use crate::error::{StorageError, StorageResult};
use crate::storage::adapter::KeyValueClient;
use crate::utils::{hex_to_key, key_to_path_segments, PATH_SEGMENT_LEN};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of files holding values
const VALUE_EXTENSION: &str = "kv";

/// Local storage configuration
#[derive(Debug, Clone)]
pub struct LocalConfig {
    /// Base directory for storage
    pub base_path: PathBuf,
    /// Create the base directory if it doesn't exist
    pub create_dirs: bool,
    /// Use atomic writes (write to temp file, then rename)
    pub atomic_writes: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./storage"),
            create_dirs: true,
            atomic_writes: true,
        }
    }
}

/// File-per-key client
#[derive(Debug, Clone)]
pub struct LocalClient {
    config: LocalConfig,
}

impl LocalClient {
    /// Create a new local client
    pub fn new(config: LocalConfig) -> StorageResult<Self> {
        if config.create_dirs && !config.base_path.exists() {
            fs::create_dir_all(&config.base_path).map_err(|e| StorageError::OperationFailed {
                operation: "create_base_directory".to_string(),
                reason: format!("Failed to create base directory: {}", e),
            })?;
        }

        if !config.base_path.exists() {
            return Err(StorageError::OperationFailed {
                operation: "verify_base_directory".to_string(),
                reason: "Base directory does not exist and create_dirs is disabled".to_string(),
            });
        }

        if !config.base_path.is_dir() {
            return Err(StorageError::OperationFailed {
                operation: "verify_base_directory".to_string(),
                reason: "Base path exists but is not a directory".to_string(),
            });
        }

        Ok(Self { config })
    }

    /// Client configuration
    pub fn config(&self) -> &LocalConfig {
        &self.config
    }

    /// Get the file path holding a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut segments = key_to_path_segments(key);
        let file_stem = segments.pop().unwrap_or_default();
        let mut path = self.config.base_path.clone();
        for segment in segments {
            path.push(segment);
        }
        path.push(format!("{}.{}", file_stem, VALUE_EXTENSION));
        path
    }

    /// Keys currently stored, sorted
    ///
    /// Files that were not written by this client are skipped.
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        self.collect_keys(&self.config.base_path, String::new(), &mut keys)?;
        keys.sort();
        Ok(keys)
    }

    fn collect_keys(&self, dir: &Path, encoded: String, keys: &mut Vec<String>) -> StorageResult<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            if path.is_dir() {
                if name.len() == PATH_SEGMENT_LEN && name.bytes().all(|b| b.is_ascii_hexdigit()) {
                    self.collect_keys(&path, format!("{}{}", encoded, name), keys)?;
                }
            } else if let Some(stem) = name
                .strip_suffix(VALUE_EXTENSION)
                .and_then(|n| n.strip_suffix('.'))
            {
                if let Some(key) = hex_to_key(&format!("{}{}", encoded, stem)) {
                    keys.push(key);
                }
            }
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        if self.config.atomic_writes {
            let temp_path = path.with_extension("tmp");
            {
                let file = File::create(&temp_path)?;
                let mut writer = BufWriter::new(file);
                writer.write_all(data)?;
                writer.flush()?;
            }

            fs::rename(&temp_path, path).map_err(|e| StorageError::OperationFailed {
                operation: "atomic_rename".to_string(),
                reason: format!("Failed to rename temporary file: {}", e),
            })?;
        } else {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(data)?;
            writer.flush()?;
        }
        Ok(())
    }
}

impl KeyValueClient for LocalClient {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        debug!(key, path = %path.display(), "writing file");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.write_file(&path, value.as_bytes())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.path_for(key).is_file())
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, key: &str) -> StorageResult<String> {
        fs::read_to_string(self.path_for(key)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound {
                key: key.to_string(),
            },
            _ => StorageError::Io(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_client(atomic_writes: bool) -> (LocalClient, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = LocalConfig {
            base_path: temp_dir.path().to_path_buf(),
            atomic_writes,
            ..Default::default()
        };
        let client = LocalClient::new(config).unwrap();
        (client, temp_dir)
    }

    #[test]
    fn test_local_config_default() {
        let config = LocalConfig::default();
        assert_eq!(config.base_path, PathBuf::from("./storage"));
        assert!(config.create_dirs);
        assert!(config.atomic_writes);
    }

    #[test]
    fn test_set_and_get() {
        for atomic in [true, false] {
            let (client, _temp_dir) = create_test_client(atomic);
            client.set("doctrine:storage:1", r#"{"a":1}"#).unwrap();
            client.set("doctrine:storage:1", r#"{"a":2}"#).unwrap();
            assert_eq!(client.get("doctrine:storage:1").unwrap(), r#"{"a":2}"#);
        }
    }

    #[test]
    fn test_exists_and_delete() {
        let (client, _temp_dir) = create_test_client(true);
        let key = "users/../escape";

        assert!(!client.exists(key).unwrap());
        client.set(key, "value").unwrap();
        assert!(client.exists(key).unwrap());
        assert!(client.path_for(key).starts_with(client.config().base_path.as_path()));

        client.delete(key).unwrap();
        client.delete(key).unwrap();
        assert!(!client.exists(key).unwrap());
        assert!(client.get(key).unwrap_err().is_not_found());
    }

    #[test]
    fn test_keys_skip_foreign_files() {
        let (client, temp_dir) = create_test_client(true);
        client.set("b", "2").unwrap();
        client.set("a", "1").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "hello").unwrap();

        assert_eq!(client.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_long_keys_use_nested_directories() {
        let (client, _temp_dir) = create_test_client(true);
        let key = format!("doctrine:storage:{}", "k".repeat(2000));

        client.set(&key, "value").unwrap();
        assert_eq!(client.get(&key).unwrap(), "value");

        let path = client.path_for(&key);
        let relative = path.strip_prefix(&client.config().base_path).unwrap();
        assert!(relative.components().count() > 1);
        for component in relative.components() {
            assert!(component.as_os_str().len() <= 255);
        }

        // a key equal to the first directory segment stays a distinct file
        let short = hex_to_key(&key_to_path_segments(&key)[0]).unwrap();
        client.set(&short, "short").unwrap();
        assert_eq!(client.get(&key).unwrap(), "value");

        let mut expected = vec![key.clone(), short];
        expected.sort();
        assert_eq!(client.keys().unwrap(), expected);

        client.delete(&key).unwrap();
        assert!(!client.exists(&key).unwrap());
    }

    #[test]
    fn test_empty_key() {
        let (client, _temp_dir) = create_test_client(true);
        client.set("", "empty").unwrap();
        assert!(client.exists("").unwrap());
        assert_eq!(client.get("").unwrap(), "empty");
        assert_eq!(client.keys().unwrap(), vec![String::new()]);
    }

    #[test]
    fn test_missing_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = LocalConfig {
            base_path: temp_dir.path().join("missing"),
            create_dirs: false,
            ..Default::default()
        };
        assert!(LocalClient::new(config).is_err());

        let file_path = temp_dir.path().join("file");
        fs::write(&file_path, "x").unwrap();
        let config = LocalConfig {
            base_path: file_path,
            ..Default::default()
        };
        assert!(LocalClient::new(config).is_err());
    }

    #[test]
    fn test_creates_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base_path = temp_dir.path().join("nested").join("store");
        let client = LocalClient::new(LocalConfig {
            base_path: base_path.clone(),
            ..Default::default()
        })
        .unwrap();
        client.set("k", "v").unwrap();
        assert!(base_path.is_dir());
    }
}
