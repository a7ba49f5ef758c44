//! Store configuration and shared helpers
//!
//! [`StoreConfig`] is built once when an adapter is constructed and is never
//! mutated afterwards. Caller-supplied options are merged over the defaults.

use crate::error::{Error, Result};
use crate::storage::constants::DEFAULT_KEY_PREFIX;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Option name recognized by [`StoreConfig::from_options`]
pub const KEY_PREFIX_OPTION: &str = "keyPrefix";

/// Storage configuration shared by key-value adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    key_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl StoreConfig {
    /// Create a configuration with a custom key prefix
    pub fn with_key_prefix(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
        }
    }

    /// Merge caller overrides over the defaults
    ///
    /// Only `keyPrefix` is recognized. Other options are ignored.
    pub fn from_options<I, K, V>(options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (name, value) in options {
            match name.as_ref() {
                KEY_PREFIX_OPTION => config.key_prefix = value.into(),
                other => warn!(option = other, "ignoring unrecognized store option"),
            }
        }
        config
    }

    /// Parse a configuration from JSON text, e.g. `{"keyPrefix": "app:"}`
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Configuration {
            message: format!("invalid store configuration: {}", e),
        })
    }

    /// Prefix prepended to every logical key
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }
}
