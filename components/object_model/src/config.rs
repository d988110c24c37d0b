//! Realm configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`RealmConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read realm config: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration text is not valid JSON for this schema
    #[error("invalid realm config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for a realm.
///
/// Every field has a default, so a partial (or empty) JSON document is valid:
///
/// ```
/// use object_model::RealmConfig;
///
/// let config = RealmConfig::from_json_str(r#"{ "max_recursion_depth": 64 }"#).unwrap();
/// assert_eq!(config.max_recursion_depth, 64);
/// assert!(!config.proxy_trap_logging);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmConfig {
    /// Nesting limit for calls into user code and proxy traps
    pub max_recursion_depth: usize,
    /// Largest byte length an ArrayBuffer may be created or resized to
    pub max_array_buffer_byte_length: usize,
    /// Emit a `trace!` record for every proxy trap dispatch
    pub proxy_trap_logging: bool,
}

impl Default for RealmConfig {
    fn default() -> Self {
        RealmConfig {
            max_recursion_depth: 256,
            max_array_buffer_byte_length: 1 << 30,
            proxy_trap_logging: false,
        }
    }
}

impl RealmConfig {
    /// Parse a JSON document
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
