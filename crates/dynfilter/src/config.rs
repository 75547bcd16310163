//! Engine configuration.
//!
//! Configuration is a small YAML document; every key is optional.
//!
//! ```yaml
//! cache:
//!   enabled: true
//!   capacity: 256
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of shapes kept by the shape cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Top-level configuration for a [`Compiler`](crate::Compiler).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub cache: CacheConfig,
}

/// Shape cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl FilterConfig {
    /// Configuration with the shape cache turned off.
    pub fn uncached() -> Self {
        FilterConfig {
            cache: CacheConfig {
                enabled: false,
                ..CacheConfig::default()
            },
        }
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        if yaml.trim().is_empty() {
            return Ok(FilterConfig::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads configuration from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }
}
