//! Viewer configuration.
//!
//! Every field has a default from [`crate::defaults`], so an empty document
//! is a valid configuration. Configuration can be loaded from JSON or YAML.
//!
//! # Example
//!
//! ```
//! use scanview_core::config::ViewerConfig;
//!
//! let config = ViewerConfig::from_yaml_str("resource_debounce_ms: 150\n").unwrap();
//! assert_eq!(config.resource_debounce_ms, 150);
//! assert_eq!(config.role_debounce_ms, 200);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::defaults;
use crate::error::{Error, Result};

/// Tunables for ingestion limits and recompute debouncing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Debounce window for the resource browser, in milliseconds.
    pub resource_debounce_ms: u64,
    /// Debounce window for the IAM role browser, in milliseconds.
    pub role_debounce_ms: u64,
    /// Compiled size limit for search patterns, in bytes.
    pub regex_size_limit: usize,
    /// Largest accepted input file, in bytes.
    pub max_file_bytes: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            resource_debounce_ms: defaults::RESOURCE_DEBOUNCE_MS,
            role_debounce_ms: defaults::ROLE_DEBOUNCE_MS,
            regex_size_limit: defaults::REGEX_SIZE_LIMIT,
            max_file_bytes: defaults::MAX_FILE_BYTES,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        debug!(
            subsystem = "core",
            component = "config",
            ?config,
            "Loaded viewer config from JSON"
        );
        Ok(config)
    }

    /// Parse and validate a YAML configuration document.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        debug!(
            subsystem = "core",
            component = "config",
            ?config,
            "Loaded viewer config from YAML"
        );
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.resource_debounce_ms == 0 || self.role_debounce_ms == 0 {
            return Err(Error::Config(
                "debounce delays must be greater than zero".to_string(),
            ));
        }
        if self.regex_size_limit == 0 {
            return Err(Error::Config(
                "regex_size_limit must be greater than zero".to_string(),
            ));
        }
        if self.max_file_bytes == 0 {
            return Err(Error::Config(
                "max_file_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resource_debounce(&self) -> Duration {
        Duration::from_millis(self.resource_debounce_ms)
    }

    pub fn role_debounce(&self) -> Duration {
        Duration::from_millis(self.role_debounce_ms)
    }

    pub fn with_resource_debounce_ms(mut self, ms: u64) -> Self {
        self.resource_debounce_ms = ms;
        self
    }

    pub fn with_role_debounce_ms(mut self, ms: u64) -> Self {
        self.role_debounce_ms = ms;
        self
    }

    pub fn with_max_file_bytes(mut self, bytes: usize) -> Self {
        self.max_file_bytes = bytes;
        self
    }
}
