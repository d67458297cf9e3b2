// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration.
//!
//! Supports both programmatic and file-based (TOML) configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default size of the encode scratch buffer.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 1024;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Codec configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Initial size of the encode scratch buffer (bytes).
    #[serde(default = "default_scratch_capacity")]
    pub scratch_capacity: usize,

    /// Accept unread bytes after a decoded value.
    #[serde(default)]
    pub allow_trailing_data: bool,

    /// Namespace applied to dotless names while parsing schemas.
    #[serde(default)]
    pub namespace: Option<String>,
}

fn default_scratch_capacity() -> usize {
    DEFAULT_SCRATCH_CAPACITY
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            allow_trailing_data: false,
            namespace: None,
        }
    }
}

impl CodecConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scratch_capacity == 0 {
            return Err(ConfigError::Invalid(
                "scratch_capacity must be greater than zero".into(),
            ));
        }
        if let Some(ns) = &self.namespace {
            if !ns.is_empty() && !crate::schema::names::is_valid_namespace(ns) {
                return Err(ConfigError::Invalid(format!("invalid namespace: {}", ns)));
            }
        }
        Ok(())
    }
}
