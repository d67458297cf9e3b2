// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy shared by the schema factory and the codec.
//!
//! Every failure is raised synchronously at the point it is detected and is
//! never retried internally. Validation does not use this type: `check` and
//! `validate` answer `false` and report invalid leaves through a callback.

use crate::config::ConfigError;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Schema and codec errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed schema node (missing `items`/`fields`, `null` schema, bad
    /// field name or order, unknown type, undefined name reference, ...).
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Duplicate registry name, duplicate field name, or an attempt to reuse
    /// a primitive type name.
    #[error("name conflict: {0}")]
    NameConflict(String),

    /// A value did not have the shape its type requires at write time.
    #[error("invalid {ty}: {value}")]
    InvalidValue {
        /// Name of the type that rejected the value.
        ty: String,
        /// Rendering of the offending value.
        value: String,
    },

    /// Decoding consumed past the end of the input buffer.
    #[error("truncated buffer")]
    TruncatedBuffer,

    /// Strict decoding left unread bytes behind.
    #[error("trailing data: {remaining} unread bytes")]
    TrailingData {
        /// Number of bytes left after the value.
        remaining: usize,
    },

    /// A recursive reference outlived the record it points to.
    #[error("dangling reference to {0}")]
    DanglingReference(String),

    /// JSON text could not be parsed or rendered.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn schema(msg: impl Into<String>) -> Self {
        Self::InvalidSchema(msg.into())
    }

    pub(crate) fn conflict(msg: impl Into<String>) -> Self {
        Self::NameConflict(msg.into())
    }

    pub(crate) fn invalid_value(ty: impl Into<String>, value: impl std::fmt::Display) -> Self {
        Self::InvalidValue {
            ty: ty.into(),
            value: value.to_string(),
        }
    }
}
