// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Avro-style binary serialization for schema-described values.
//!
//! Schemas arrive as JSON-shaped descriptions (or names of previously
//! defined types) and compile into a graph of [`Type`] objects. Each type
//! validates values structurally, encodes them to a compact binary form and
//! decodes them back, and converts them to and from JSON.
//!
//! # Features
//!
//! - **Schema factory**: names, namespaces, recursive records, defaults and
//!   logical-type hooks
//! - **Binary codec**: zigzag varints, length-prefixed strings, block-encoded
//!   arrays, field-concatenated records
//! - **Validation**: fast yes/no check or full walk reporting every invalid
//!   leaf with its path
//!
//! # Architecture
//!
//! ```text
//!   JSON schema / name
//!        |
//!        v
//!   schema::create_type  <-->  Registry (named types)
//!        |
//!        v
//!   Type graph (StringType, ArrayType, RecordType)
//!        |
//!        v
//!   Cursor (lenient varint / byte I/O)
//! ```
//!
//! # Example
//!
//! ```
//! use hdds_avro::{parse, Value};
//! use serde_json::json;
//!
//! let ty = parse(&json!({
//!     "type": "record",
//!     "name": "Greeting",
//!     "fields": [{"name": "text", "type": "string"}]
//! }))?;
//!
//! let value = ty.parse_text(r#"{"text": "hi"}"#)?;
//! let bytes = ty.encode(&value)?;
//! assert_eq!(bytes, [0x04, b'h', b'i']);
//! assert_eq!(ty.decode(&bytes)?, value);
//! # Ok::<(), hdds_avro::Error>(())
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod schema;
pub mod types;
pub mod value;

pub use config::{CodecConfig, ConfigError};
pub use cursor::{Cursor, ReadCursor, WriteCursor};
pub use error::{Error, Result};
pub use schema::{parse, parse_str, parse_with, LogicalType, ParseOptions, Registry, Schema};
pub use types::{
    parse_record, ArrayType, CheckContext, DecodeOptions, Encoder, Field, Order, RecordType,
    RecursiveType, Resolver, StringType, Type, TypeKind, TypeRef, MAX_ZERO_WIDTH_ITEMS,
};
pub use value::{Record, Value};
