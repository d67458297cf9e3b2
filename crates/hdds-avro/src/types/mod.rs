// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The type contract and the concrete types built on it.
//!
//! Every compiled schema node implements [`Type`]: structural checking,
//! reading, skipping and writing over a [`Cursor`](crate::Cursor), plus JSON
//! conversion. The byte-level and text-level entry points (`encode`,
//! `decode`, `parse_text`, `to_text`, `validate`) are derived once for all
//! types in an inherent `impl dyn Type` block.
//!
//! State that used to be process-wide lives with the caller: [`Encoder`]
//! owns the growable scratch buffer and [`CheckContext`] owns the path
//! stack reported to validation callbacks.

mod array;
mod field;
mod record;
mod reference;
mod string;

pub use array::{ArrayType, MAX_ZERO_WIDTH_ITEMS};
pub use field::{Field, Order};
pub use record::{parse_record, RecordType};
pub use reference::RecursiveType;
pub use string::StringType;

use crate::config::{CodecConfig, DEFAULT_SCRATCH_CAPACITY};
use crate::cursor::{Cursor, ReadCursor, WriteCursor};
use crate::error::{Error, Result};
use crate::value::Value;
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a compiled type.
pub type TypeRef = Arc<dyn Type>;

/// Callback receiving `(path, value, type)` for every invalid leaf.
pub type InvalidHook<'a> = dyn FnMut(&[String], &Value, &dyn Type) + 'a;

/// Type kind enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TypeKind {
    /// UTF-8 string primitive.
    String,
    /// Block-encoded homogeneous sequence.
    Array,
    /// Named record with ordered fields.
    Record,
    /// Type supplied by a logical-type hook.
    Logical,
}

/// Operations shared by every compiled type.
pub trait Type: fmt::Debug + Send + Sync {
    /// Kind of this type.
    fn kind(&self) -> TypeKind;

    /// Qualified name for named types, the kind name otherwise.
    fn name(&self) -> &str;

    /// Structural validity.
    ///
    /// Without a context this stops at the first failure. With one, every
    /// child is visited and each invalid leaf is reported with its path.
    fn check(&self, value: &Value, ctx: Option<&mut CheckContext<'_>>) -> bool;

    /// Read one value. `None` means the cursor ran past the buffer end.
    fn read(&self, cursor: &mut ReadCursor<'_>) -> Option<Value>;

    /// Advance past one value without materializing it.
    fn skip(&self, cursor: &mut ReadCursor<'_>);

    /// Write one value. Fails with [`Error::InvalidValue`] on a shape mismatch.
    fn write(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<()>;

    /// Build a value from its JSON representation.
    fn from_json(&self, json: &JsonValue) -> Result<Value>;

    /// Render a value as JSON.
    fn to_json(&self, value: &Value) -> Result<JsonValue>;

    /// Record view of this type, if it is (or refers to) a record.
    fn as_record(&self) -> Option<Arc<RecordType>> {
        None
    }

    /// Fewest bytes any encoded value of this type occupies; 0 when unknown.
    ///
    /// Array decoding uses it to reject block counts the input cannot hold.
    fn min_width(&self) -> usize {
        0
    }
}

/// Caller-owned validation state: the path stack and the callback.
pub struct CheckContext<'a> {
    path: Vec<String>,
    on_invalid: &'a mut InvalidHook<'a>,
}

impl<'a> CheckContext<'a> {
    /// Create a context with an empty path.
    pub fn new(on_invalid: &'a mut InvalidHook<'a>) -> Self {
        Self {
            path: Vec::new(),
            on_invalid,
        }
    }

    /// Path from the root to the value currently being checked.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Report `value` as an invalid leaf of type `ty` at the current path.
    pub fn report(&mut self, value: &Value, ty: &dyn Type) {
        (self.on_invalid)(&self.path, value, ty);
    }

    /// Run `f` with `segment` pushed onto the path.
    pub fn nested<R>(&mut self, segment: impl Into<String>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(segment.into());
        let result = f(self);
        self.path.pop();
        result
    }
}

impl fmt::Debug for CheckContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Growable scratch buffer reused across encode calls.
///
/// Writes go to a fixed-size buffer; when a write overflows it, the buffer
/// doubles and the encode is retried from position zero. It never shrinks.
#[derive(Debug)]
pub struct Encoder {
    scratch: Vec<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Encoder with the default scratch capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SCRATCH_CAPACITY)
    }

    /// Encoder with a specific initial scratch capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            scratch: vec![0; capacity.max(1)],
        }
    }

    /// Encoder sized from configuration.
    pub fn from_config(config: &CodecConfig) -> Self {
        Self::with_capacity(config.scratch_capacity)
    }

    /// Current scratch capacity.
    pub fn capacity(&self) -> usize {
        self.scratch.len()
    }

    /// Encode `value` with `ty`, returning exactly the bytes written.
    pub fn encode(&mut self, ty: &dyn Type, value: &Value) -> Result<Vec<u8>> {
        self.encode_with(|cursor| ty.write(cursor, value))
    }

    pub(crate) fn encode_with(
        &mut self,
        mut write: impl FnMut(&mut WriteCursor<'_>) -> Result<()>,
    ) -> Result<Vec<u8>> {
        loop {
            let mut cursor = Cursor::new(&mut self.scratch[..]);
            write(&mut cursor)?;
            let written = cursor.position();
            if cursor.is_valid() {
                return Ok(self.scratch[..written].to_vec());
            }
            let mut capacity = self.scratch.len();
            while capacity < written {
                capacity = capacity.saturating_mul(2);
            }
            log::debug!(
                "[encoder] scratch overflow ({} bytes needed), growing {} -> {}",
                written,
                self.scratch.len(),
                capacity
            );
            self.scratch.resize(capacity, 0);
        }
    }
}

/// Reads values laid out by a different, compatible writer schema.
///
/// Resolution itself is out of this crate's scope; a resolver supplied in
/// [`DecodeOptions`] replaces the type's own reader.
pub trait Resolver: Send + Sync {
    /// Read one value in the resolver's writer layout.
    fn read(&self, cursor: &mut ReadCursor<'_>) -> Option<Value>;
}

/// Options for `decode_with`.
#[derive(Clone, Copy, Default)]
pub struct DecodeOptions<'a> {
    /// Reader replacing the type's own.
    pub resolver: Option<&'a dyn Resolver>,
    /// Accept unread bytes after the value.
    pub allow_trailing_data: bool,
}

impl DecodeOptions<'_> {
    /// Options taken from configuration.
    pub fn from_config(config: &CodecConfig) -> Self {
        Self {
            resolver: None,
            allow_trailing_data: config.allow_trailing_data,
        }
    }
}

impl dyn Type {
    /// Encode a value into a fresh byte vector.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        Encoder::new().encode(self, value)
    }

    /// Decode exactly one value spanning all of `bytes`.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        self.decode_with(bytes, DecodeOptions::default())
            .map(|(value, _)| value)
    }

    /// Decode one value, returning it with the number of bytes consumed.
    pub fn decode_with(&self, bytes: &[u8], options: DecodeOptions<'_>) -> Result<(Value, usize)> {
        let mut cursor = Cursor::new(bytes);
        let value = match options.resolver {
            Some(resolver) => resolver.read(&mut cursor),
            None => self.read(&mut cursor),
        };
        if !cursor.is_valid() {
            log::debug!(
                "[decode] {} overran {}-byte buffer (position {})",
                self.name(),
                bytes.len(),
                cursor.position()
            );
            return Err(Error::TruncatedBuffer);
        }
        let value = value.ok_or(Error::TruncatedBuffer)?;
        let consumed = cursor.position();
        if !options.allow_trailing_data && consumed < bytes.len() {
            return Err(Error::TrailingData {
                remaining: bytes.len() - consumed,
            });
        }
        Ok((value, consumed))
    }

    /// Parse a value from JSON text.
    pub fn parse_text(&self, text: &str) -> Result<Value> {
        let json: JsonValue = serde_json::from_str(text)?;
        self.from_json(&json)
    }

    /// Render a value as JSON text.
    pub fn to_text(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json(value)?)?)
    }

    /// `true` if `value` is valid for this type.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.check(value, None)
    }

    /// Validate, reporting every invalid leaf to `on_invalid`.
    ///
    /// Each call starts from an empty path.
    pub fn validate(
        &self,
        value: &Value,
        mut on_invalid: impl FnMut(&[String], &Value, &dyn Type),
    ) -> bool {
        let mut ctx = CheckContext::new(&mut on_invalid);
        self.check(value, Some(&mut ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoder_grows_and_retries() {
        let ty: TypeRef = Arc::new(StringType);
        let long = "x".repeat(100);
        let mut encoder = Encoder::with_capacity(4);

        let bytes = encoder.encode(ty.as_ref(), &Value::from(long.as_str())).unwrap();
        assert_eq!(bytes.len(), 2 + 100);
        assert!(encoder.capacity() >= 102);
        assert_eq!(encoder.capacity(), 128);

        // Never shrinks.
        encoder.encode(ty.as_ref(), &Value::from("a")).unwrap();
        assert_eq!(encoder.capacity(), 128);
    }

    #[test]
    fn test_decode_truncated() {
        let ty: TypeRef = Arc::new(StringType);
        let err = ty.decode(&[0x0A, b'a']).unwrap_err();
        assert!(matches!(err, Error::TruncatedBuffer));
    }

    #[test]
    fn test_decode_trailing_data() {
        let ty: TypeRef = Arc::new(StringType);
        let err = ty.decode(&[0x02, b'a', 0xFF]).unwrap_err();
        assert!(matches!(err, Error::TrailingData { remaining: 1 }));

        let options = DecodeOptions {
            allow_trailing_data: true,
            ..Default::default()
        };
        let (value, consumed) = ty.decode_with(&[0x02, b'a', 0xFF], options).unwrap();
        assert_eq!(value.as_str(), Some("a"));
        assert_eq!(consumed, 2);
    }

    #[derive(Debug)]
    struct FixedResolver;

    impl Resolver for FixedResolver {
        fn read(&self, cursor: &mut ReadCursor<'_>) -> Option<Value> {
            let n = cursor.read_long();
            Some(Value::String(n.to_string()))
        }
    }

    #[test]
    fn test_decode_with_resolver() {
        let ty: TypeRef = Arc::new(StringType);
        let options = DecodeOptions {
            resolver: Some(&FixedResolver),
            ..Default::default()
        };
        let (value, _) = ty.decode_with(&[0x54], options).unwrap();
        assert_eq!(value.as_str(), Some("42"));
    }

    #[test]
    fn test_text_roundtrip() {
        let ty: TypeRef = Arc::new(StringType);
        let value = ty.parse_text(r#""héllo""#).unwrap();
        assert_eq!(ty.to_text(&value).unwrap(), r#""héllo""#);
    }

    #[test]
    fn test_context_path_stack() {
        let mut seen = Vec::new();
        let mut hook = |path: &[String], _: &Value, _: &dyn Type| seen.push(path.to_vec());
        let mut ctx = CheckContext::new(&mut hook);
        ctx.nested("a", |ctx| {
            ctx.nested("0", |ctx| ctx.report(&Value::Null, &StringType));
        });
        assert!(ctx.path().is_empty());
        drop(ctx);
        assert_eq!(seen, vec![vec!["a".to_string(), "0".to_string()]]);
    }
}
