// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Block-encoded arrays.
//!
//! # Wire format
//!
//! ```text
//! block*  0
//! block = count item{count}                 (count > 0)
//!       | -count byte_size item{count}      (count < 0, size-prefixed)
//! ```
//!
//! Writers emit a single positive block followed by the zero terminator (an
//! empty array is just the terminator). Readers accept any number of blocks
//! of either sign; size-prefixed blocks let [`ArrayType::skip`] jump over
//! items without decoding them.

use super::{CheckContext, Type, TypeKind, TypeRef};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{Error, Result};
use crate::value::Value;
use serde_json::Value as JsonValue;

/// Most items one array may hold when its item type can encode to zero bytes.
pub const MAX_ZERO_WIDTH_ITEMS: u64 = 1 << 16;

/// `array`: homogeneous sequence of `items`.
#[derive(Debug)]
pub struct ArrayType {
    items: TypeRef,
}

impl ArrayType {
    /// Create an array type over `items`.
    pub fn new(items: TypeRef) -> Self {
        Self { items }
    }

    /// Item type.
    pub fn items(&self) -> &TypeRef {
        &self.items
    }

    /// Read a block header, returning the item count (0 = end of array).
    fn block_len(cursor: &mut ReadCursor<'_>) -> Option<u64> {
        let count = cursor.read_long();
        if count < 0 {
            // Byte size of the block; not needed when decoding items.
            cursor.skip_long();
        }
        if cursor.is_valid() {
            Some(count.unsigned_abs())
        } else {
            None
        }
    }

    /// Check a block count against what the input can hold.
    ///
    /// Items with a known width may not outnumber the bytes left for them.
    /// Items that may encode to nothing are capped per array. A rejected
    /// block invalidates the cursor.
    fn admit_block(&self, cursor: &mut ReadCursor<'_>, count: u64, seen: &mut u64) -> bool {
        let width = self.items.min_width() as u64;
        *seen = seen.saturating_add(count);
        let fits = if width == 0 {
            *seen <= MAX_ZERO_WIDTH_ITEMS
        } else {
            count <= cursor.remaining() as u64 / width
        };
        if !fits {
            log::debug!(
                "[array] block of {} {} items exceeds input ({} bytes left)",
                count,
                self.items.name(),
                cursor.remaining()
            );
            cursor.invalidate();
        }
        fits
    }
}

impl Type for ArrayType {
    fn kind(&self) -> TypeKind {
        TypeKind::Array
    }

    fn name(&self) -> &str {
        "array"
    }

    fn check(&self, value: &Value, mut ctx: Option<&mut CheckContext<'_>>) -> bool {
        let Value::Array(items) = value else {
            if let Some(ctx) = ctx {
                ctx.report(value, self);
            }
            return false;
        };
        let mut valid = true;
        for (index, item) in items.iter().enumerate() {
            match ctx.as_deref_mut() {
                None => {
                    if !self.items.check(item, None) {
                        return false;
                    }
                }
                Some(ctx) => {
                    valid &= ctx.nested(index.to_string(), |ctx| self.items.check(item, Some(ctx)));
                }
            }
        }
        valid
    }

    fn read(&self, cursor: &mut ReadCursor<'_>) -> Option<Value> {
        let mut items = Vec::new();
        let mut seen = 0;
        loop {
            let count = Self::block_len(cursor)?;
            if count == 0 {
                return Some(Value::Array(items));
            }
            if !self.admit_block(cursor, count, &mut seen) {
                return None;
            }
            for _ in 0..count {
                items.push(self.items.read(cursor)?);
                if !cursor.is_valid() {
                    return None;
                }
            }
        }
    }

    fn skip(&self, cursor: &mut ReadCursor<'_>) {
        let mut seen = 0;
        loop {
            let count = cursor.read_long();
            if count == 0 || !cursor.is_valid() {
                return;
            }
            if count < 0 {
                let size = cursor.read_long();
                match usize::try_from(size) {
                    Ok(size) => cursor.advance(size),
                    Err(_) => {
                        cursor.invalidate();
                        return;
                    }
                }
            } else {
                if !self.admit_block(cursor, count.unsigned_abs(), &mut seen) {
                    return;
                }
                for _ in 0..count {
                    self.items.skip(cursor);
                    if !cursor.is_valid() {
                        return;
                    }
                }
            }
        }
    }

    fn write(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<()> {
        let Value::Array(items) = value else {
            return Err(Error::invalid_value(self.name(), value));
        };
        if !items.is_empty() {
            cursor.write_long(items.len() as i64);
            for item in items {
                self.items.write(cursor, item)?;
            }
        }
        cursor.write_long(0);
        Ok(())
    }

    fn from_json(&self, json: &JsonValue) -> Result<Value> {
        match json {
            JsonValue::Array(items) => items
                .iter()
                .map(|item| self.items.from_json(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            other => Err(Error::invalid_value(self.name(), other)),
        }
    }

    fn to_json(&self, value: &Value) -> Result<JsonValue> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| self.items.to_json(item))
                .collect::<Result<Vec<_>>>()
                .map(JsonValue::Array),
            other => Err(Error::invalid_value(self.name(), other)),
        }
    }

    fn min_width(&self) -> usize {
        // Terminating zero count.
        1
    }
}
