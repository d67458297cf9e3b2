// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! UTF-8 string primitive.

use super::{CheckContext, Type, TypeKind};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{Error, Result};
use crate::value::Value;
use serde_json::Value as JsonValue;

/// `string`: varint byte length followed by UTF-8 bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringType;

impl Type for StringType {
    fn kind(&self) -> TypeKind {
        TypeKind::String
    }

    fn name(&self) -> &str {
        "string"
    }

    fn check(&self, value: &Value, ctx: Option<&mut CheckContext<'_>>) -> bool {
        let valid = matches!(value, Value::String(_));
        if !valid {
            if let Some(ctx) = ctx {
                ctx.report(value, self);
            }
        }
        valid
    }

    fn read(&self, cursor: &mut ReadCursor<'_>) -> Option<Value> {
        cursor.read_string().map(Value::String)
    }

    fn skip(&self, cursor: &mut ReadCursor<'_>) {
        cursor.skip_string();
    }

    fn write(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<()> {
        match value {
            Value::String(s) => {
                cursor.write_string(s);
                Ok(())
            }
            other => Err(Error::invalid_value(self.name(), other)),
        }
    }

    fn from_json(&self, json: &JsonValue) -> Result<Value> {
        match json {
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            other => Err(Error::invalid_value(self.name(), other)),
        }
    }

    fn to_json(&self, value: &Value) -> Result<JsonValue> {
        match value {
            Value::String(s) => Ok(JsonValue::String(s.clone())),
            other => Err(Error::invalid_value(self.name(), other)),
        }
    }
    fn min_width(&self) -> usize {
        // Length prefix.
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeRef;
    use std::sync::Arc;

    #[test]
    fn test_roundtrip_unicode() {
        let ty: TypeRef = Arc::new(StringType);
        for s in ["", "a", "héllo wörld", "日本語", "🦀 crab", &"z".repeat(5000)] {
            let bytes = ty.encode(&Value::from(s)).unwrap();
            assert_eq!(ty.decode(&bytes).unwrap(), Value::from(s));
        }
    }

    #[test]
    fn test_write_rejects_non_string() {
        let ty: TypeRef = Arc::new(StringType);
        let err = ty.encode(&Value::Long(1)).unwrap_err();
        match err {
            Error::InvalidValue { ty, value } => {
                assert_eq!(ty, "string");
                assert_eq!(value, "1");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_check_reports_leaf() {
        let ty: TypeRef = Arc::new(StringType);
        let mut reports = 0;
        assert!(!ty.validate(&Value::Null, |path, _, _| {
            assert!(path.is_empty());
            reports += 1;
        }));
        assert_eq!(reports, 1);
        assert!(ty.is_valid(&Value::from("ok")));
    }

    #[test]
    fn test_skip() {
        let ty: TypeRef = Arc::new(StringType);
        let bytes = ty.encode(&Value::from("skipped")).unwrap();
        let mut cursor = crate::Cursor::new(&bytes[..]);
        ty.skip(&mut cursor);
        assert_eq!(cursor.position(), bytes.len());
    }
}
