// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Back-references to records that were still being parsed.

use super::{CheckContext, RecordType, Type, TypeKind};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{Error, Result};
use crate::value::Value;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Weak};

/// Reference from inside a record to one of its enclosing records.
///
/// Holding the target weakly keeps the strong reference graph acyclic; the
/// target is alive as long as anything that can reach this reference is.
#[derive(Debug)]
pub struct RecursiveType {
    name: String,
    target: Weak<RecordType>,
}

impl RecursiveType {
    pub(crate) fn new(name: impl Into<String>, target: Weak<RecordType>) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    fn resolve(&self) -> Result<Arc<RecordType>> {
        self.target
            .upgrade()
            .ok_or_else(|| Error::DanglingReference(self.name.clone()))
    }
}

impl Type for RecursiveType {
    fn kind(&self) -> TypeKind {
        TypeKind::Record
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, value: &Value, ctx: Option<&mut CheckContext<'_>>) -> bool {
        match self.resolve() {
            Ok(target) => target.check(value, ctx),
            Err(_) => {
                if let Some(ctx) = ctx {
                    ctx.report(value, self);
                }
                false
            }
        }
    }

    fn read(&self, cursor: &mut ReadCursor<'_>) -> Option<Value> {
        self.resolve().ok()?.read(cursor)
    }

    fn skip(&self, cursor: &mut ReadCursor<'_>) {
        match self.resolve() {
            Ok(target) => target.skip(cursor),
            Err(_) => cursor.invalidate(),
        }
    }

    fn write(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<()> {
        self.resolve()?.write(cursor, value)
    }

    fn from_json(&self, json: &JsonValue) -> Result<Value> {
        self.resolve()?.from_json(json)
    }

    fn to_json(&self, value: &Value) -> Result<JsonValue> {
        self.resolve()?.to_json(value)
    }

    fn as_record(&self) -> Option<Arc<RecordType>> {
        self.target.upgrade()
    }
    fn min_width(&self) -> usize {
        self.target.upgrade().map_or(0, |t| t.min_width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeRef;

    #[test]
    fn test_dangling_reference() {
        let ty: TypeRef = Arc::new(RecursiveType::new("gone.Node", Weak::new()));
        assert!(matches!(
            ty.encode(&Value::Null),
            Err(Error::DanglingReference(name)) if name == "gone.Node"
        ));
        assert!(!ty.is_valid(&Value::Null));
        assert!(matches!(ty.decode(&[]), Err(Error::TruncatedBuffer)));
        assert!(ty.as_record().is_none());
    }
}
