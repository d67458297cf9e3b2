// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Logical-type hooks.
//!
//! A schema node carrying `"logicalType": "<name>"` is first compiled as
//! usual; if a hook is registered under `<name>` it then wraps the compiled
//! type. Unknown logical types are ignored.

use crate::error::Result;
use crate::types::TypeRef;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;

/// Wraps an underlying compiled type with logical-type semantics.
pub trait LogicalType: Send + Sync {
    /// Build the logical type from its schema node and compiled underlying type.
    fn wrap(&self, schema: &Map<String, JsonValue>, underlying: TypeRef) -> Result<TypeRef>;
}

/// Hooks keyed by `logicalType` attribute value.
pub type LogicalTypes = HashMap<String, Arc<dyn LogicalType>>;
