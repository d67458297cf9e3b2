// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema factory: compiles JSON-shaped schemas into a type graph.
//!
//! # Resolution
//!
//! - An already compiled type is returned unchanged
//! - A name resolves through the [`Registry`]: exact name first, then the
//!   name qualified with the active namespace, then as a primitive (created
//!   on first use and cached in the registry)
//! - An object dispatches on its `type` attribute
//!
//! The active namespace starts as [`ParseOptions::namespace`]; a nested
//! schema's own `namespace` replaces it for that schema and its descendants.

pub mod names;

mod logical;
mod registry;

pub use logical::{LogicalType, LogicalTypes};
pub use registry::Registry;

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::types::{ArrayType, RecordType, StringType, TypeRef};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

/// Input to the factory.
#[derive(Debug, Clone)]
pub enum Schema<'a> {
    /// Already compiled type.
    Type(TypeRef),
    /// Name reference.
    Name(&'a str),
    /// Schema definition (or a JSON string holding a name reference).
    Json(&'a JsonValue),
}

impl From<TypeRef> for Schema<'_> {
    fn from(ty: TypeRef) -> Self {
        Self::Type(ty)
    }
}

impl<'a> From<&'a str> for Schema<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a JsonValue> for Schema<'a> {
    fn from(json: &'a JsonValue) -> Self {
        Self::Json(json)
    }
}

/// Parse options threaded through every recursive factory call.
#[derive(Default)]
pub struct ParseOptions {
    /// Named types; reuse the options to share names across parses.
    pub registry: Registry,
    /// Namespace applied to dotless names.
    pub namespace: Option<String>,
    /// Logical-type hooks.
    pub logical_types: LogicalTypes,
}

impl ParseOptions {
    /// Options with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options taken from configuration.
    pub fn from_config(config: &CodecConfig) -> Self {
        Self {
            namespace: config.namespace.clone().filter(|ns| !ns.is_empty()),
            ..Self::default()
        }
    }

    /// Set the default namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Register a logical-type hook.
    pub fn with_logical_type(mut self, name: impl Into<String>, hook: Arc<dyn LogicalType>) -> Self {
        self.logical_types.insert(name.into(), hook);
        self
    }
}

impl std::fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut hooks: Vec<&String> = self.logical_types.keys().collect();
        hooks.sort();
        f.debug_struct("ParseOptions")
            .field("registry", &self.registry.names())
            .field("namespace", &self.namespace)
            .field("logical_types", &hooks)
            .finish()
    }
}

/// Compile a schema with a fresh registry.
pub fn parse<'a>(schema: impl Into<Schema<'a>>) -> Result<TypeRef> {
    parse_with(schema, &mut ParseOptions::default())
}

/// Compile a schema with caller-supplied options.
///
/// On failure the registry is left as it was before the call: types
/// completed while parsing the failed schema are removed again.
pub fn parse_with<'a>(schema: impl Into<Schema<'a>>, opts: &mut ParseOptions) -> Result<TypeRef> {
    let namespace = opts.namespace.clone();
    let before = opts.registry.snapshot();
    let result = create_type(schema.into(), opts, namespace.as_deref());
    if result.is_err() {
        opts.registry.rollback(&before);
    }
    result
}

/// Compile a schema from JSON text.
pub fn parse_str(text: &str) -> Result<TypeRef> {
    let json: JsonValue = serde_json::from_str(text)?;
    parse(&json)
}

pub(crate) fn create_type(
    schema: Schema<'_>,
    opts: &mut ParseOptions,
    namespace: Option<&str>,
) -> Result<TypeRef> {
    match schema {
        Schema::Type(ty) => Ok(ty),
        Schema::Name(name) => resolve_name(name, opts, namespace),
        Schema::Json(JsonValue::String(name)) => resolve_name(name, opts, namespace),
        Schema::Json(JsonValue::Object(obj)) => create_from_object(obj, opts, namespace),
        Schema::Json(JsonValue::Null) => Err(Error::schema(
            "invalid type: null (did you mean \"null\"?)",
        )),
        Schema::Json(JsonValue::Array(_)) => Err(Error::schema("union types are not supported")),
        Schema::Json(other) => Err(Error::schema(format!("invalid type: {}", other))),
    }
}

fn resolve_name(name: &str, opts: &mut ParseOptions, namespace: Option<&str>) -> Result<TypeRef> {
    if let Some(ty) = opts.registry.get(name) {
        return Ok(ty);
    }
    if let Some(ns) = namespace.filter(|ns| !ns.is_empty() && !name.contains('.')) {
        if let Some(ty) = opts.registry.get(&format!("{}.{}", ns, name)) {
            return Ok(ty);
        }
    }
    if names::is_primitive(name) {
        let ty = create_primitive(name)?;
        opts.registry.register(name, ty.clone())?;
        return Ok(ty);
    }
    Err(Error::schema(format!("undefined type name: {}", name)))
}

fn create_primitive(name: &str) -> Result<TypeRef> {
    match name {
        "string" => Ok(Arc::new(StringType)),
        other => Err(Error::schema(format!("unsupported type: {}", other))),
    }
}

fn create_from_object(
    obj: &Map<String, JsonValue>,
    opts: &mut ParseOptions,
    namespace: Option<&str>,
) -> Result<TypeRef> {
    let ty: TypeRef = match obj.get("type") {
        Some(JsonValue::String(kind)) => match kind.as_str() {
            "record" => RecordType::from_schema(obj, opts, namespace)? as TypeRef,
            "array" => {
                let items = obj
                    .get("items")
                    .ok_or_else(|| Error::schema("missing array items"))?;
                let items = create_type(Schema::Json(items), opts, namespace)?;
                Arc::new(ArrayType::new(items)) as TypeRef
            }
            primitive if names::is_primitive(primitive) => {
                resolve_name(primitive, opts, namespace)?
            }
            "enum" | "map" | "fixed" | "error" => {
                return Err(Error::schema(format!("unsupported type: {}", kind)))
            }
            other => return Err(Error::schema(format!("unknown type: {}", other))),
        },
        Some(JsonValue::Null) => {
            return Err(Error::schema("invalid type: null (did you mean \"null\"?)"))
        }
        Some(other) => return Err(Error::schema(format!("unknown type: {}", other))),
        None => return Err(Error::schema("missing type")),
    };

    match obj.get("logicalType").and_then(JsonValue::as_str) {
        Some(logical) => match opts.logical_types.get(logical).cloned() {
            Some(hook) => {
                log::trace!("[schema] applying logical type {}", logical);
                hook.wrap(obj, ty)
            }
            None => Ok(ty),
        },
        None => Ok(ty),
    }
}
