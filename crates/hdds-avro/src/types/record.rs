// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record types.
//!
//! A record is built in three steps: its qualified name is resolved and
//! reserved in the registry (so fields may refer back to it), every field is
//! parsed, and finally the field list is checked for duplicate names and
//! sealed. Defaults are pre-encoded once the record is sealed so the writer
//! can copy them verbatim.
//!
//! # Wire format
//!
//! The concatenation of each field's encoding in declaration order: no
//! tags, no padding.

use super::{CheckContext, Encoder, Field, Type, TypeKind};
use crate::cursor::{ReadCursor, WriteCursor};
use crate::error::{Error, Result};
use crate::schema::{self, names, ParseOptions};
use crate::value::{Record, Value};
use serde_json::{Map, Value as JsonValue};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, OnceLock, Weak};

/// Field list fixed once every field has been parsed.
#[derive(Debug)]
struct Layout {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

/// Structured value viewed as a record.
#[derive(Clone, Copy)]
enum Source<'v> {
    /// Instance of this very record type: positional access.
    Own(&'v Record),
    /// Any other record instance: access by field name.
    Foreign(&'v Record),
    Object(&'v BTreeMap<String, Value>),
}

impl<'v> Source<'v> {
    fn of(value: &'v Value, ty: &RecordType) -> Option<Self> {
        match value {
            Value::Record(r) => Some(Self::of_record(r, ty)),
            Value::Object(map) => Some(Self::Object(map)),
            _ => None,
        }
    }

    fn of_record(record: &'v Record, ty: &RecordType) -> Self {
        if record.is_instance_of(ty) {
            Self::Own(record)
        } else {
            Self::Foreign(record)
        }
    }

    fn get(self, index: usize, name: &str) -> Option<&'v Value> {
        match self {
            Self::Own(r) => r.get_index(index),
            Self::Foreign(r) => r.get(name),
            Self::Object(map) => map.get(name),
        }
    }
}

/// `record`: named type with an ordered field list.
#[derive(Debug)]
pub struct RecordType {
    name: String,
    aliases: Vec<String>,
    doc: Option<String>,
    layout: OnceLock<Layout>,
    default_blobs: OnceLock<Vec<Option<Box<[u8]>>>>,
    min_width: OnceLock<usize>,
    this: Weak<RecordType>,
}

impl RecordType {
    /// Parse a `{"type": "record", ...}` definition.
    pub(crate) fn from_schema(
        obj: &Map<String, JsonValue>,
        opts: &mut ParseOptions,
        namespace: Option<&str>,
    ) -> Result<Arc<Self>> {
        let namespace = match obj.get("namespace") {
            None => namespace,
            Some(JsonValue::String(ns)) if ns.is_empty() => None,
            Some(JsonValue::String(ns)) => Some(ns.as_str()),
            Some(other) => return Err(Error::schema(format!("invalid namespace: {}", other))),
        };
        let name = match obj.get("name") {
            Some(JsonValue::String(name)) => names::qualify(name, namespace)?,
            Some(other) => return Err(Error::schema(format!("invalid record name: {}", other))),
            None => return Err(Error::schema("missing record name")),
        };
        // The full name's prefix (from a dotted name, the `namespace`
        // attribute or the enclosing schema) is what aliases and nested
        // schemas inherit.
        let enclosing = name.rsplit_once('.').map(|(ns, _)| ns.to_string());
        let namespace = enclosing.as_deref();
        let aliases = match obj.get("aliases") {
            None => Vec::new(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|alias| match alias {
                    JsonValue::String(a) => names::qualify(a, namespace),
                    other => Err(Error::schema(format!("invalid alias: {}", other))),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => return Err(Error::schema(format!("invalid aliases: {}", other))),
        };
        let doc = obj.get("doc").and_then(JsonValue::as_str).map(String::from);

        let record = Arc::new_cyclic(|this| Self {
            name: name.clone(),
            aliases,
            doc,
            layout: OnceLock::new(),
            default_blobs: OnceLock::new(),
            min_width: OnceLock::new(),
            this: this.clone(),
        });
        opts.registry.reserve(&name, &record)?;

        match record.parse_fields(obj, opts, namespace) {
            Ok(()) => {
                opts.registry.complete(&name, record.clone());
                Ok(record)
            }
            Err(e) => {
                opts.registry.abandon(&name);
                Err(e)
            }
        }
    }

    fn parse_fields(
        &self,
        obj: &Map<String, JsonValue>,
        opts: &mut ParseOptions,
        namespace: Option<&str>,
    ) -> Result<()> {
        let Some(JsonValue::Array(schemas)) = obj.get("fields") else {
            return Err(Error::schema(format!("non-array {} fields", self.name)));
        };
        let fields = schemas
            .iter()
            .map(|f| Field::from_schema(f, opts, namespace))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        if let Some(dup) = fields.iter().find(|f| !seen.insert(f.name())) {
            return Err(Error::conflict(format!(
                "duplicate {} field name: {}",
                self.name,
                dup.name()
            )));
        }

        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect();
        // Only ever sealed once, right after reservation.
        let _ = self.layout.set(Layout { fields, index });
        // A direct self-reference is still unsealed here and counts as 0.
        let width = self
            .fields()
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(f.ty().min_width()));
        let _ = self.min_width.set(width);

        let blobs = self
            .fields()
            .iter()
            .map(|field| self.encode_default(field))
            .collect::<Result<Vec<_>>>()?;
        let _ = self.default_blobs.set(blobs);
        Ok(())
    }

    fn encode_default(&self, field: &Field) -> Result<Option<Box<[u8]>>> {
        let Some(json) = field.default_json() else {
            return Ok(None);
        };
        let invalid = |reason: String| {
            Error::schema(format!(
                "invalid default for field {}.{}: {}",
                self.name,
                field.name(),
                reason
            ))
        };
        let value = field.ty().from_json(json).map_err(|e| invalid(e.to_string()))?;
        if !field.ty().check(&value, None) {
            return Err(invalid(value.to_string()));
        }
        let blob = Encoder::new()
            .encode(field.ty().as_ref(), &value)
            .map_err(|e| invalid(e.to_string()))?;
        Ok(Some(blob.into_boxed_slice()))
    }

    fn handle(&self) -> Arc<Self> {
        self.this
            .upgrade()
            .expect("record types are only reachable through an Arc")
    }

    /// Qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualified aliases.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Documentation string from the schema.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Fields in declaration order (empty while the record is being parsed).
    pub fn fields(&self) -> &[Field] {
        self.layout.get().map_or(&[], |l| &l.fields)
    }

    /// Field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.field_index(name).map(|i| &self.fields()[i])
    }

    /// Field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.layout.get()?.index.get(name).copied()
    }

    /// Construct a record from positional arguments.
    ///
    /// A missing (`None` or omitted) argument falls back to the field's
    /// default, generated afresh for this instance; a field without default
    /// stays empty.
    pub fn construct<I>(&self, args: I) -> Record
    where
        I: IntoIterator<Item = Option<Value>>,
    {
        let mut args = args.into_iter();
        let values = self
            .fields()
            .iter()
            .map(|field| args.next().flatten().or_else(|| field.default_value()))
            .collect();
        Record::from_parts(self.handle(), values)
    }

    /// Construct a record with every field at its default.
    pub fn new_record(&self) -> Record {
        self.construct(std::iter::empty())
    }

    fn check_source(&self, source: Source<'_>, mut ctx: Option<&mut CheckContext<'_>>) -> bool {
        let mut valid = true;
        for (index, field) in self.fields().iter().enumerate() {
            let candidate = source
                .get(index, field.name())
                .map(Cow::Borrowed)
                .or_else(|| field.default_value().map(Cow::Owned));
            let ok = match ctx.as_deref_mut() {
                None => candidate.is_some_and(|v| field.ty().check(&v, None)),
                Some(ctx) => ctx.nested(field.name(), |ctx| match &candidate {
                    Some(v) => field.ty().check(v, Some(ctx)),
                    None => {
                        ctx.report(&Value::Null, field.ty().as_ref());
                        false
                    }
                }),
            };
            if !ok {
                if ctx.is_none() {
                    return false;
                }
                valid = false;
            }
        }
        valid
    }

    pub(crate) fn check_fields(&self, record: &Record, ctx: Option<&mut CheckContext<'_>>) -> bool {
        self.check_source(Source::of_record(record, self), ctx)
    }

    fn write_source(&self, cursor: &mut WriteCursor<'_>, source: Source<'_>) -> Result<()> {
        let blobs = self.default_blobs.get();
        for (index, field) in self.fields().iter().enumerate() {
            if let Some(value) = source.get(index, field.name()) {
                field.ty().write(cursor, value)?;
            } else if let Some(blob) = blobs.and_then(|b| b[index].as_deref()) {
                cursor.write_fixed(blob);
            } else if let Some(value) = field.default_value() {
                field.ty().write(cursor, &value)?;
            } else {
                return Err(Error::invalid_value(
                    &self.name,
                    format!("missing required field {:?}", field.name()),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn write_fields(&self, cursor: &mut WriteCursor<'_>, record: &Record) -> Result<()> {
        self.write_source(cursor, Source::of_record(record, self))
    }
}

impl Type for RecordType {
    fn kind(&self) -> TypeKind {
        TypeKind::Record
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, value: &Value, ctx: Option<&mut CheckContext<'_>>) -> bool {
        match Source::of(value, self) {
            Some(source) => self.check_source(source, ctx),
            None => {
                if let Some(ctx) = ctx {
                    ctx.report(value, self);
                }
                false
            }
        }
    }

    fn read(&self, cursor: &mut ReadCursor<'_>) -> Option<Value> {
        let fields = self.fields();
        let mut values = Vec::with_capacity(fields.len());
        for field in fields {
            values.push(Some(field.ty().read(cursor)?));
        }
        Some(Value::Record(Record::from_parts(self.handle(), values)))
    }

    fn skip(&self, cursor: &mut ReadCursor<'_>) {
        for field in self.fields() {
            field.ty().skip(cursor);
        }
    }

    fn write(&self, cursor: &mut WriteCursor<'_>, value: &Value) -> Result<()> {
        let source =
            Source::of(value, self).ok_or_else(|| Error::invalid_value(&self.name, value))?;
        self.write_source(cursor, source)
    }

    fn from_json(&self, json: &JsonValue) -> Result<Value> {
        let JsonValue::Object(obj) = json else {
            return Err(Error::invalid_value(&self.name, json));
        };
        let args = self
            .fields()
            .iter()
            .map(|field| obj.get(field.name()).map(|v| field.ty().from_json(v)).transpose())
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Record(self.construct(args)))
    }

    fn to_json(&self, value: &Value) -> Result<JsonValue> {
        let source =
            Source::of(value, self).ok_or_else(|| Error::invalid_value(&self.name, value))?;
        let mut obj = Map::new();
        for (index, field) in self.fields().iter().enumerate() {
            if let Some(v) = source.get(index, field.name()) {
                obj.insert(field.name().to_string(), field.ty().to_json(v)?);
            }
        }
        Ok(JsonValue::Object(obj))
    }

    fn as_record(&self) -> Option<Arc<RecordType>> {
        self.this.upgrade()
    }
    fn min_width(&self) -> usize {
        self.min_width.get().copied().unwrap_or(0)
    }
}

/// Parse `schema` as a record type.
///
/// Shorthand used by tests and callers that know they hold a record schema.
pub fn parse_record(schema: &JsonValue, opts: &mut ParseOptions) -> Result<Arc<RecordType>> {
    schema::parse_with(schema, opts)?
        .as_record()
        .ok_or_else(|| Error::schema(format!("not a record schema: {}", schema)))
}
