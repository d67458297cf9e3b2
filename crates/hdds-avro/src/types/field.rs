// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record fields.

use super::TypeRef;
use crate::error::{Error, Result};
use crate::schema::{self, names, ParseOptions, Schema};
use crate::value::Value;
use serde_json::Value as JsonValue;

/// Sort order of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
    Ignore,
}

impl Order {
    /// Parse the schema `order` attribute.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "ascending" => Ok(Self::Ascending),
            "descending" => Ok(Self::Descending),
            "ignore" => Ok(Self::Ignore),
            other => Err(Error::schema(format!("invalid order: {:?}", other))),
        }
    }

    /// Ordering weight: +1 ascending, -1 descending, 0 ignore.
    pub fn weight(self) -> i8 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
            Self::Ignore => 0,
        }
    }
}

/// One record member.
#[derive(Debug)]
pub struct Field {
    name: String,
    ty: TypeRef,
    default: Option<JsonValue>,
    aliases: Vec<String>,
    order: Order,
}

impl Field {
    /// Parse a field definition `{name, type, default?, order?, aliases?}`.
    pub(crate) fn from_schema(
        schema: &JsonValue,
        opts: &mut ParseOptions,
        namespace: Option<&str>,
    ) -> Result<Self> {
        let JsonValue::Object(obj) = schema else {
            return Err(Error::schema(format!("invalid field: {}", schema)));
        };
        let name = match obj.get("name") {
            Some(JsonValue::String(name)) if names::is_valid_name(name) => name.clone(),
            Some(other) => return Err(Error::schema(format!("invalid field name: {}", other))),
            None => return Err(Error::schema("missing field name")),
        };
        log::trace!("[schema] parsing field {}", name);

        let type_schema = obj
            .get("type")
            .ok_or_else(|| Error::schema(format!("missing type for field {}", name)))?;
        let ty = schema::create_type(Schema::Json(type_schema), opts, namespace)?;

        let order = match obj.get("order") {
            None => Order::default(),
            Some(JsonValue::String(s)) => Order::parse(s)?,
            Some(other) => return Err(Error::schema(format!("invalid order: {}", other))),
        };

        let aliases = match obj.get("aliases") {
            None => Vec::new(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|alias| match alias {
                    JsonValue::String(a) if names::is_valid_name(a) => Ok(a.clone()),
                    other => Err(Error::schema(format!(
                        "invalid alias for field {}: {}",
                        name, other
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::schema(format!(
                    "invalid aliases for field {}: {}",
                    name, other
                )))
            }
        };

        Ok(Self {
            name,
            ty,
            default: obj.get("default").cloned(),
            aliases,
            order,
        })
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field type.
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Alternate names accepted by schema resolution.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Sort order.
    pub fn order(&self) -> Order {
        self.order
    }

    /// `true` if the field declares a default.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Default as declared in the schema.
    pub fn default_json(&self) -> Option<&JsonValue> {
        self.default.as_ref()
    }

    /// Generate a fresh default value.
    ///
    /// Each call builds a new value, so mutable defaults (empty arrays, ...)
    /// are never shared between records.
    pub fn default_value(&self) -> Option<Value> {
        let json = self.default.as_ref()?;
        self.ty.from_json(json).ok()
    }
}
