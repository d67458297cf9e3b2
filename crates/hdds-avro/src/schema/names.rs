// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Name grammar and qualification.

use crate::error::{Error, Result};

/// Reserved primitive type names.
pub const PRIMITIVES: [&str; 8] = [
    "null", "boolean", "int", "long", "float", "double", "bytes", "string",
];

/// `true` if `name` is a primitive type name.
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

/// `true` if `name` matches `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// `true` if every dot-separated segment of `namespace` is a valid name.
pub fn is_valid_namespace(namespace: &str) -> bool {
    namespace.split('.').all(is_valid_name)
}

/// Qualify `name` with `namespace` and validate the result.
///
/// Dotless names are prefixed with the namespace (if any). Every segment
/// must match the name grammar and the last one may not be a primitive name.
pub fn qualify(name: &str, namespace: Option<&str>) -> Result<String> {
    let qualified = match namespace {
        Some(ns) if !ns.is_empty() && !name.contains('.') => format!("{}.{}", ns, name),
        _ => name.to_string(),
    };
    if !is_valid_namespace(&qualified) {
        return Err(Error::schema(format!("invalid name: {:?}", qualified)));
    }
    let short = qualified.rsplit('.').next().unwrap_or(&qualified);
    if is_primitive(short) {
        return Err(Error::conflict(format!(
            "cannot rename primitive type: {}",
            qualified
        )));
    }
    Ok(qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_grammar() {
        assert!(is_valid_name("Foo"));
        assert!(is_valid_name("_foo9"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("9foo"));
        assert!(!is_valid_name("foo-bar"));
        assert!(!is_valid_name("héllo"));
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("Foo", Some("ns")).unwrap(), "ns.Foo");
        assert_eq!(qualify("Foo", None).unwrap(), "Foo");
        assert_eq!(qualify("Foo", Some("")).unwrap(), "Foo");
        assert_eq!(qualify("a.b.Foo", Some("ns")).unwrap(), "a.b.Foo");
    }

    #[test]
    fn test_invalid_segments() {
        assert!(matches!(qualify("Foo", Some("ns.1x")), Err(Error::InvalidSchema(_))));
        assert!(matches!(qualify(".Foo", None), Err(Error::InvalidSchema(_))));
        assert!(matches!(qualify("a..Foo", None), Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_primitive_names_reserved() {
        assert!(matches!(qualify("string", None), Err(Error::NameConflict(_))));
        assert!(matches!(qualify("int", Some("ns")), Err(Error::NameConflict(_))));
        assert!(matches!(qualify("org.long", None), Err(Error::NameConflict(_))));
        // Primitive names are fine as namespace segments.
        assert_eq!(qualify("string.Foo", None).unwrap(), "string.Foo");
    }
}
