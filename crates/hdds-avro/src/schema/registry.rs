// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapping from qualified type names to compiled types.

use crate::error::{Error, Result};
use crate::types::{RecordType, RecursiveType, TypeRef};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};

#[derive(Debug)]
enum Entry {
    Ready(TypeRef),
    /// Record whose fields are still being parsed.
    Pending(Weak<RecordType>),
}

/// Named-type registry shared across one parse session (or several, when
/// the caller keeps it in [`ParseOptions`](super::ParseOptions)).
///
/// Grows monotonically while parsing: a name is never registered twice.
#[derive(Debug, Default)]
pub struct Registry {
    types: HashMap<String, Entry>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a type by qualified name.
    ///
    /// A record that is still being parsed resolves to a [`RecursiveType`]
    /// pointing back at it.
    pub fn get(&self, name: &str) -> Option<TypeRef> {
        match self.types.get(name)? {
            Entry::Ready(ty) => Some(ty.clone()),
            Entry::Pending(record) => {
                Some(Arc::new(RecursiveType::new(name, record.clone())) as TypeRef)
            }
        }
    }

    /// `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Register a compiled type under `name`.
    pub fn register(&mut self, name: &str, ty: TypeRef) -> Result<()> {
        self.check_free(name)?;
        log::debug!("[registry] registered {}", name);
        self.types.insert(name.to_string(), Entry::Ready(ty));
        Ok(())
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered names, sorted for determinism.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().cloned().collect();
        names.sort();
        names
    }

    fn check_free(&self, name: &str) -> Result<()> {
        if self.types.contains_key(name) {
            return Err(Error::conflict(format!("duplicate type name: {}", name)));
        }
        Ok(())
    }

    pub(crate) fn reserve(&mut self, name: &str, record: &Arc<RecordType>) -> Result<()> {
        self.check_free(name)?;
        log::trace!("[registry] reserved {}", name);
        self.types
            .insert(name.to_string(), Entry::Pending(Arc::downgrade(record)));
        Ok(())
    }

    pub(crate) fn complete(&mut self, name: &str, record: Arc<RecordType>) {
        log::debug!("[registry] registered {}", name);
        self.types.insert(name.to_string(), Entry::Ready(record));
    }

    pub(crate) fn abandon(&mut self, name: &str) {
        if let Some(Entry::Pending(_)) = self.types.get(name) {
            log::debug!("[registry] dropped reservation for {}", name);
            self.types.remove(name);
        }
    }

    /// Names registered right now, for a later [`rollback`](Self::rollback).
    pub(crate) fn snapshot(&self) -> HashSet<String> {
        self.types.keys().cloned().collect()
    }

    /// Drop every name registered since `before` was taken.
    pub(crate) fn rollback(&mut self, before: &HashSet<String>) {
        self.types.retain(|name, _| {
            let keep = before.contains(name);
            if !keep {
                log::debug!("[registry] rolled back {}", name);
            }
            keep
        });
    }
}
