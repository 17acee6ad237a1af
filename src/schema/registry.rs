// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::SchemaError;
use crate::schema::SchemaType;
use crate::*;

use dashmap::DashMap;

type String = Rc<str>;

/// Validates that a schema name is not empty or whitespace-only.
pub(crate) fn validate_name(name: &str) -> Result<(), SchemaError> {
    if name.trim().is_empty() {
        Err(SchemaError::InvalidName(String::from(name)))
    } else {
        Ok(())
    }
}

/// Thread-safe registry of synthesized schema types keyed by name.
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    inner: DashMap<String, SchemaType>,
}

lazy_static::lazy_static! {
    /// Global registry that every synthesized schema type is interned in.
    pub static ref SCHEMA_REGISTRY: SchemaRegistry = SchemaRegistry::new();
}

impl SchemaRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Register a schema under its own name. Fails if the name is taken.
    pub fn register(&self, schema: SchemaType) -> Result<(), SchemaError> {
        let name = schema.name().clone();
        validate_name(&name)?;

        use dashmap::mapref::entry::Entry;
        match self.inner.entry(name) {
            Entry::Occupied(e) => Err(SchemaError::AlreadyRegistered(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(schema);
                Ok(())
            }
        }
    }

    /// Store a schema under its own name, replacing any earlier one.
    pub fn intern(&self, schema: SchemaType) -> Option<SchemaType> {
        self.inner.insert(schema.name().clone(), schema)
    }

    /// Retrieve a schema by name, if it exists.
    pub fn get(&self, name: &str) -> Option<SchemaType> {
        self.inner.get(name).map(|entry| entry.value().clone())
    }

    /// Remove a schema by name. Returns the removed schema if it existed.
    pub fn remove(&self, name: &str) -> Option<SchemaType> {
        self.inner.remove(name).map(|(_, v)| v)
    }

    /// List all registered schema names.
    pub fn list_names(&self) -> Vec<String> {
        self.inner.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Check if a schema with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Get the number of registered schemas.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Clear all schemas from the registry.
    pub fn clear(&self) {
        self.inner.clear();
    }
}

/// Helper functions for the global schema registry.
pub mod schemas {
    use super::*;

    /// Interns a schema type by name, replacing an earlier one of the same name.
    pub fn intern(schema: SchemaType) -> Option<SchemaType> {
        log::trace!("interning schema {}", schema.name());
        SCHEMA_REGISTRY.intern(schema)
    }

    /// Registers a schema type, failing if its name is already taken.
    pub fn register(schema: SchemaType) -> Result<(), SchemaError> {
        SCHEMA_REGISTRY.register(schema)
    }

    /// Retrieve a schema by name.
    pub fn get(name: &str) -> Option<SchemaType> {
        SCHEMA_REGISTRY.get(name)
    }

    /// Remove a schema by name.
    pub fn remove(name: &str) -> Option<SchemaType> {
        SCHEMA_REGISTRY.remove(name)
    }

    /// List all registered schema names.
    pub fn list_names() -> Vec<String> {
        SCHEMA_REGISTRY.list_names()
    }

    /// Check if a schema with the given name exists.
    pub fn contains(name: &str) -> bool {
        SCHEMA_REGISTRY.contains(name)
    }

    /// Get the number of registered schemas.
    pub fn len() -> usize {
        SCHEMA_REGISTRY.len()
    }
}
