// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::schema::error::ValidationErrors;
use crate::schema::validate::SchemaValidator;
use crate::schema::SchemaType;
use crate::*;

use anyhow::Result;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

type String = Rc<str>;

/// Errors raised when assigning to a field of an [`Instance`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    #[error("Instance of '{schema}' is frozen; cannot assign field '{field}'")]
    Frozen { schema: String, field: String },
    #[error("Field '{field}' not found in model '{schema}'")]
    UnknownField { schema: String, field: String },
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

/// A validated record of a [`SchemaType`].
///
/// Field values are kept in declaration order followed by any extra keys the
/// schema allowed. Nested records are stored as plain objects.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    schema: SchemaType,
    values: IndexMap<String, Value>,
    extra: IndexMap<String, Value>,
}

impl Instance {
    pub(crate) fn new(
        schema: SchemaType,
        values: IndexMap<String, Value>,
        extra: IndexMap<String, Value>,
    ) -> Self {
        Self {
            schema,
            values,
            extra,
        }
    }

    pub fn schema(&self) -> &SchemaType {
        &self.schema
    }

    /// Value of a declared field or of an allowed extra key.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).or_else(|| self.extra.get(name))
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn extra(&self) -> &IndexMap<String, Value> {
        &self.extra
    }

    /// Assigns a declared field.
    ///
    /// Frozen schemas reject every assignment. When the schema validates
    /// assignments the value goes through the field's full validation first.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), AssignmentError> {
        let config = self.schema.config();
        if config.is_frozen() {
            return Err(AssignmentError::Frozen {
                schema: self.schema.name().clone(),
                field: name.into(),
            });
        }

        let Some((key, field)) = self.schema.fields().get_key_value(name) else {
            return Err(AssignmentError::UnknownField {
                schema: self.schema.name().clone(),
                field: name.into(),
            });
        };

        let value = value.into();
        let value = if config.validates_assignment() {
            SchemaValidator::validate_assignment(&self.schema, name, field, &value)?
        } else {
            value
        };
        self.values.insert(key.clone(), value);
        Ok(())
    }

    /// Plain keyed structure using field names.
    pub fn to_value(&self) -> Value {
        Value::object(
            self.values
                .iter()
                .chain(self.extra.iter())
                .map(|(k, v)| (k.clone(), v.clone())),
        )
    }

    /// Plain keyed structure using field aliases where declared.
    pub fn to_value_by_alias(&self) -> Value {
        Value::object(
            self.entries(true)
                .map(|(k, v)| (String::from(k), v.clone())),
        )
    }

    pub fn to_json_str(&self) -> Result<std::string::String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_str_pretty(&self) -> Result<std::string::String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_str_by_alias(&self) -> Result<std::string::String> {
        Ok(serde_json::to_string(&ByAlias(self))?)
    }

    #[cfg(feature = "yaml")]
    pub fn to_yaml_str(&self) -> Result<std::string::String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Maps the instance onto a caller defined serde type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let json = serde_json::to_value(self)?;
        Ok(serde_json::from_value(json)?)
    }

    fn entries(&self, by_alias: bool) -> impl Iterator<Item = (&str, &Value)> {
        let fields = self.values.iter().map(move |(name, v)| {
            let key = match self.schema.field(name).and_then(|f| f.alias()) {
                Some(alias) if by_alias => alias,
                _ => name.as_ref(),
            };
            (key, v)
        });
        fields.chain(self.extra.iter().map(|(k, v)| (k.as_ref(), v)))
    }

    fn serialize_entries<S>(&self, serializer: S, by_alias: bool) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len() + self.extra.len()))?;
        for (k, v) in self.entries(by_alias) {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl Serialize for Instance {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.serialize_entries(serializer, false)
    }
}

struct ByAlias<'a>(&'a Instance);

impl Serialize for ByAlias<'_> {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize_entries(serializer, true)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name())?;
        for (i, (k, v)) in self.entries(false).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str(")")
    }
}
