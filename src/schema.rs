// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

//! Resolved schema descriptions and the engine that validates data against them.
//!
//! Builders describe a field; resolution turns each description into a [`Field`]:
//! a [`Type`] plus the constraints, metadata and hooks that apply to it. A
//! [`SchemaType`] is an ordered set of named fields together with its
//! [`Config`](crate::Config), optional parent and custom validators.
//!
//! Container types hold resolved child fields rather than bare types so that
//! constraints on items (`array(string().min(2))`) survive resolution:
//!
//! ```text
//! Array(Field { ty: String, constraints: { min_length: 2 } })
//! ```
//!
//! Nested records are held by handle (`Type::Model`). A record that refers to
//! itself does so by name (`Type::Ref`), which the validator resolves against the
//! enclosing records first and the schema registry second.

use crate::config::Config;
use crate::constraints::{ConstraintSet, Metadata};
use crate::error::SchemaError;
use crate::hooks::Hooks;
use crate::schema::error::ValidationErrors;
use crate::schema::instance::Instance;
use crate::*;

use indexmap::IndexMap;

pub mod error;
pub mod instance;
mod json_schema;
pub mod registry;
pub(crate) mod validate;

/// Custom per field validator. It receives the validated value and returns the
/// value to store, or a message describing the failure.
pub type FieldValidator =
    Rc<dyn Fn(&Value) -> Result<Value, std::string::String> + Send + Sync + 'static>;

/// A named, closed set of members, each mapped to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    name: Rc<str>,
    members: Rc<IndexMap<Rc<str>, Value>>,
}

impl EnumType {
    pub fn new<N, I, K, V>(name: N, members: I) -> Self
    where
        N: Into<Rc<str>>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<Rc<str>>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            members: Rc::new(
                members
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &IndexMap<Rc<str>, Value> {
        &self.members
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.members.values()
    }

    /// Member matching `value`, by member value first and then by member name.
    pub fn lookup(&self, value: &Value, by_name: bool) -> Option<(&Rc<str>, &Value)> {
        if let Some(found) = self.members.iter().find(|(_, v)| *v == value) {
            return Some(found);
        }
        match value {
            Value::String(s) if by_name => self.members.get_key_value(s.as_ref()),
            _ => None,
        }
    }
}

/// Type descriptor of a resolved field.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Any,
    Null,
    Boolean,
    Integer,
    Number,
    Decimal,
    String,
    Bytes,
    Uuid,
    DateTime,
    Date,
    Time,
    Array(Rc<Field>),
    Set(Rc<Field>),
    Tuple(Rc<Vec<Field>>),
    Record { key: Rc<Field>, value: Rc<Field> },
    Union(Rc<Vec<Field>>),
    Literal(Rc<Vec<Value>>),
    Enum(EnumType),
    Optional(Rc<Field>),
    Model(SchemaType),
    Ref(Rc<str>),
}

impl Type {
    /// Short human readable name used in error reports.
    pub fn describe(&self) -> std::string::String {
        match self {
            Type::Any => "any".to_string(),
            Type::Null => "null".to_string(),
            Type::Boolean => "boolean".to_string(),
            Type::Integer => "integer".to_string(),
            Type::Number => "number".to_string(),
            Type::Decimal => "decimal".to_string(),
            Type::String => "string".to_string(),
            Type::Bytes => "bytes".to_string(),
            Type::Uuid => "uuid".to_string(),
            Type::DateTime => "datetime".to_string(),
            Type::Date => "date".to_string(),
            Type::Time => "time".to_string(),
            Type::Array(item) => format!("array[{}]", item.ty.describe()),
            Type::Set(item) => format!("set[{}]", item.ty.describe()),
            Type::Tuple(items) => format!(
                "tuple[{}]",
                items
                    .iter()
                    .map(|f| f.ty.describe())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Type::Record { key, value } => {
                format!("record[{}, {}]", key.ty.describe(), value.ty.describe())
            }
            Type::Union(members) => members
                .iter()
                .map(|f| f.ty.describe())
                .collect::<Vec<_>>()
                .join(" | "),
            Type::Literal(_) => "literal".to_string(),
            Type::Enum(e) => e.name().to_string(),
            Type::Optional(inner) => format!("optional[{}]", inner.ty.describe()),
            Type::Model(schema) => schema.name().to_string(),
            Type::Ref(name) => name.to_string(),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Type::Optional(_))
    }
}

/// A resolved field: its type, content constraints, metadata and hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub ty: Type,
    pub constraints: ConstraintSet,
    pub meta: Metadata,
    pub hooks: Hooks,
}

impl Field {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            constraints: ConstraintSet::default(),
            meta: Metadata::default(),
            hooks: Hooks::default(),
        }
    }

    pub fn with_meta(mut self, meta: Metadata) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.meta.default = Some(default.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.meta.is_required()
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.meta.default.as_ref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.meta.alias.as_deref()
    }
}

/// Everything the engine needs to produce a [`SchemaType`].
#[derive(Clone)]
pub struct SchemaDefinition {
    pub name: Rc<str>,
    pub fields: IndexMap<Rc<str>, Field>,
    pub config: Config,
    pub parent: Option<SchemaType>,
    pub doc: Option<Rc<str>>,
    pub validators: IndexMap<Rc<str>, Vec<FieldValidator>>,
}

impl fmt::Debug for SchemaDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDefinition")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("config", &self.config)
            .field("parent", &self.parent.as_ref().map(|p| p.name().clone()))
            .field("doc", &self.doc)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A synthesized, immutable schema type.
///
/// Cloning is cheap and shares the definition. Two handles are equal only if they
/// come from the same synthesis; the name is a readable hint, not an identity.
#[derive(Clone)]
pub struct SchemaType(Rc<SchemaDefinition>);

impl SchemaType {
    /// Checks the definition and produces a schema type, interning it by name.
    pub fn synthesize(definition: SchemaDefinition) -> Result<SchemaType, SchemaError> {
        for (name, field) in &definition.fields {
            check_patterns(name, field)?;
        }
        for field in definition.validators.keys() {
            if !definition.fields.contains_key(field) {
                return Err(SchemaError::UnknownValidator {
                    field: field.clone(),
                    schema: definition.name.clone(),
                });
            }
        }

        let schema = SchemaType(Rc::new(definition));
        registry::schemas::intern(schema.clone());
        log::debug!(
            "synthesized schema {} with fields [{}]",
            schema.name(),
            schema.field_names().join(", ")
        );
        Ok(schema)
    }

    pub fn name(&self) -> &Rc<str> {
        &self.0.name
    }

    pub fn fields(&self) -> &IndexMap<Rc<str>, Field> {
        &self.0.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.0.fields.get(name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.0.fields.keys().map(|k| k.as_ref()).collect()
    }

    pub fn config(&self) -> &Config {
        &self.0.config
    }

    pub fn parent(&self) -> Option<&SchemaType> {
        self.0.parent.as_ref()
    }

    pub fn doc(&self) -> Option<&str> {
        self.0.doc.as_deref()
    }

    pub fn validators(&self) -> &IndexMap<Rc<str>, Vec<FieldValidator>> {
        &self.0.validators
    }

    pub fn definition(&self) -> &SchemaDefinition {
        &self.0
    }

    /// Whether `ancestor` is this schema or appears in its parent chain.
    pub fn is_derived_from(&self, ancestor: &SchemaType) -> bool {
        let mut current = Some(self);
        while let Some(schema) = current {
            if schema == ancestor {
                return true;
            }
            current = schema.parent();
        }
        false
    }

    /// Validates and coerces `data`, reporting every violation on failure.
    pub fn validate(&self, data: &Value) -> Result<Instance, ValidationErrors> {
        validate::SchemaValidator::validate_instance(self, data)
    }

    pub fn validate_json_str(&self, json: &str) -> anyhow::Result<Instance> {
        let data = Value::from_json_str(json)?;
        Ok(self.validate(&data)?)
    }

    #[cfg(feature = "yaml")]
    pub fn validate_yaml_str(&self, yaml: &str) -> anyhow::Result<Instance> {
        let data = Value::from_yaml_str(yaml)?;
        Ok(self.validate(&data)?)
    }

    /// Machine readable JSON Schema description of the type graph.
    pub fn json_schema(&self) -> serde_json::Value {
        json_schema::generate(self)
    }
}

impl PartialEq for SchemaType {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaType({})", self.name())
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn check_patterns(field_name: &Rc<str>, field: &Field) -> Result<(), SchemaError> {
    if let Some(pattern) = field.constraints.pattern() {
        validate::compiled_pattern(pattern).map_err(|e| SchemaError::InvalidPattern {
            field: field_name.clone(),
            pattern: pattern.clone(),
            error: e.to_string().into(),
        })?;
    }

    match &field.ty {
        Type::Array(item) | Type::Set(item) | Type::Optional(item) => {
            check_patterns(field_name, item)
        }
        Type::Tuple(items) | Type::Union(items) => items
            .iter()
            .try_for_each(|item| check_patterns(field_name, item)),
        Type::Record { key, value } => {
            check_patterns(field_name, key)?;
            check_patterns(field_name, value)
        }
        _ => Ok(()),
    }
}
