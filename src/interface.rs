// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Synthesis of schema types from field name to definition mappings.

use crate::config::Config;
use crate::error::SchemaError;
use crate::resolve::{resolve_field, FieldDefinition, ResolveContext};
use crate::schema::registry::validate_name;
use crate::schema::{FieldValidator, SchemaDefinition, SchemaType};
use crate::*;

use std::collections::BTreeSet;

use data_encoding::HEXLOWER;
use indexmap::IndexMap;
use sha2::{Digest, Sha256};

/// What to do when a field name is declared more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Collision {
    /// Fail with [`SchemaError::DuplicateField`].
    #[default]
    Reject,
    /// Keep the last definition, at the position of the first.
    LastWins,
}

/// Name given to a schema synthesized without an explicit one.
///
/// The name depends only on the set of field names: `Interface_` followed by
/// the first 8 hex digits of the SHA-256 of the sorted names joined by `_`.
pub fn generated_name<'a>(field_names: impl IntoIterator<Item = &'a str>) -> Rc<str> {
    let mut names: Vec<&str> = field_names.into_iter().collect();
    names.sort_unstable();
    let digest = Sha256::digest(names.join("_").as_bytes());
    let hex = HEXLOWER.encode(&digest);
    format!("Interface_{}", &hex[..8]).into()
}

/// Builder for a schema type.
///
/// ```text
/// let user = Interface::new()
///     .field("id", integer().positive())
///     .field("name", string().min(1))
///     .config(Config::new().frozen(true))
///     .build()?;
/// ```
#[derive(Clone, Default)]
pub struct Interface {
    pub(crate) fields: Vec<(Rc<str>, FieldDefinition)>,
    pub(crate) name: Option<Rc<str>>,
    pub(crate) config: Config,
    pub(crate) validators: IndexMap<Rc<str>, Vec<FieldValidator>>,
    pub(crate) base: Option<SchemaType>,
    pub(crate) doc: Option<Rc<str>>,
    pub(crate) allow_empty: bool,
    pub(crate) collision: Collision,
}

impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface")
            .field("fields", &self.fields)
            .field("name", &self.name)
            .field("config", &self.config)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("base", &self.base)
            .field("doc", &self.doc)
            .field("allow_empty", &self.allow_empty)
            .field("collision", &self.collision)
            .finish()
    }
}

impl Interface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, definition: impl Into<FieldDefinition>) -> Self {
        self.fields.push((name.into(), definition.into()));
        self
    }

    pub fn fields<I, N, D>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: AsRef<str>,
        D: Into<FieldDefinition>,
    {
        self.fields.extend(
            fields
                .into_iter()
                .map(|(name, definition)| (Rc::from(name.as_ref()), definition.into())),
        );
        self
    }

    /// Explicit name. It must not be blank.
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Custom validator for `field`. It runs after the field validated and
    /// may replace the stored value.
    pub fn validator<F>(mut self, field: &str, validator: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, std::string::String> + Send + Sync + 'static,
    {
        self.validators
            .entry(field.into())
            .or_default()
            .push(Rc::new(validator));
        self
    }

    /// Validator that keeps the value when `predicate` holds and fails with
    /// `message`, or with a generic message naming the field, otherwise.
    pub fn check<F>(self, field: &str, predicate: F, message: Option<&str>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let name = field.to_string();
        let message = message.map(str::to_string);
        self.validator(field, move |v| {
            if predicate(v) {
                return Ok(v.clone());
            }
            Err(match &message {
                Some(m) => m.clone(),
                None => format!(
                    "Validation failed for field '{name}'. Received value: {}",
                    abbreviated(v)
                ),
            })
        })
    }

    /// Parent schema. Its fields come first and its config fills in the
    /// options this schema leaves unset.
    pub fn base(mut self, base: &SchemaType) -> Self {
        self.base = Some(base.clone());
        self
    }

    pub fn doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Accept a schema without fields.
    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    pub fn on_collision(mut self, collision: Collision) -> Self {
        self.collision = collision;
        self
    }

    /// Resolves every field and synthesizes the schema type.
    pub fn build(self) -> Result<SchemaType, SchemaError> {
        let name = match &self.name {
            Some(name) => {
                validate_name(name)?;
                name.clone()
            }
            None => generated_name(self.fields.iter().map(|(n, _)| n.as_ref())),
        };

        let base_fields = self.base.as_ref().map_or(0, |b| b.fields().len());
        if self.fields.is_empty() && base_fields == 0 && !self.allow_empty {
            return Err(SchemaError::EmptyDefinition(name));
        }

        let mut fields = IndexMap::new();
        let mut validators: IndexMap<Rc<str>, Vec<FieldValidator>> = IndexMap::new();
        let mut config = self.config.clone();
        if let Some(base) = &self.base {
            fields.extend(base.fields().iter().map(|(k, f)| (k.clone(), f.clone())));
            validators.extend(base.validators().iter().map(|(k, v)| (k.clone(), v.clone())));
            config = config.merged_over(base.config());
        }

        let mut declared = BTreeSet::new();
        for (field_name, definition) in &self.fields {
            if !declared.insert(field_name.clone()) && self.collision == Collision::Reject {
                return Err(SchemaError::DuplicateField(field_name.clone()));
            }
            let ctx = ResolveContext {
                schema: &name,
                field: field_name,
            };
            let field = resolve_field(definition, &ctx)?;
            // A redeclared base field drops the base's validators for it.
            if fields.insert(field_name.clone(), field).is_some() {
                validators.shift_remove(field_name);
            }
        }

        for (field_name, own) in self.validators {
            validators.entry(field_name).or_default().extend(own);
        }

        SchemaType::synthesize(SchemaDefinition {
            name,
            fields,
            config,
            parent: self.base,
            doc: self.doc,
            validators,
        })
    }
}

/// Synthesizes a schema type from `(name, definition)` pairs with default
/// options.
pub fn interface<I, N, D>(fields: I) -> Result<SchemaType, SchemaError>
where
    I: IntoIterator<Item = (N, D)>,
    N: AsRef<str>,
    D: Into<FieldDefinition>,
{
    Interface::new().fields(fields).build()
}

/// Builds a `Vec` of `(name, FieldDefinition)` pairs from differently typed
/// definitions.
///
/// ```text
/// let user = interface(fields! {
///     "id" => integer().positive(),
///     "name" => string().min(1),
/// })?;
/// ```
#[macro_export]
macro_rules! fields {
    ($($name:expr => $definition:expr),* $(,)?) => {
        vec![$(($name, $crate::FieldDefinition::from($definition))),*]
    };
}

fn abbreviated(value: &Value) -> std::string::String {
    let text = value.to_string();
    if text.chars().count() > 50 {
        let head: std::string::String = text.chars().take(47).collect();
        format!("{head}...")
    } else {
        text
    }
}
