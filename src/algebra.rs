// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Derivation of new schema types from existing ones.
//!
//! Every operator reads the resolved fields of its sources and synthesizes a
//! fresh type; sources are never modified. Derived types keep the config of
//! their source and the custom validators of the fields that survive.

use crate::config::Config;
use crate::constraints::{ConstraintSet, Metadata};
use crate::error::SchemaError;
use crate::hooks::Hooks;
use crate::interface::{Collision, Interface};
use crate::resolve::FieldDefinition;
use crate::schema::{Field, FieldValidator, SchemaType, Type};
use crate::*;

use indexmap::IndexMap;

/// Name and config of a derived schema type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeriveOptions {
    /// Replaces the operator's default name.
    pub name: Option<Rc<str>>,
    /// Options set here win over the source's config.
    pub config: Option<Config>,
}

impl DeriveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }
}

struct Derivation {
    name: Rc<str>,
    fields: IndexMap<Rc<str>, Field>,
    config: Config,
    validators: IndexMap<Rc<str>, Vec<FieldValidator>>,
    parent: Option<SchemaType>,
}

impl Derivation {
    fn new(default_name: String, config: &Config, options: DeriveOptions) -> Self {
        Self {
            name: options.name.unwrap_or_else(|| default_name.into()),
            fields: IndexMap::new(),
            config: match options.config {
                Some(own) => own.merged_over(config),
                None => config.clone(),
            },
            validators: IndexMap::new(),
            parent: None,
        }
    }

    /// Takes `field` for `name`, along with the validators `source` has for it.
    fn take(&mut self, source: &SchemaType, name: &Rc<str>, field: Field) {
        self.fields.insert(name.clone(), field);
        match source.validators().get(name) {
            Some(validators) => {
                self.validators.insert(name.clone(), validators.clone());
            }
            None => {
                self.validators.shift_remove(name);
            }
        }
    }

    fn synthesize(self, extra: Vec<(Rc<str>, FieldDefinition)>) -> Result<SchemaType, SchemaError> {
        let mut fields: Vec<(Rc<str>, FieldDefinition)> = self
            .fields
            .into_iter()
            .map(|(name, field)| (name, FieldDefinition::Field(field)))
            .collect();
        fields.extend(extra);

        let derived = Interface {
            fields,
            name: Some(self.name),
            config: self.config,
            validators: self.validators,
            base: self.parent,
            doc: None,
            allow_empty: true,
            collision: Collision::LastWins,
        }
        .build()?;
        log::debug!("derived schema {derived}");
        Ok(derived)
    }
}

/// Named subset of `schema`'s fields, in the requested order.
pub fn pick<I, N>(schema: &SchemaType, names: I) -> Result<SchemaType, SchemaError>
where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    pick_with(schema, names, DeriveOptions::default())
}

pub fn pick_with<I, N>(
    schema: &SchemaType,
    names: I,
    options: DeriveOptions,
) -> Result<SchemaType, SchemaError>
where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    let mut derived = Derivation::new(format!("Pick_{schema}"), schema.config(), options);
    for name in names {
        let name = name.as_ref();
        let Some((key, field)) = schema.fields().get_key_value(name) else {
            return Err(SchemaError::UnknownField {
                field: name.into(),
                schema: schema.name().clone(),
            });
        };
        derived.take(schema, key, field.clone());
    }
    derived.synthesize(vec![])
}

/// All of `schema`'s fields except the named ones. Names `schema` does not
/// have are ignored.
pub fn omit<I, N>(schema: &SchemaType, names: I) -> Result<SchemaType, SchemaError>
where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    omit_with(schema, names, DeriveOptions::default())
}

pub fn omit_with<I, N>(
    schema: &SchemaType,
    names: I,
    options: DeriveOptions,
) -> Result<SchemaType, SchemaError>
where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
{
    let omitted: Vec<N> = names.into_iter().collect();
    let is_omitted = |name: &str| omitted.iter().any(|n| n.as_ref() == name);

    let mut derived = Derivation::new(format!("Omit_{schema}"), schema.config(), options);
    for (name, field) in schema.fields() {
        if !is_omitted(name.as_ref()) {
            derived.take(schema, name, field.clone());
        }
    }
    derived.synthesize(vec![])
}

/// Optional version of `field`, defaulting to `null`.
///
/// The content constraints and hooks move to the wrapped field so that they
/// apply whenever a value is present. A field that is optional already only
/// gets the `null` default.
fn optional_field(field: &Field) -> Field {
    let meta = Metadata {
        default: Some(Value::Null),
        ..field.meta.clone()
    };
    if field.ty.is_optional() {
        return Field {
            meta,
            ..field.clone()
        };
    }

    let inner = Field {
        ty: field.ty.clone(),
        constraints: field.constraints.clone(),
        meta: Metadata::default(),
        hooks: field.hooks.clone(),
    };
    Field {
        ty: Type::Optional(Rc::new(inner)),
        constraints: ConstraintSet::default(),
        meta,
        hooks: Hooks::default(),
    }
}

/// Every field made optional with a `null` default.
pub fn partial(schema: &SchemaType) -> Result<SchemaType, SchemaError> {
    partial_with(schema, DeriveOptions::default())
}

pub fn partial_with(schema: &SchemaType, options: DeriveOptions) -> Result<SchemaType, SchemaError> {
    let mut derived = Derivation::new(format!("Partial_{schema}"), schema.config(), options);
    for (name, field) in schema.fields() {
        derived.take(schema, name, optional_field(field));
    }
    derived.synthesize(vec![])
}

/// Same as [`partial`].
pub fn make_optional(schema: &SchemaType) -> Result<SchemaType, SchemaError> {
    partial(schema)
}

pub fn make_optional_with(
    schema: &SchemaType,
    options: DeriveOptions,
) -> Result<SchemaType, SchemaError> {
    partial_with(schema, options)
}

/// Every field made required by dropping its default. Types are unchanged, so
/// an optional field still accepts `null` but must be given.
pub fn required(schema: &SchemaType) -> Result<SchemaType, SchemaError> {
    required_with(schema, DeriveOptions::default())
}

pub fn required_with(schema: &SchemaType, options: DeriveOptions) -> Result<SchemaType, SchemaError> {
    let mut derived = Derivation::new(format!("Required_{schema}"), schema.config(), options);
    for (name, field) in schema.fields() {
        let field = Field {
            meta: field.meta.without_default(),
            ..field.clone()
        };
        derived.take(schema, name, field);
    }
    derived.synthesize(vec![])
}

/// `base`'s fields followed by `fields`; a new field replaces a base field of
/// the same name. The result is derived from `base`.
pub fn extend<I, N, D>(base: &SchemaType, fields: I) -> Result<SchemaType, SchemaError>
where
    I: IntoIterator<Item = (N, D)>,
    N: AsRef<str>,
    D: Into<FieldDefinition>,
{
    extend_with(base, fields, DeriveOptions::default())
}

pub fn extend_with<I, N, D>(
    base: &SchemaType,
    fields: I,
    options: DeriveOptions,
) -> Result<SchemaType, SchemaError>
where
    I: IntoIterator<Item = (N, D)>,
    N: AsRef<str>,
    D: Into<FieldDefinition>,
{
    let mut derived = Derivation::new(format!("Extended_{base}"), base.config(), options);
    derived.parent = Some(base.clone());
    let fields = fields
        .into_iter()
        .map(|(name, definition)| (Rc::from(name.as_ref()), definition.into()))
        .collect();
    derived.synthesize(fields)
}

/// Fields of every schema, in call order. When several schemas have a field of
/// the same name the last one wins.
pub fn merge<'a, I>(schemas: I) -> Result<SchemaType, SchemaError>
where
    I: IntoIterator<Item = &'a SchemaType>,
{
    merge_with(schemas, DeriveOptions::default())
}

pub fn merge_with<'a, I>(schemas: I, options: DeriveOptions) -> Result<SchemaType, SchemaError>
where
    I: IntoIterator<Item = &'a SchemaType>,
{
    let schemas: Vec<&SchemaType> = schemas.into_iter().collect();
    let names: Vec<&str> = schemas.iter().map(|s| s.name().as_ref()).collect();
    let config = schemas
        .iter()
        .fold(Config::default(), |acc, s| s.config().merged_over(&acc));

    let mut derived = Derivation::new(format!("Merge_{}", names.join("_")), &config, options);
    for schema in schemas {
        for (name, field) in schema.fields() {
            derived.take(schema, name, field.clone());
        }
    }
    derived.synthesize(vec![])
}
