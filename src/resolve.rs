// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

//! Turning field definitions into resolved fields.

use crate::builders::Resolve;
use crate::error::SchemaError;
use crate::model::FieldInfo;
use crate::schema::{registry, Field, SchemaType, Type};
use crate::*;

/// Raw primitive types usable directly as a field definition. The field is
/// required and carries no constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Str,
    Int,
    Float,
    Bool,
    Bytes,
    Decimal,
    DateTime,
    Date,
    Time,
    Uuid,
    Any,
    None,
}

impl Primitive {
    /// Primitive spelled `name`, accepting the common aliases (`str`/`string`,
    /// `int`/`integer`, `float`/`number`, `bool`/`boolean`).
    pub fn from_name(name: &str) -> Option<Primitive> {
        Some(match name {
            "str" | "string" => Primitive::Str,
            "int" | "integer" => Primitive::Int,
            "float" | "number" => Primitive::Float,
            "bool" | "boolean" => Primitive::Bool,
            "bytes" => Primitive::Bytes,
            "decimal" => Primitive::Decimal,
            "datetime" => Primitive::DateTime,
            "date" => Primitive::Date,
            "time" => Primitive::Time,
            "uuid" => Primitive::Uuid,
            "any" => Primitive::Any,
            "none" => Primitive::None,
            _ => return None,
        })
    }

    pub fn ty(&self) -> Type {
        match self {
            Primitive::Str => Type::String,
            Primitive::Int => Type::Integer,
            Primitive::Float => Type::Number,
            Primitive::Bool => Type::Boolean,
            Primitive::Bytes => Type::Bytes,
            Primitive::Decimal => Type::Decimal,
            Primitive::DateTime => Type::DateTime,
            Primitive::Date => Type::Date,
            Primitive::Time => Type::Time,
            Primitive::Uuid => Type::Uuid,
            Primitive::Any => Type::Any,
            Primitive::None => Type::Null,
        }
    }
}

/// Everything accepted as the definition of one field.
#[derive(Debug, Clone)]
pub enum FieldDefinition {
    /// A constraint builder.
    Builder(Rc<dyn Resolve>),
    /// A bare primitive type.
    Primitive(Primitive),
    /// A nested record of an already synthesized type.
    Schema(SchemaType),
    /// A resolved field, used as is.
    Field(Field),
    /// A default value; the type is inferred from it.
    Default(Value),
    /// A primitive name, the name of the schema being defined, or the name of a
    /// registered schema.
    Named(Rc<str>),
    /// Another definition with extra metadata attached.
    Annotated(Rc<FieldDefinition>, FieldInfo),
}

impl FieldDefinition {
    /// Reference by name, resolved when the enclosing schema is synthesized.
    pub fn named(name: &str) -> Self {
        FieldDefinition::Named(name.into())
    }

    pub fn default_value(value: impl Into<Value>) -> Self {
        FieldDefinition::Default(value.into())
    }
}

impl From<Primitive> for FieldDefinition {
    fn from(primitive: Primitive) -> Self {
        FieldDefinition::Primitive(primitive)
    }
}

impl From<SchemaType> for FieldDefinition {
    fn from(schema: SchemaType) -> Self {
        FieldDefinition::Schema(schema)
    }
}

impl From<&SchemaType> for FieldDefinition {
    fn from(schema: &SchemaType) -> Self {
        FieldDefinition::Schema(schema.clone())
    }
}

impl From<Field> for FieldDefinition {
    fn from(field: Field) -> Self {
        FieldDefinition::Field(field)
    }
}

impl From<Value> for FieldDefinition {
    fn from(value: Value) -> Self {
        FieldDefinition::Default(value)
    }
}

/// Where a definition is being resolved.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
    /// Name of the schema under construction.
    pub schema: &'a str,
    /// Name of the field under construction.
    pub field: &'a str,
}

/// Resolves a definition into a field.
pub fn resolve_field(
    definition: &FieldDefinition,
    ctx: &ResolveContext<'_>,
) -> Result<Field, SchemaError> {
    match definition {
        FieldDefinition::Builder(builder) => builder.resolve(ctx),
        FieldDefinition::Primitive(primitive) => Ok(Field::new(primitive.ty())),
        FieldDefinition::Schema(schema) => Ok(Field::new(Type::Model(schema.clone()))),
        FieldDefinition::Field(field) => Ok(field.clone()),
        FieldDefinition::Default(value) => default_field(value, ctx),
        FieldDefinition::Named(name) => named_field(name, ctx),
        FieldDefinition::Annotated(inner, info) => Ok(info.apply(resolve_field(inner, ctx)?)),
    }
}

fn default_field(value: &Value, ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
    let any = || Rc::new(Field::new(Type::Any));
    let ty = match value {
        Value::Null => Type::Null,
        Value::Bool(_) => Type::Boolean,
        Value::Number(n) if n.is_float() => Type::Number,
        Value::Number(_) => Type::Integer,
        Value::String(_) => Type::String,
        Value::Array(_) => Type::Array(any()),
        Value::Set(_) => Type::Set(any()),
        Value::Object(_) => Type::Record {
            key: Rc::new(Field::new(Type::String)),
            value: any(),
        },
        Value::Undefined => {
            return Err(SchemaError::UnrecognizedDefinition {
                field: ctx.field.into(),
                reason: "undefined is not a default value".into(),
            })
        }
    };
    Ok(Field::new(ty).with_default(value.clone()))
}

fn named_field(name: &Rc<str>, ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
    if let Some(primitive) = Primitive::from_name(name) {
        return Ok(Field::new(primitive.ty()));
    }
    if name.as_ref() == ctx.schema {
        return Ok(Field::new(Type::Ref(name.clone())));
    }
    match registry::schemas::get(name) {
        Some(schema) => Ok(Field::new(Type::Model(schema))),
        None => Err(SchemaError::UnrecognizedDefinition {
            field: ctx.field.into(),
            reason: format!("'{name}' is neither a primitive type nor a known schema").into(),
        }),
    }
}
