// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builders::{impl_type_builder, BuilderState, Resolve, TypeBuilder};
use crate::constraints::Constraint;
use crate::error::SchemaError;
use crate::hooks::Check;
use crate::resolve::{resolve_field, FieldDefinition, ResolveContext};
use crate::schema::{EnumType, Field, Type};
use crate::*;

fn resolve_all(
    definitions: &[FieldDefinition],
    ctx: &ResolveContext<'_>,
) -> Result<Vec<Field>, SchemaError> {
    definitions.iter().map(|d| resolve_field(d, ctx)).collect()
}

/// Homogeneous list.
#[derive(Debug, Clone)]
pub struct ArrayBuilder {
    item: Rc<FieldDefinition>,
    state: BuilderState,
}

impl ArrayBuilder {
    pub fn min(&self, items: usize) -> Self {
        self.with(|s| s.constraints.set(Constraint::MinLength(items)))
    }

    pub fn max(&self, items: usize) -> Self {
        self.with(|s| s.constraints.set(Constraint::MaxLength(items)))
    }

    pub fn length(&self, items: usize) -> Self {
        self.with(|s| {
            s.constraints.set(Constraint::MinLength(items));
            s.constraints.set(Constraint::MaxLength(items));
        })
    }

    /// Reject lists holding the same element twice.
    pub fn unique(&self) -> Self {
        self.with(|s| s.hooks.add_check(Check::Unique))
    }

    pub fn item(&self) -> &FieldDefinition {
        &self.item
    }
}

impl Resolve for ArrayBuilder {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        let item = resolve_field(&self.item, ctx)?;
        Ok(self.state.field(Type::Array(Rc::new(item))))
    }
}

/// Unordered collection of distinct elements.
#[derive(Debug, Clone)]
pub struct SetBuilder {
    item: Rc<FieldDefinition>,
    state: BuilderState,
}

impl SetBuilder {
    pub fn min(&self, items: usize) -> Self {
        self.with(|s| s.constraints.set(Constraint::MinLength(items)))
    }

    pub fn max(&self, items: usize) -> Self {
        self.with(|s| s.constraints.set(Constraint::MaxLength(items)))
    }
}

impl Resolve for SetBuilder {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        let item = resolve_field(&self.item, ctx)?;
        Ok(self.state.field(Type::Set(Rc::new(item))))
    }
}

/// Fixed length list with one definition per position.
#[derive(Debug, Clone)]
pub struct TupleBuilder {
    items: Rc<Vec<FieldDefinition>>,
    state: BuilderState,
}

impl Resolve for TupleBuilder {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        let items = resolve_all(&self.items, ctx)?;
        Ok(self.state.field(Type::Tuple(Rc::new(items))))
    }
}

/// String keyed mapping with uniformly typed values.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    key: Rc<FieldDefinition>,
    value: Rc<FieldDefinition>,
    state: BuilderState,
}

impl RecordBuilder {
    /// Minimum number of entries.
    pub fn min(&self, entries: usize) -> Self {
        self.with(|s| s.constraints.set(Constraint::MinLength(entries)))
    }

    /// Maximum number of entries.
    pub fn max(&self, entries: usize) -> Self {
        self.with(|s| s.constraints.set(Constraint::MaxLength(entries)))
    }
}

impl Resolve for RecordBuilder {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        let key = resolve_field(&self.key, ctx)?;
        let value = resolve_field(&self.value, ctx)?;
        Ok(self.state.field(Type::Record {
            key: Rc::new(key),
            value: Rc::new(value),
        }))
    }
}

/// Value matching any of several definitions, tried in order.
#[derive(Debug, Clone)]
pub struct UnionBuilder {
    members: Rc<Vec<FieldDefinition>>,
    state: BuilderState,
}

impl Resolve for UnionBuilder {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        if self.members.is_empty() {
            return Err(SchemaError::EmptyUnion(ctx.field.into()));
        }
        let members = resolve_all(&self.members, ctx)?;
        Ok(self.state.field(Type::Union(Rc::new(members))))
    }
}

/// One of a fixed list of values.
#[derive(Debug, Clone)]
pub struct LiteralBuilder {
    values: Rc<Vec<Value>>,
    state: BuilderState,
}

impl LiteralBuilder {
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl Resolve for LiteralBuilder {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        if self.values.is_empty() {
            return Err(SchemaError::EmptyLiteral(ctx.field.into()));
        }
        Ok(self.state.field(Type::Literal(self.values.clone())))
    }
}

/// Member of an [`EnumType`].
#[derive(Debug, Clone)]
pub struct EnumBuilder {
    enumeration: EnumType,
    state: BuilderState,
}

impl Resolve for EnumBuilder {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        Ok(self.state.field(Type::Enum(self.enumeration.clone())))
    }
}

/// Nullable wrapper. Defaults to `null`.
#[derive(Debug, Clone)]
pub struct OptionalBuilder {
    inner: Rc<FieldDefinition>,
    state: BuilderState,
}

impl Resolve for OptionalBuilder {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        let inner = resolve_field(&self.inner, ctx)?;
        let ty = match inner.ty {
            Type::Optional(_) => inner.ty,
            _ => Type::Optional(Rc::new(inner)),
        };
        Ok(self.state.field(ty))
    }
}

impl_type_builder!(
    ArrayBuilder,
    SetBuilder,
    TupleBuilder,
    RecordBuilder,
    UnionBuilder,
    LiteralBuilder,
    EnumBuilder,
    OptionalBuilder,
);

pub fn array(item: impl Into<FieldDefinition>) -> ArrayBuilder {
    ArrayBuilder {
        item: Rc::new(item.into()),
        state: BuilderState::default(),
    }
}

pub fn set(item: impl Into<FieldDefinition>) -> SetBuilder {
    SetBuilder {
        item: Rc::new(item.into()),
        state: BuilderState::default(),
    }
}

pub fn tuple<I, D>(items: I) -> TupleBuilder
where
    I: IntoIterator<Item = D>,
    D: Into<FieldDefinition>,
{
    TupleBuilder {
        items: Rc::new(items.into_iter().map(Into::into).collect()),
        state: BuilderState::default(),
    }
}

pub fn record(key: impl Into<FieldDefinition>, value: impl Into<FieldDefinition>) -> RecordBuilder {
    RecordBuilder {
        key: Rc::new(key.into()),
        value: Rc::new(value.into()),
        state: BuilderState::default(),
    }
}

pub fn union<I, D>(members: I) -> UnionBuilder
where
    I: IntoIterator<Item = D>,
    D: Into<FieldDefinition>,
{
    UnionBuilder {
        members: Rc::new(members.into_iter().map(Into::into).collect()),
        state: BuilderState::default(),
    }
}

pub fn literal<I, V>(values: I) -> LiteralBuilder
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    LiteralBuilder {
        values: Rc::new(values.into_iter().map(Into::into).collect()),
        state: BuilderState::default(),
    }
}

pub fn enumeration(enumeration: EnumType) -> EnumBuilder {
    EnumBuilder {
        enumeration,
        state: BuilderState::default(),
    }
}

pub fn optional(inner: impl Into<FieldDefinition>) -> OptionalBuilder {
    let mut state = BuilderState::default();
    state.meta.default = Some(Value::Null);
    OptionalBuilder {
        inner: Rc::new(inner.into()),
        state,
    }
}
