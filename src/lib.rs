// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub(crate) use core::fmt;
pub(crate) use std::sync::Arc as Rc;

pub mod algebra;
pub mod builders;
mod config;
mod constraints;
mod error;
mod hooks;
pub mod interface;
pub mod model;
mod number;
mod resolve;
pub mod schema;
mod value;

pub use algebra::{
    extend, extend_with, make_optional, make_optional_with, merge, merge_with, omit, omit_with,
    partial, partial_with, pick, pick_with, required, required_with, DeriveOptions,
};
pub use builders::container::{
    array, enumeration, literal, optional, record, set, tuple, union, ArrayBuilder, EnumBuilder,
    LiteralBuilder, OptionalBuilder, RecordBuilder, SetBuilder, TupleBuilder, UnionBuilder,
};
pub use builders::primitive::{
    any, boolean, bytes, date, datetime, decimal, integer, none, number, string, time, uuid,
    AnyBuilder, BooleanBuilder, BytesBuilder, DecimalBuilder, NoneBuilder, NumberBuilder,
    StringBuilder, Temporal, TemporalBuilder, UuidBuilder,
};
pub use builders::{BuilderState, Resolve, TypeBuilder};
pub use config::{Config, Extra};
pub use constraints::{Constraint, ConstraintSet, Format, Metadata};
pub use error::SchemaError;
pub use hooks::{Check, Hooks, Transform};
pub use interface::{generated_name, interface, Collision, Interface};
pub use model::{field, model, FieldInfo, ModelBuilder};
pub use number::Number;
pub use resolve::{resolve_field, FieldDefinition, Primitive, ResolveContext};
pub use schema::error::{ValidationError, ValidationErrors};
pub use schema::instance::{AssignmentError, Instance};
pub use schema::{EnumType, Field, FieldValidator, SchemaDefinition, SchemaType, Type};
pub use value::Value;

/// Everything needed to declare and derive schema types.
pub mod prelude {
    pub use crate::{
        any, array, boolean, bytes, date, datetime, decimal, enumeration, extend, field, integer,
        interface, literal, merge, model, none, number, omit, optional, partial, pick, record,
        required, set, string, time, tuple, union, uuid, Config, EnumType, Extra, FieldDefinition,
        FieldInfo, Instance, Interface, Primitive, SchemaError, SchemaType, TypeBuilder, Value,
    };
}
