// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::Rc;

type String = Rc<str>;

/// Errors raised while describing or synthesizing a schema.
///
/// These are programming errors in the schema declaration; they are surfaced
/// immediately and no partial schema is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A field definition is not a builder, primitive, schema, field, default or known name.
    #[error("Unrecognized definition for field '{field}': {reason}")]
    UnrecognizedDefinition { field: String, reason: String },
    /// A field name passed to `pick` does not exist in the source schema.
    #[error("Field '{field}' not found in model '{schema}'")]
    UnknownField { field: String, schema: String },
    /// No fields were given and empty schemas were not allowed.
    #[error("Schema '{0}' has no fields")]
    EmptyDefinition(String),
    /// The same field name was declared twice and collisions were not allowed.
    #[error("Field '{0}' is declared more than once")]
    DuplicateField(String),
    /// A union was declared without members.
    #[error("Union for field '{0}' has no members")]
    EmptyUnion(String),
    /// A literal was declared without values.
    #[error("Literal for field '{0}' has no values")]
    EmptyLiteral(String),
    /// A pattern constraint does not compile.
    #[error("Invalid regex pattern '{pattern}' for field '{field}': {error}")]
    InvalidPattern {
        field: String,
        pattern: String,
        error: String,
    },
    /// An explicit schema name is empty or whitespace-only.
    #[error("Invalid schema name '{0}': empty or whitespace-only names are not allowed")]
    InvalidName(String),
    /// A schema with this name is already registered.
    #[error("A schema named '{0}' is already registered")]
    AlreadyRegistered(String),
    /// A custom validator targets a field the schema does not have.
    #[error("Validator registered for unknown field '{field}' in model '{schema}'")]
    UnknownValidator { field: String, schema: String },
}
