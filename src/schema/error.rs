// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::use_debug, clippy::pattern_type_mismatch)]

use crate::*;

type String = Rc<str>;

/// Validation errors reported when instantiating a schema type with data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value type does not match the expected field type.
    TypeMismatch {
        expected: String,
        actual: String,
        path: String,
    },
    /// Numeric value violates a bound (`gt`, `ge`, `lt`, `le`).
    OutOfRange {
        value: String,
        bound: String,
        path: String,
    },
    /// Numeric value is not a multiple of the required step.
    NotMultipleOf {
        value: String,
        multiple_of: String,
        path: String,
    },
    /// String or bytes length constraint violation.
    LengthConstraint {
        actual_length: usize,
        min_length: Option<usize>,
        max_length: Option<usize>,
        path: String,
    },
    /// String does not match required pattern.
    PatternMismatch {
        value: String,
        pattern: String,
        path: String,
    },
    /// Container size constraint violation.
    ItemCountConstraint {
        actual_size: usize,
        min_items: Option<usize>,
        max_items: Option<usize>,
        path: String,
    },
    /// Tuple has the wrong number of positions.
    TupleLength {
        expected: usize,
        actual: usize,
        path: String,
    },
    /// Required field is missing.
    MissingRequiredProperty { property: String, path: String },
    /// Extra field rejected by a `forbid` policy.
    AdditionalPropertiesNotAllowed { property: String, path: String },
    /// Value is not one of the allowed literal or enum values.
    NotInEnum {
        value: String,
        allowed_values: Vec<String>,
        path: String,
    },
    /// Value does not match any member of a union.
    NoUnionMatch {
        path: String,
        errors: Vec<ValidationError>,
    },
    /// String could not be parsed as the expected format (date, uuid, ...).
    InvalidFormat {
        format: String,
        value: String,
        path: String,
    },
    /// Decimal has too many digits overall or after the point.
    DigitsConstraint {
        value: String,
        max_digits: Option<u32>,
        decimal_places: Option<u32>,
        path: String,
    },
    /// Number is infinite or NaN.
    NotFinite { value: String, path: String },
    /// String is not valid embedded JSON.
    InvalidJson { error: String, path: String },
    /// Container holds a repeated element.
    DuplicateItems { index: usize, path: String },
    /// Failure raised by a custom field validator.
    Custom { message: String, path: String },
    /// Named schema reference could not be resolved.
    UnresolvedReference { name: String, path: String },
    /// Object key is not a string.
    NonStringKey { key_type: String, path: String },
}

impl ValidationError {
    /// Dotted path of the offending field, empty for the record itself.
    pub fn path(&self) -> &str {
        match self {
            ValidationError::TypeMismatch { path, .. }
            | ValidationError::OutOfRange { path, .. }
            | ValidationError::NotMultipleOf { path, .. }
            | ValidationError::LengthConstraint { path, .. }
            | ValidationError::PatternMismatch { path, .. }
            | ValidationError::ItemCountConstraint { path, .. }
            | ValidationError::TupleLength { path, .. }
            | ValidationError::MissingRequiredProperty { path, .. }
            | ValidationError::AdditionalPropertiesNotAllowed { path, .. }
            | ValidationError::NotInEnum { path, .. }
            | ValidationError::NoUnionMatch { path, .. }
            | ValidationError::InvalidFormat { path, .. }
            | ValidationError::DigitsConstraint { path, .. }
            | ValidationError::NotFinite { path, .. }
            | ValidationError::InvalidJson { path, .. }
            | ValidationError::DuplicateItems { path, .. }
            | ValidationError::Custom { path, .. }
            | ValidationError::UnresolvedReference { path, .. }
            | ValidationError::NonStringKey { path, .. } => path,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TypeMismatch {
                expected,
                actual,
                path,
            } => {
                write!(
                    f,
                    "Type mismatch at '{path}': expected {expected}, got {actual}"
                )
            }
            ValidationError::OutOfRange { value, bound, path } => {
                write!(
                    f,
                    "Value {value} at '{path}' is out of range: must be {bound}"
                )
            }
            ValidationError::NotMultipleOf {
                value,
                multiple_of,
                path,
            } => {
                write!(
                    f,
                    "Value {value} at '{path}' is not a multiple of {multiple_of}"
                )
            }
            ValidationError::LengthConstraint {
                actual_length,
                min_length,
                max_length,
                path,
            } => {
                let constraint_desc = match (min_length, max_length) {
                    (Some(min), Some(max)) if min == max => format!("exactly {min} characters"),
                    (Some(min), Some(max)) => format!("between {min} and {max} characters"),
                    (Some(min), None) => format!("at least {min} characters"),
                    (None, Some(max)) => format!("at most {max} characters"),
                    (None, None) => "within valid length".to_string(),
                };
                write!(
                    f,
                    "String length {actual_length} at '{path}' violates constraint: must be {constraint_desc}"
                )
            }
            ValidationError::PatternMismatch {
                value,
                pattern,
                path,
            } => {
                write!(
                    f,
                    "String '{value}' at '{path}' does not match pattern '{pattern}'"
                )
            }
            ValidationError::ItemCountConstraint {
                actual_size,
                min_items,
                max_items,
                path,
            } => {
                let constraint_desc = match (min_items, max_items) {
                    (Some(min), Some(max)) if min == max => format!("exactly {min} items"),
                    (Some(min), Some(max)) => format!("between {min} and {max} items"),
                    (Some(min), None) => format!("at least {min} items"),
                    (None, Some(max)) => format!("at most {max} items"),
                    (None, None) => "within valid size".to_string(),
                };
                write!(
                    f,
                    "Collection size {actual_size} at '{path}' violates constraint: must have {constraint_desc}"
                )
            }
            ValidationError::TupleLength {
                expected,
                actual,
                path,
            } => {
                write!(
                    f,
                    "Tuple at '{path}' expects {expected} items, got {actual}"
                )
            }
            ValidationError::MissingRequiredProperty { property, path } => {
                write!(f, "Missing required property '{property}' at '{path}'")
            }
            ValidationError::AdditionalPropertiesNotAllowed { property, path } => {
                write!(
                    f,
                    "Additional property '{property}' not allowed at '{path}'"
                )
            }
            ValidationError::NotInEnum {
                value,
                allowed_values,
                path,
            } => {
                let values_json = serde_json::to_string(&allowed_values)
                    .unwrap_or_else(|_| format!("{allowed_values:?}"));

                write!(
                    f,
                    "Value '{value}' at '{path}' is not in allowed values: {values_json}",
                )
            }
            ValidationError::NoUnionMatch { path, errors } => {
                let details: Vec<std::string::String> =
                    errors.iter().map(|e| e.to_string()).collect();
                write!(
                    f,
                    "Value at '{path}' does not match any member of the union. Errors: [{}]",
                    details.join("; ")
                )
            }
            ValidationError::InvalidFormat {
                format,
                value,
                path,
            } => {
                write!(f, "Value '{value}' at '{path}' is not a valid {format}")
            }
            ValidationError::DigitsConstraint {
                value,
                max_digits,
                decimal_places,
                path,
            } => {
                let constraint_desc = match (max_digits, decimal_places) {
                    (Some(d), Some(p)) => format!("at most {d} digits and {p} decimal places"),
                    (Some(d), None) => format!("at most {d} digits"),
                    (None, Some(p)) => format!("at most {p} decimal places"),
                    (None, None) => "within valid precision".to_string(),
                };
                write!(
                    f,
                    "Decimal {value} at '{path}' violates constraint: must have {constraint_desc}"
                )
            }
            ValidationError::NotFinite { value, path } => {
                write!(
                    f,
                    "Value must be finite (not infinity or NaN) at '{path}', got {value}"
                )
            }
            ValidationError::InvalidJson { error, path } => {
                write!(f, "Invalid JSON string at '{path}': {error}")
            }
            ValidationError::DuplicateItems { index, path } => {
                write!(
                    f,
                    "Array items must be unique at '{path}': item {index} repeats an earlier item"
                )
            }
            ValidationError::Custom { message, path } => {
                write!(f, "Validation failed at '{path}': {message}")
            }
            ValidationError::UnresolvedReference { name, path } => {
                write!(f, "Schema reference '{name}' at '{path}' could not be resolved")
            }
            ValidationError::NonStringKey { key_type, path } => {
                write!(
                    f,
                    "Object key at '{path}' must be a string, but found {key_type}"
                )
            }
        }
    }
}

impl core::error::Error for ValidationError {}

/// Every violation found while instantiating one schema type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    schema: String,
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub(crate) fn new(schema: String, errors: Vec<ValidationError>) -> Self {
        Self { schema, errors }
    }

    /// Name of the schema type that rejected the data.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Paths of all violations, in report order.
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(ValidationError::path).collect()
    }

    /// Violations reported for one field path.
    pub fn for_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.path() == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        let plural = if count == 1 { "" } else { "s" };
        write!(f, "{count} validation error{plural} for {}", self.schema)?;
        for e in &self.errors {
            write!(f, "\n  {e}")?;
        }
        Ok(())
    }
}

impl core::error::Error for ValidationErrors {}
