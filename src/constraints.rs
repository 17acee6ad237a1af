// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

use crate::number::Number;
use crate::*;

use indexmap::IndexMap;

/// Well known string formats. They annotate a field; the accompanying
/// pattern does the actual checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
    Url,
    Uuid,
    DateTime,
    Date,
    Time,
    Ipv4,
    Ipv6,
    Ip,
    Json,
}

impl Format {
    /// Name used for the `format` keyword of the JSON Schema description.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Email => "email",
            Format::Url => "uri",
            Format::Uuid => "uuid",
            Format::DateTime => "date-time",
            Format::Date => "date",
            Format::Time => "time",
            Format::Ipv4 => "ipv4",
            Format::Ipv6 => "ipv6",
            Format::Ip => "ip",
            Format::Json => "json-string",
        }
    }
}

/// A single named rule attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    MinLength(usize),
    MaxLength(usize),
    Pattern(Rc<str>),
    Format(Format),
    Gt(Number),
    Ge(Number),
    Lt(Number),
    Le(Number),
    MultipleOf(Number),
    MaxDigits(u32),
    DecimalPlaces(u32),
    Strict(bool),
}

impl Constraint {
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::MinLength(_) => "min_length",
            Constraint::MaxLength(_) => "max_length",
            Constraint::Pattern(_) => "pattern",
            Constraint::Format(_) => "format",
            Constraint::Gt(_) => "gt",
            Constraint::Ge(_) => "ge",
            Constraint::Lt(_) => "lt",
            Constraint::Le(_) => "le",
            Constraint::MultipleOf(_) => "multiple_of",
            Constraint::MaxDigits(_) => "max_digits",
            Constraint::DecimalPlaces(_) => "decimal_places",
            Constraint::Strict(_) => "strict",
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Constraint::MinLength(n) | Constraint::MaxLength(n) => Value::from(*n),
            Constraint::Pattern(p) => Value::String(p.clone()),
            Constraint::Format(f) => Value::from(f.as_str()),
            Constraint::Gt(n)
            | Constraint::Ge(n)
            | Constraint::Lt(n)
            | Constraint::Le(n)
            | Constraint::MultipleOf(n) => Value::from(*n),
            Constraint::MaxDigits(n) | Constraint::DecimalPlaces(n) => Value::from(*n),
            Constraint::Strict(b) => Value::from(*b),
        }
    }
}

/// Ordered constraint name -> constraint mapping.
///
/// Setting a constraint that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    rules: IndexMap<&'static str, Constraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, constraint: Constraint) {
        self.rules.insert(constraint.name(), constraint);
    }

    pub fn get(&self, name: &str) -> Option<&Constraint> {
        self.rules.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Constraint> {
        self.rules.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Constraint names and values as a plain object, in declaration order of names.
    pub fn to_value(&self) -> Value {
        Value::object(self.rules.iter().map(|(k, c)| (*k, c.value())))
    }

    pub fn min_length(&self) -> Option<usize> {
        match self.get("min_length") {
            Some(Constraint::MinLength(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn max_length(&self) -> Option<usize> {
        match self.get("max_length") {
            Some(Constraint::MaxLength(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn pattern(&self) -> Option<&Rc<str>> {
        match self.get("pattern") {
            Some(Constraint::Pattern(p)) => Some(p),
            _ => None,
        }
    }

    pub fn format(&self) -> Option<Format> {
        match self.get("format") {
            Some(Constraint::Format(f)) => Some(*f),
            _ => None,
        }
    }

    pub fn gt(&self) -> Option<&Number> {
        match self.get("gt") {
            Some(Constraint::Gt(n)) => Some(n),
            _ => None,
        }
    }

    pub fn ge(&self) -> Option<&Number> {
        match self.get("ge") {
            Some(Constraint::Ge(n)) => Some(n),
            _ => None,
        }
    }

    pub fn lt(&self) -> Option<&Number> {
        match self.get("lt") {
            Some(Constraint::Lt(n)) => Some(n),
            _ => None,
        }
    }

    pub fn le(&self) -> Option<&Number> {
        match self.get("le") {
            Some(Constraint::Le(n)) => Some(n),
            _ => None,
        }
    }

    pub fn multiple_of(&self) -> Option<&Number> {
        match self.get("multiple_of") {
            Some(Constraint::MultipleOf(n)) => Some(n),
            _ => None,
        }
    }

    pub fn max_digits(&self) -> Option<u32> {
        match self.get("max_digits") {
            Some(Constraint::MaxDigits(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn decimal_places(&self) -> Option<u32> {
        match self.get("decimal_places") {
            Some(Constraint::DecimalPlaces(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn is_strict(&self) -> bool {
        matches!(self.get("strict"), Some(Constraint::Strict(true)))
    }
}

/// Descriptive metadata and the default of a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// `None` marks the field as required.
    pub default: Option<Value>,
    pub alias: Option<Rc<str>>,
    pub title: Option<Rc<str>>,
    pub description: Option<Rc<str>>,
    pub examples: Option<Vec<Value>>,
    pub deprecated: bool,
}

impl Metadata {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Copy of the metadata without its default.
    pub fn without_default(&self) -> Metadata {
        Metadata {
            default: None,
            ..self.clone()
        }
    }
}
