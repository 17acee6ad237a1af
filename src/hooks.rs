// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(clippy::pattern_type_mismatch)]

//! Predicates and rewrites that run around the type check of a field.

use crate::schema::error::ValidationError;
use crate::*;

use std::collections::BTreeSet;

/// Rewrite applied to a raw string before it is type checked.
///
/// Transforms always run in declaration order of the variants: strip, lower, upper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Transform {
    Strip,
    Lower,
    Upper,
}

impl Transform {
    pub fn apply(&self, s: &str) -> std::string::String {
        match self {
            Transform::Strip => s.trim().to_string(),
            Transform::Lower => s.to_lowercase(),
            Transform::Upper => s.to_uppercase(),
        }
    }
}

/// Predicate run on a value after it passed its type check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Check {
    /// String parses as embedded JSON.
    Json,
    /// Number is neither infinite nor NaN.
    Finite,
    /// Array elements are pairwise distinct.
    Unique,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hooks {
    transforms: BTreeSet<Transform>,
    checks: BTreeSet<Check>,
}

impl Hooks {
    pub fn add_transform(&mut self, transform: Transform) {
        self.transforms.insert(transform);
    }

    pub fn add_check(&mut self, check: Check) {
        self.checks.insert(check);
    }

    pub fn transforms(&self) -> impl Iterator<Item = &Transform> {
        self.transforms.iter()
    }

    pub fn checks(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter()
    }

    pub fn has_check(&self, check: Check) -> bool {
        self.checks.contains(&check)
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty() && self.checks.is_empty()
    }

    /// Rewrites string input. Other values pass through untouched.
    pub fn transform(&self, value: &Value) -> Value {
        match value {
            Value::String(s) if !self.transforms.is_empty() => {
                let mut out = s.to_string();
                for t in &self.transforms {
                    out = t.apply(&out);
                }
                Value::from(out)
            }
            _ => value.clone(),
        }
    }

    /// Runs every post check and returns the violations found.
    pub fn check(&self, value: &Value, path: &str) -> Vec<ValidationError> {
        self.checks
            .iter()
            .filter_map(|c| run_check(*c, value, path))
            .collect()
    }
}

fn run_check(check: Check, value: &Value, path: &str) -> Option<ValidationError> {
    match (check, value) {
        (Check::Json, Value::String(s)) => match serde_json::from_str::<serde_json::Value>(s) {
            Ok(_) => None,
            Err(e) => Some(ValidationError::InvalidJson {
                error: format!("Invalid JSON string: {e}").into(),
                path: path.into(),
            }),
        },
        (Check::Finite, Value::Number(n)) if !n.is_finite() => Some(ValidationError::NotFinite {
            value: n.format_decimal().into(),
            path: path.into(),
        }),
        (Check::Unique, Value::Array(items)) => {
            first_duplicate(items).map(|index| ValidationError::DuplicateItems {
                index,
                path: path.into(),
            })
        }
        _ => None,
    }
}

/// Index of the first element equal to an earlier one.
///
/// Elements are collected into an ordered set unless one of them holds a NaN.
/// Those fall back to pairwise equality in which a NaN-bearing element is
/// never a duplicate.
pub(crate) fn first_duplicate(items: &[Value]) -> Option<usize> {
    if items.iter().any(Value::contains_nan) {
        return items
            .iter()
            .enumerate()
            .find(|(i, v)| !v.contains_nan() && items[..*i].iter().any(|prev| prev == *v))
            .map(|(i, _)| i);
    }

    let mut seen = BTreeSet::new();
    items
        .iter()
        .enumerate()
        .find(|(_, v)| !seen.insert(*v))
        .map(|(i, _)| i)
}
