// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![allow(missing_debug_implementations)] // validator is zero-sized marker
#![allow(clippy::pattern_type_mismatch, clippy::needless_continue)]

use crate::config::{Config, Extra};
use crate::number::Number;
use crate::schema::error::{ValidationError, ValidationErrors};
use crate::schema::instance::Instance;
use crate::schema::{registry, Field, SchemaType, Type};
use crate::*;

use core::str::FromStr;
use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use dashmap::DashMap;
use indexmap::IndexMap;
use regex::Regex;

type String = Rc<str>;

lazy_static::lazy_static! {
    static ref PATTERN_CACHE: DashMap<std::string::String, Regex> = DashMap::new();
}

/// Compiles `pattern`, reusing an earlier compilation when there is one.
pub(crate) fn compiled_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(re) = PATTERN_CACHE.get(pattern) {
        return Ok(re.value().clone());
    }
    let re = Regex::new(pattern)?;
    PATTERN_CACHE.insert(pattern.to_string(), re.clone());
    Ok(re)
}

type Outcome = Result<Value, Vec<ValidationError>>;

/// Records enclosing the value being validated, innermost first.
struct Scope<'a> {
    schema: &'a SchemaType,
    outer: Option<&'a Scope<'a>>,
}

impl Scope<'_> {
    fn find(&self, name: &str) -> Option<SchemaType> {
        let mut current = Some(self);
        while let Some(scope) = current {
            if scope.schema.name().as_ref() == name {
                return Some(scope.schema.clone());
            }
            current = scope.outer;
        }
        None
    }
}

#[derive(Clone, Copy)]
struct Ctx<'a> {
    config: &'a Config,
    scope: &'a Scope<'a>,
    strict: bool,
}

struct Record {
    values: IndexMap<String, Value>,
    extra: IndexMap<String, Value>,
}

impl Record {
    fn into_value(self) -> Value {
        Value::object(self.values.into_iter().chain(self.extra))
    }
}

/// Validator for checking data against a synthesized schema type.
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validates a record and produces an instance of `schema`.
    pub(crate) fn validate_instance(
        schema: &SchemaType,
        data: &Value,
    ) -> Result<Instance, ValidationErrors> {
        let scope = Scope {
            schema,
            outer: None,
        };
        match Self::validate_record(data, "", &scope, false) {
            Ok(record) => Ok(Instance::new(schema.clone(), record.values, record.extra)),
            Err(errors) => {
                log::trace!("{} rejected data with {} errors", schema.name(), errors.len());
                Err(ValidationErrors::new(schema.name().clone(), errors))
            }
        }
    }

    /// Validates a single value for field `name` of `schema`, custom validators included.
    pub(crate) fn validate_assignment(
        schema: &SchemaType,
        name: &str,
        field: &Field,
        value: &Value,
    ) -> Result<Value, ValidationErrors> {
        let scope = Scope {
            schema,
            outer: None,
        };
        let ctx = Ctx {
            config: schema.config(),
            scope: &scope,
            strict: schema.config().is_strict(),
        };
        Self::validate_field(value, field, name, ctx)
            .and_then(|v| Self::run_validators(schema, name, v, name))
            .map_err(|errors| ValidationErrors::new(schema.name().clone(), errors))
    }

    fn validate_record(
        data: &Value,
        path: &str,
        scope: &Scope,
        strict: bool,
    ) -> Result<Record, Vec<ValidationError>> {
        let schema = scope.schema;
        let config = schema.config();
        let ctx = Ctx {
            config,
            scope,
            strict: strict || config.is_strict(),
        };

        let object = match data {
            Value::Object(o) => o,
            _ => {
                return Err(vec![ValidationError::TypeMismatch {
                    expected: schema.name().clone(),
                    actual: data.type_name().into(),
                    path: path.into(),
                }])
            }
        };

        let mut errors = vec![];
        let mut input: BTreeMap<&str, &Value> = BTreeMap::new();
        for (k, v) in object.iter() {
            match k {
                Value::String(s) => {
                    input.insert(s.as_ref(), v);
                }
                _ => errors.push(ValidationError::NonStringKey {
                    key_type: k.type_name().into(),
                    path: path.into(),
                }),
            }
        }

        let mut consumed: BTreeSet<&str> = BTreeSet::new();
        let mut values = IndexMap::new();
        for (name, field) in schema.fields() {
            let field_path = join_path(path, name);
            match Self::lookup(&input, name, field, config) {
                Some((key, raw)) => {
                    consumed.insert(key);
                    match Self::validate_field(raw, field, &field_path, ctx)
                        .and_then(|v| Self::run_validators(schema, name, v, &field_path))
                    {
                        Ok(v) => {
                            values.insert(name.clone(), v);
                        }
                        Err(e) => errors.extend(e),
                    }
                }
                None => match field.default_value() {
                    Some(default) if config.validates_default() => {
                        match Self::validate_field(default, field, &field_path, ctx) {
                            Ok(v) => {
                                values.insert(name.clone(), v);
                            }
                            Err(e) => errors.extend(e),
                        }
                    }
                    Some(default) => {
                        values.insert(name.clone(), default.clone());
                    }
                    None => errors.push(ValidationError::MissingRequiredProperty {
                        property: name.clone(),
                        path: field_path.into(),
                    }),
                },
            }
        }

        let mut extra = IndexMap::new();
        for (key, value) in input.iter() {
            if consumed.contains(key) {
                continue;
            }
            match config.extra_policy() {
                Extra::Allow => {
                    extra.insert(String::from(*key), (*value).clone());
                }
                Extra::Ignore => (),
                Extra::Forbid => errors.push(ValidationError::AdditionalPropertiesNotAllowed {
                    property: (*key).into(),
                    path: join_path(path, key).into(),
                }),
            }
        }

        if errors.is_empty() {
            Ok(Record { values, extra })
        } else {
            Err(errors)
        }
    }

    /// Input entry for a field: by alias when it has one, by name otherwise or
    /// when population by name is enabled.
    fn lookup<'a>(
        input: &BTreeMap<&'a str, &'a Value>,
        name: &str,
        field: &Field,
        config: &Config,
    ) -> Option<(&'a str, &'a Value)> {
        let by_key = |key: &str| input.get_key_value(key).map(|(k, v)| (*k, *v));
        match field.alias() {
            Some(alias) => by_key(alias).or_else(|| {
                if config.allows_population_by_name() {
                    by_key(name)
                } else {
                    None
                }
            }),
            None => by_key(name),
        }
    }

    fn run_validators(schema: &SchemaType, name: &str, value: Value, path: &str) -> Outcome {
        let Some(validators) = schema.validators().get(name) else {
            return Ok(value);
        };
        validators.iter().try_fold(value, |v, validator| {
            validator(&v).map_err(|message| {
                vec![ValidationError::Custom {
                    message: message.into(),
                    path: path.into(),
                }]
            })
        })
    }

    fn validate_field(value: &Value, field: &Field, path: &str, ctx: Ctx) -> Outcome {
        let value = Self::apply_config_transforms(field.hooks.transform(value), field, ctx.config);
        if let (Type::Optional(_), Value::Null) = (&field.ty, &value) {
            return Ok(Value::Null);
        }

        let ctx = Ctx {
            strict: ctx.strict || field.constraints.is_strict(),
            ..ctx
        };
        let v = Self::validate_type(&value, field, path, ctx)?;

        let mut errors = Self::check_constraints(&v, field, path);
        errors.extend(field.hooks.check(&v, path));
        if errors.is_empty() {
            Ok(v)
        } else {
            Err(errors)
        }
    }

    fn apply_config_transforms(value: Value, field: &Field, config: &Config) -> Value {
        if !matches!(field.ty, Type::String) {
            return value;
        }
        let transformed = match &value {
            Value::String(s) => {
                let mut out: Option<std::string::String> = None;
                for t in config.string_transforms() {
                    out = Some(t.apply(out.as_deref().unwrap_or(&**s)));
                }
                out
            }
            _ => None,
        };
        transformed.map(Value::from).unwrap_or(value)
    }

    fn validate_type(value: &Value, field: &Field, path: &str, ctx: Ctx) -> Outcome {
        let mismatch = || {
            vec![ValidationError::TypeMismatch {
                expected: field.ty.describe().into(),
                actual: value.type_name().into(),
                path: path.into(),
            }]
        };

        match &field.ty {
            Type::Any => Ok(value.clone()),
            Type::Null => match value {
                Value::Null => Ok(Value::Null),
                _ => Err(mismatch()),
            },
            Type::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::String(s) if !ctx.strict => match s.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
                    "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
                    _ => Err(mismatch()),
                },
                Value::Number(n) if !ctx.strict => match n.as_u64() {
                    Some(0) => Ok(Value::Bool(false)),
                    Some(1) => Ok(Value::Bool(true)),
                    _ => Err(mismatch()),
                },
                _ => Err(mismatch()),
            },
            Type::Integer => match value {
                Value::Number(n) if !n.is_float() => Ok(value.clone()),
                Value::Number(n) if !ctx.strict => {
                    n.to_integer().map(Value::from).ok_or_else(mismatch)
                }
                Value::String(s) if !ctx.strict => Number::from_str(s)
                    .ok()
                    .and_then(|n| n.to_integer())
                    .map(Value::from)
                    .ok_or_else(mismatch),
                _ => Err(mismatch()),
            },
            Type::Number => match value {
                Value::Number(n) => Ok(Value::from(n.to_f64())),
                Value::String(s) if !ctx.strict => Number::from_str(s)
                    .map(|n| Value::from(n.to_f64()))
                    .map_err(|_| mismatch()),
                _ => Err(mismatch()),
            },
            Type::Decimal => match value {
                Value::Number(_) => Ok(value.clone()),
                Value::String(s) if Number::from_str(s).is_ok() => Ok(value.clone()),
                _ => Err(mismatch()),
            },
            Type::String | Type::Bytes => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(mismatch()),
            },
            Type::Uuid => match value {
                Value::String(s) => match uuid::Uuid::parse_str(s) {
                    Ok(u) => Ok(Value::from(u.hyphenated().to_string())),
                    Err(_) => Err(invalid_format("uuid", s, path)),
                },
                _ => Err(mismatch()),
            },
            Type::DateTime | Type::Date | Type::Time => match value {
                Value::String(s) => {
                    if parses_temporal(&field.ty, s) {
                        Ok(value.clone())
                    } else {
                        Err(invalid_format(&field.ty.describe(), s, path))
                    }
                }
                _ => Err(mismatch()),
            },
            Type::Array(item) => {
                let items: Vec<&Value> = match value {
                    Value::Array(a) => a.iter().collect(),
                    Value::Set(s) if !ctx.strict => s.iter().collect(),
                    _ => return Err(mismatch()),
                };
                let mut out = Vec::with_capacity(items.len());
                let mut errors = vec![];
                for (i, v) in items.into_iter().enumerate() {
                    match Self::validate_field(v, item, &format!("{path}[{i}]"), ctx) {
                        Ok(v) => out.push(v),
                        Err(e) => errors.extend(e),
                    }
                }
                if errors.is_empty() {
                    Ok(Value::from(out))
                } else {
                    Err(errors)
                }
            }
            Type::Set(item) => {
                let items: Vec<&Value> = match value {
                    Value::Set(s) => s.iter().collect(),
                    Value::Array(a) if !ctx.strict => a.iter().collect(),
                    _ => return Err(mismatch()),
                };
                let mut out = BTreeSet::new();
                let mut errors = vec![];
                for (i, v) in items.into_iter().enumerate() {
                    match Self::validate_field(v, item, &format!("{path}[{i}]"), ctx) {
                        Ok(v) => {
                            out.insert(v);
                        }
                        Err(e) => errors.extend(e),
                    }
                }
                if errors.is_empty() {
                    Ok(Value::from(out))
                } else {
                    Err(errors)
                }
            }
            Type::Tuple(items) => {
                let values = match value {
                    Value::Array(a) => a,
                    _ => return Err(mismatch()),
                };
                if values.len() != items.len() {
                    return Err(vec![ValidationError::TupleLength {
                        expected: items.len(),
                        actual: values.len(),
                        path: path.into(),
                    }]);
                }
                let mut out = Vec::with_capacity(values.len());
                let mut errors = vec![];
                for (i, (v, item)) in values.iter().zip(items.iter()).enumerate() {
                    match Self::validate_field(v, item, &format!("{path}[{i}]"), ctx) {
                        Ok(v) => out.push(v),
                        Err(e) => errors.extend(e),
                    }
                }
                if errors.is_empty() {
                    Ok(Value::from(out))
                } else {
                    Err(errors)
                }
            }
            Type::Record { key, value: item } => {
                let object = match value {
                    Value::Object(o) => o,
                    _ => return Err(mismatch()),
                };
                let mut out = BTreeMap::new();
                let mut errors = vec![];
                for (k, v) in object.iter() {
                    let Value::String(name) = k else {
                        errors.push(ValidationError::NonStringKey {
                            key_type: k.type_name().into(),
                            path: path.into(),
                        });
                        continue;
                    };
                    let entry_path = join_path(path, name);
                    let k = Self::validate_field(k, key, &entry_path, ctx);
                    let v = Self::validate_field(v, item, &entry_path, ctx);
                    match (k, v) {
                        (Ok(k), Ok(v)) => {
                            out.insert(k, v);
                        }
                        (k, v) => {
                            errors.extend(k.err().unwrap_or_default());
                            errors.extend(v.err().unwrap_or_default());
                        }
                    }
                }
                if errors.is_empty() {
                    Ok(Value::from(out))
                } else {
                    Err(errors)
                }
            }
            Type::Union(members) => {
                // An exact match on any member beats a coerced match on an earlier one.
                if !ctx.strict {
                    let exact = Ctx {
                        strict: true,
                        ..ctx
                    };
                    if let Some(v) = members
                        .iter()
                        .find_map(|m| Self::validate_field(value, m, path, exact).ok())
                    {
                        return Ok(v);
                    }
                }
                let mut errors = vec![];
                for member in members.iter() {
                    match Self::validate_field(value, member, path, ctx) {
                        Ok(v) => return Ok(v),
                        Err(e) => errors.extend(e),
                    }
                }
                Err(vec![ValidationError::NoUnionMatch {
                    path: path.into(),
                    errors,
                }])
            }
            Type::Literal(values) => {
                if values.contains(value) {
                    Ok(value.clone())
                } else {
                    Err(not_in(value, values.iter(), path))
                }
            }
            Type::Enum(e) => match e.lookup(value, !ctx.strict) {
                Some((member, v)) => {
                    if ctx.config.uses_enum_values() {
                        Ok(v.clone())
                    } else {
                        Ok(Value::String(member.clone()))
                    }
                }
                None => Err(not_in(value, e.values(), path)),
            },
            Type::Optional(inner) => match value {
                Value::Null => Ok(Value::Null),
                _ => Self::validate_field(value, inner, path, ctx),
            },
            Type::Model(schema) => Self::validate_nested(value, schema, path, ctx),
            Type::Ref(name) => {
                match ctx
                    .scope
                    .find(name)
                    .or_else(|| registry::schemas::get(name))
                {
                    Some(schema) => Self::validate_nested(value, &schema, path, ctx),
                    None => Err(vec![ValidationError::UnresolvedReference {
                        name: name.clone(),
                        path: path.into(),
                    }]),
                }
            }
        }
    }

    fn validate_nested(value: &Value, schema: &SchemaType, path: &str, ctx: Ctx) -> Outcome {
        let scope = Scope {
            schema,
            outer: Some(ctx.scope),
        };
        Self::validate_record(value, path, &scope, ctx.strict).map(Record::into_value)
    }

    fn check_constraints(value: &Value, field: &Field, path: &str) -> Vec<ValidationError> {
        let c = &field.constraints;
        let mut errors = vec![];

        let (min, max) = (c.min_length(), c.max_length());
        if min.is_some() || max.is_some() {
            match value {
                Value::String(s) => {
                    let len = if matches!(field.ty, Type::Bytes) {
                        s.len()
                    } else {
                        s.chars().count()
                    };
                    if !within(len, min, max) {
                        errors.push(ValidationError::LengthConstraint {
                            actual_length: len,
                            min_length: min,
                            max_length: max,
                            path: path.into(),
                        });
                    }
                }
                Value::Array(_) | Value::Set(_) | Value::Object(_) => {
                    let size = match value {
                        Value::Array(a) => a.len(),
                        Value::Set(s) => s.len(),
                        Value::Object(o) => o.len(),
                        _ => 0,
                    };
                    if !within(size, min, max) {
                        errors.push(ValidationError::ItemCountConstraint {
                            actual_size: size,
                            min_items: min,
                            max_items: max,
                            path: path.into(),
                        });
                    }
                }
                _ => (),
            }
        }

        if let (Some(pattern), Value::String(s)) = (c.pattern(), value) {
            match compiled_pattern(pattern) {
                Ok(re) if !re.is_match(s) => errors.push(ValidationError::PatternMismatch {
                    value: s.clone(),
                    pattern: pattern.clone(),
                    path: path.into(),
                }),
                Ok(_) => (),
                Err(e) => errors.push(ValidationError::Custom {
                    message: format!("invalid pattern '{pattern}': {e}").into(),
                    path: path.into(),
                }),
            }
        }

        let number = match value {
            Value::Number(n) => Some(*n),
            Value::String(s) if matches!(field.ty, Type::Decimal) => Number::from_str(s).ok(),
            _ => None,
        };
        if let Some(n) = number {
            let bounds = [
                (c.gt(), "greater than", n.is_nan() || c.gt().is_some_and(|b| n <= *b)),
                (c.ge(), "greater than or equal to", n.is_nan() || c.ge().is_some_and(|b| n < *b)),
                (c.lt(), "less than", n.is_nan() || c.lt().is_some_and(|b| n >= *b)),
                (c.le(), "less than or equal to", n.is_nan() || c.le().is_some_and(|b| n > *b)),
            ];
            for (bound, desc, violated) in bounds {
                if let (Some(bound), true) = (bound, violated) {
                    errors.push(ValidationError::OutOfRange {
                        value: n.format_decimal().into(),
                        bound: format!("{desc} {bound}").into(),
                        path: path.into(),
                    });
                }
            }

            if let Some(step) = c.multiple_of() {
                if !n.is_multiple_of(step) {
                    errors.push(ValidationError::NotMultipleOf {
                        value: n.format_decimal().into(),
                        multiple_of: step.format_decimal().into(),
                        path: path.into(),
                    });
                }
            }
        }

        let (max_digits, decimal_places) = (c.max_digits(), c.decimal_places());
        if matches!(field.ty, Type::Decimal) && (max_digits.is_some() || decimal_places.is_some()) {
            let text = match value {
                Value::Number(n) => Some(n.format_decimal()),
                Value::String(s) => Some(s.to_string()),
                _ => None,
            };
            if let Some(text) = text {
                if let Some((digits, places)) = decimal_digits(&text) {
                    let too_many = max_digits.is_some_and(|m| digits > m)
                        || decimal_places.is_some_and(|p| places > p);
                    if too_many {
                        errors.push(ValidationError::DigitsConstraint {
                            value: text.into(),
                            max_digits,
                            decimal_places,
                            path: path.into(),
                        });
                    }
                }
            }
        }

        errors
    }
}

fn join_path(path: &str, name: &str) -> std::string::String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn within(len: usize, min: Option<usize>, max: Option<usize>) -> bool {
    min.map_or(true, |m| len >= m) && max.map_or(true, |m| len <= m)
}

fn invalid_format(format: &str, value: &str, path: &str) -> Vec<ValidationError> {
    vec![ValidationError::InvalidFormat {
        format: format.into(),
        value: value.into(),
        path: path.into(),
    }]
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        _ => value.to_string().into(),
    }
}

fn not_in<'a>(
    value: &Value,
    allowed: impl Iterator<Item = &'a Value>,
    path: &str,
) -> Vec<ValidationError> {
    vec![ValidationError::NotInEnum {
        value: display(value),
        allowed_values: allowed.map(display).collect(),
        path: path.into(),
    }]
}

fn parses_temporal(ty: &Type, s: &str) -> bool {
    match ty {
        Type::DateTime => {
            DateTime::parse_from_rfc3339(s).is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
        }
        Type::Date => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        Type::Time => {
            NaiveTime::parse_from_str(s, "%H:%M:%S%.f").is_ok()
                || NaiveTime::parse_from_str(s, "%H:%M").is_ok()
        }
        _ => false,
    }
}

/// Significant digits and decimal places of a decimal literal.
fn decimal_digits(text: &str) -> Option<(u32, u32)> {
    let text = text.trim().trim_start_matches(['+', '-']);
    let normalized = if text.contains(['e', 'E']) {
        text.parse::<f64>().ok()?.to_string()
    } else {
        text.to_string()
    };
    let (int_part, frac_part) = normalized
        .split_once('.')
        .unwrap_or((normalized.as_str(), ""));
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let int_digits = int_part.trim_start_matches('0').len();
    let places = frac_part.trim_end_matches('0').len();
    let digits = u32::try_from(int_digits + places).ok()?;
    Some((digits, u32::try_from(places).ok()?))
}
