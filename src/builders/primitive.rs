// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::builders::{impl_type_builder, BuilderState, Resolve, TypeBuilder};
use crate::constraints::{Constraint, Format};
use crate::error::SchemaError;
use crate::hooks::{Check, Transform};
use crate::number::Number;
use crate::resolve::ResolveContext;
use crate::schema::{Field, Type};
use crate::*;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";
const URL_PATTERN: &str = r"^https?://(?:[-\w.])+(?:[:\d]+)?(?:/(?:[\w/_.\-~%])*(?:\?(?:[\w&=%.\-])*)?(?:#(?:[\w.\-])*)?)?$";
const UUID_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$";
const DATETIME_PATTERN: &str =
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})?$";
const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";
const TIME_PATTERN: &str = r"^\d{2}:\d{2}:\d{2}(?:\.\d+)?$";
const IPV4_PATTERN: &str = r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$";
const IPV6_PATTERN: &str = r"^(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$";

/// Text field.
#[derive(Debug, Clone)]
pub struct StringBuilder {
    state: BuilderState,
}

impl StringBuilder {
    /// Minimum length in characters.
    pub fn min(&self, length: usize) -> Self {
        self.with(|s| s.constraints.set(Constraint::MinLength(length)))
    }

    /// Maximum length in characters.
    pub fn max(&self, length: usize) -> Self {
        self.with(|s| s.constraints.set(Constraint::MaxLength(length)))
    }

    /// Exact length in characters.
    pub fn length(&self, length: usize) -> Self {
        self.with(|s| {
            s.constraints.set(Constraint::MinLength(length));
            s.constraints.set(Constraint::MaxLength(length));
        })
    }

    /// Regular expression the whole value is searched with. Anchor it to
    /// match the full string.
    pub fn pattern(&self, regex: &str) -> Self {
        self.with(|s| s.constraints.set(Constraint::Pattern(regex.into())))
    }

    fn formatted(&self, pattern: &str, format: Format) -> Self {
        self.with(|s| {
            s.constraints.set(Constraint::Pattern(pattern.into()));
            s.constraints.set(Constraint::Format(format));
        })
    }

    pub fn email(&self) -> Self {
        self.formatted(EMAIL_PATTERN, Format::Email)
    }

    /// `http` or `https` URL.
    pub fn url(&self) -> Self {
        self.formatted(URL_PATTERN, Format::Url)
    }

    pub fn uuid(&self) -> Self {
        self.formatted(UUID_PATTERN, Format::Uuid)
    }

    /// ISO 8601 date and time, kept as a string.
    pub fn datetime(&self) -> Self {
        self.formatted(DATETIME_PATTERN, Format::DateTime)
    }

    pub fn date(&self) -> Self {
        self.formatted(DATE_PATTERN, Format::Date)
    }

    pub fn time(&self) -> Self {
        self.formatted(TIME_PATTERN, Format::Time)
    }

    /// IP address of the given version, or of either version for `None` and
    /// any version other than 4 or 6.
    pub fn ip(&self, version: Option<u8>) -> Self {
        match version {
            Some(4) => self.formatted(IPV4_PATTERN, Format::Ipv4),
            Some(6) => self.formatted(IPV6_PATTERN, Format::Ipv6),
            _ => self.formatted(&format!("({IPV4_PATTERN})|({IPV6_PATTERN})"), Format::Ip),
        }
    }

    /// Value must itself be a JSON document.
    pub fn json(&self) -> Self {
        self.with(|s| s.hooks.add_check(Check::Json))
    }

    /// Trim surrounding whitespace before validation.
    pub fn strip(&self) -> Self {
        self.with(|s| s.hooks.add_transform(Transform::Strip))
    }

    pub fn lower(&self) -> Self {
        self.with(|s| s.hooks.add_transform(Transform::Lower))
    }

    pub fn upper(&self) -> Self {
        self.with(|s| s.hooks.add_transform(Transform::Upper))
    }
}

impl Resolve for StringBuilder {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        Ok(self.state.field(Type::String))
    }
}

/// Numeric field, floating point unless made integral.
#[derive(Debug, Clone)]
pub struct NumberBuilder {
    integer: bool,
    state: BuilderState,
}

impl NumberBuilder {
    /// Accept integers only.
    pub fn integer(&self) -> Self {
        let mut next = self.clone();
        next.integer = true;
        next
    }

    pub fn is_integer(&self) -> bool {
        self.integer
    }

    pub fn gt(&self, bound: impl Into<Number>) -> Self {
        let bound = bound.into();
        self.with(|s| s.constraints.set(Constraint::Gt(bound)))
    }

    pub fn gte(&self, bound: impl Into<Number>) -> Self {
        let bound = bound.into();
        self.with(|s| s.constraints.set(Constraint::Ge(bound)))
    }

    pub fn lt(&self, bound: impl Into<Number>) -> Self {
        let bound = bound.into();
        self.with(|s| s.constraints.set(Constraint::Lt(bound)))
    }

    pub fn lte(&self, bound: impl Into<Number>) -> Self {
        let bound = bound.into();
        self.with(|s| s.constraints.set(Constraint::Le(bound)))
    }

    /// Inclusive range, same as `gte(min).lte(max)`.
    pub fn range(&self, min: impl Into<Number>, max: impl Into<Number>) -> Self {
        self.gte(min).lte(max)
    }

    pub fn positive(&self) -> Self {
        self.gt(0)
    }

    pub fn non_negative(&self) -> Self {
        self.gte(0)
    }

    pub fn negative(&self) -> Self {
        self.lt(0)
    }

    pub fn non_positive(&self) -> Self {
        self.lte(0)
    }

    /// Reject infinities and NaN.
    pub fn finite(&self) -> Self {
        self.with(|s| s.hooks.add_check(Check::Finite))
    }

    pub fn multiple_of(&self, step: impl Into<Number>) -> Self {
        let step = step.into();
        self.with(|s| s.constraints.set(Constraint::MultipleOf(step)))
    }
}

impl Resolve for NumberBuilder {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        let ty = if self.integer {
            Type::Integer
        } else {
            Type::Number
        };
        Ok(self.state.field(ty))
    }
}

#[derive(Debug, Clone)]
pub struct BooleanBuilder {
    state: BuilderState,
}

impl BooleanBuilder {
    /// Accept only real booleans, never strings or numbers.
    pub fn strict(&self) -> Self {
        self.with(|s| s.constraints.set(Constraint::Strict(true)))
    }
}

impl Resolve for BooleanBuilder {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        Ok(self.state.field(Type::Boolean))
    }
}

/// Kind of temporal value a [`TemporalBuilder`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    DateTime,
    Date,
    Time,
}

/// ISO 8601 date, time or date-time.
#[derive(Debug, Clone)]
pub struct TemporalBuilder {
    kind: Temporal,
    state: BuilderState,
}

impl TemporalBuilder {
    pub fn kind(&self) -> Temporal {
        self.kind
    }
}

impl Resolve for TemporalBuilder {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        let ty = match self.kind {
            Temporal::DateTime => Type::DateTime,
            Temporal::Date => Type::Date,
            Temporal::Time => Type::Time,
        };
        Ok(self.state.field(ty))
    }
}

#[derive(Debug, Clone)]
pub struct UuidBuilder {
    state: BuilderState,
}

impl Resolve for UuidBuilder {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        Ok(self.state.field(Type::Uuid))
    }
}

/// Raw byte string. Lengths count bytes.
#[derive(Debug, Clone)]
pub struct BytesBuilder {
    state: BuilderState,
}

impl BytesBuilder {
    pub fn min(&self, length: usize) -> Self {
        self.with(|s| s.constraints.set(Constraint::MinLength(length)))
    }

    pub fn max(&self, length: usize) -> Self {
        self.with(|s| s.constraints.set(Constraint::MaxLength(length)))
    }
}

impl Resolve for BytesBuilder {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        Ok(self.state.field(Type::Bytes))
    }
}

/// Decimal number, given as a number or as a numeric string.
#[derive(Debug, Clone)]
pub struct DecimalBuilder {
    state: BuilderState,
}

impl DecimalBuilder {
    /// Maximum number of significant digits.
    pub fn max_digits(&self, digits: u32) -> Self {
        self.with(|s| s.constraints.set(Constraint::MaxDigits(digits)))
    }

    /// Maximum number of digits after the decimal point.
    pub fn decimal_places(&self, places: u32) -> Self {
        self.with(|s| s.constraints.set(Constraint::DecimalPlaces(places)))
    }

    pub fn gt(&self, bound: impl Into<Number>) -> Self {
        let bound = bound.into();
        self.with(|s| s.constraints.set(Constraint::Gt(bound)))
    }

    pub fn gte(&self, bound: impl Into<Number>) -> Self {
        let bound = bound.into();
        self.with(|s| s.constraints.set(Constraint::Ge(bound)))
    }

    pub fn lt(&self, bound: impl Into<Number>) -> Self {
        let bound = bound.into();
        self.with(|s| s.constraints.set(Constraint::Lt(bound)))
    }

    pub fn lte(&self, bound: impl Into<Number>) -> Self {
        let bound = bound.into();
        self.with(|s| s.constraints.set(Constraint::Le(bound)))
    }
}

impl Resolve for DecimalBuilder {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        Ok(self.state.field(Type::Decimal))
    }
}

#[derive(Debug, Clone)]
pub struct AnyBuilder {
    state: BuilderState,
}

impl Resolve for AnyBuilder {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        Ok(self.state.field(Type::Any))
    }
}

/// Field that only ever holds `null`. It always defaults to `null`.
#[derive(Debug, Clone)]
pub struct NoneBuilder {
    state: BuilderState,
}

impl Resolve for NoneBuilder {
    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Field, SchemaError> {
        Ok(self.state.field(Type::Null).with_default(Value::Null))
    }
}

impl_type_builder!(
    StringBuilder,
    NumberBuilder,
    BooleanBuilder,
    TemporalBuilder,
    UuidBuilder,
    BytesBuilder,
    DecimalBuilder,
    AnyBuilder,
    NoneBuilder,
);

fn bare() -> BuilderState {
    BuilderState::default()
}

lazy_static::lazy_static! {
    static ref STRING: StringBuilder = StringBuilder { state: bare() };
    static ref NUMBER: NumberBuilder = NumberBuilder { integer: false, state: bare() };
    static ref INTEGER: NumberBuilder = NumberBuilder { integer: true, state: bare() };
    static ref BOOLEAN: BooleanBuilder = BooleanBuilder { state: bare() };
    static ref DATETIME: TemporalBuilder = TemporalBuilder { kind: Temporal::DateTime, state: bare() };
    static ref DATE: TemporalBuilder = TemporalBuilder { kind: Temporal::Date, state: bare() };
    static ref TIME: TemporalBuilder = TemporalBuilder { kind: Temporal::Time, state: bare() };
    static ref UUID: UuidBuilder = UuidBuilder { state: bare() };
    static ref BYTES: BytesBuilder = BytesBuilder { state: bare() };
    static ref DECIMAL: DecimalBuilder = DecimalBuilder { state: bare() };
    static ref ANY: AnyBuilder = AnyBuilder { state: bare() };
    static ref NONE: NoneBuilder = NoneBuilder {
        state: BuilderState {
            meta: crate::constraints::Metadata {
                default: Some(Value::Null),
                ..Default::default()
            },
            ..bare()
        },
    };
}

pub fn string() -> StringBuilder {
    STRING.clone()
}

pub fn number() -> NumberBuilder {
    NUMBER.clone()
}

pub fn integer() -> NumberBuilder {
    INTEGER.clone()
}

pub fn boolean() -> BooleanBuilder {
    BOOLEAN.clone()
}

pub fn datetime() -> TemporalBuilder {
    DATETIME.clone()
}

pub fn date() -> TemporalBuilder {
    DATE.clone()
}

pub fn time() -> TemporalBuilder {
    TIME.clone()
}

pub fn uuid() -> UuidBuilder {
    UUID.clone()
}

pub fn bytes() -> BytesBuilder {
    BYTES.clone()
}

pub fn decimal() -> DecimalBuilder {
    DECIMAL.clone()
}

pub fn any() -> AnyBuilder {
    ANY.clone()
}

pub fn none() -> NoneBuilder {
    NONE.clone()
}
