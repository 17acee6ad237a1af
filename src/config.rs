// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Policy for input keys that do not name a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extra {
    /// Keep extra keys on the instance.
    Allow,
    /// Drop extra keys silently.
    #[default]
    Ignore,
    /// Reject extra keys with a validation error.
    Forbid,
}

/// Schema level behavior.
///
/// Every option is optional so that a derived or inheriting schema can
/// fall back to its parent's setting for options it leaves unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Extra>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub populate_by_name: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_assignment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub str_to_lower: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub str_to_upper: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub str_strip_whitespace: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_enum_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_default: Option<bool>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Config> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Config> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn strict(mut self, v: bool) -> Self {
        self.strict = Some(v);
        self
    }

    pub fn frozen(mut self, v: bool) -> Self {
        self.frozen = Some(v);
        self
    }

    pub fn extra(mut self, v: Extra) -> Self {
        self.extra = Some(v);
        self
    }

    pub fn populate_by_name(mut self, v: bool) -> Self {
        self.populate_by_name = Some(v);
        self
    }

    pub fn validate_assignment(mut self, v: bool) -> Self {
        self.validate_assignment = Some(v);
        self
    }

    pub fn str_to_lower(mut self, v: bool) -> Self {
        self.str_to_lower = Some(v);
        self
    }

    pub fn str_to_upper(mut self, v: bool) -> Self {
        self.str_to_upper = Some(v);
        self
    }

    pub fn str_strip_whitespace(mut self, v: bool) -> Self {
        self.str_strip_whitespace = Some(v);
        self
    }

    pub fn use_enum_values(mut self, v: bool) -> Self {
        self.use_enum_values = Some(v);
        self
    }

    pub fn validate_default(mut self, v: bool) -> Self {
        self.validate_default = Some(v);
        self
    }

    /// Options set on `self` win; unset ones are taken from `parent`.
    pub fn merged_over(&self, parent: &Config) -> Config {
        Config {
            strict: self.strict.or(parent.strict),
            frozen: self.frozen.or(parent.frozen),
            extra: self.extra.or(parent.extra),
            populate_by_name: self.populate_by_name.or(parent.populate_by_name),
            validate_assignment: self.validate_assignment.or(parent.validate_assignment),
            str_to_lower: self.str_to_lower.or(parent.str_to_lower),
            str_to_upper: self.str_to_upper.or(parent.str_to_upper),
            str_strip_whitespace: self.str_strip_whitespace.or(parent.str_strip_whitespace),
            use_enum_values: self.use_enum_values.or(parent.use_enum_values),
            validate_default: self.validate_default.or(parent.validate_default),
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.unwrap_or(false)
    }

    pub fn extra_policy(&self) -> Extra {
        self.extra.unwrap_or_default()
    }

    pub fn allows_population_by_name(&self) -> bool {
        self.populate_by_name.unwrap_or(false)
    }

    pub fn validates_assignment(&self) -> bool {
        self.validate_assignment.unwrap_or(false)
    }

    pub fn uses_enum_values(&self) -> bool {
        self.use_enum_values.unwrap_or(false)
    }

    pub fn validates_default(&self) -> bool {
        self.validate_default.unwrap_or(false)
    }

    /// String rewrites requested at schema level, in application order.
    pub(crate) fn string_transforms(&self) -> impl Iterator<Item = crate::hooks::Transform> {
        use crate::hooks::Transform;
        [
            (self.str_strip_whitespace, Transform::Strip),
            (self.str_to_lower, Transform::Lower),
            (self.str_to_upper, Transform::Upper),
        ]
        .into_iter()
        .filter_map(|(on, t)| on.unwrap_or(false).then_some(t))
    }
}
