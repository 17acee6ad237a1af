// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Named record types declared field by field.

use crate::config::{Config, Extra};
use crate::error::SchemaError;
use crate::interface::Interface;
use crate::resolve::FieldDefinition;
use crate::schema::{Field, SchemaType};
use crate::*;

/// Metadata attached to a definition by [`field`]. Unset entries leave the
/// definition's own metadata alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldInfo {
    pub alias: Option<Rc<str>>,
    pub description: Option<Rc<str>>,
    pub title: Option<Rc<str>>,
    pub examples: Option<Vec<Value>>,
    pub deprecated: bool,
    pub default: Option<Value>,
}

impl FieldInfo {
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn examples<I, V>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.examples = Some(examples.into_iter().map(Into::into).collect());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub(crate) fn apply(&self, mut field: Field) -> Field {
        let meta = &mut field.meta;
        if let Some(alias) = &self.alias {
            meta.alias = Some(alias.clone());
        }
        if let Some(description) = &self.description {
            meta.description = Some(description.clone());
        }
        if let Some(title) = &self.title {
            meta.title = Some(title.clone());
        }
        if let Some(examples) = &self.examples {
            meta.examples = Some(examples.clone());
        }
        if self.deprecated {
            meta.deprecated = true;
        }
        if let Some(default) = &self.default {
            meta.default = Some(default.clone());
        }
        field
    }
}

/// Attaches `info` to any definition.
pub fn field(definition: impl Into<FieldDefinition>, info: FieldInfo) -> FieldDefinition {
    FieldDefinition::Annotated(Rc::new(definition.into()), info)
}

/// Declares a named record type one field at a time.
///
/// ```text
/// let user = model("User")
///     .field("id", integer().positive())
///     .field("name", field(string().min(1), FieldInfo::new().alias("fullName")))
///     .frozen()
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    inner: Interface,
}

impl ModelBuilder {
    pub fn field(mut self, name: &str, definition: impl Into<FieldDefinition>) -> Self {
        self.inner = self.inner.field(name, definition);
        self
    }

    pub fn fields<I, N, D>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (N, D)>,
        N: AsRef<str>,
        D: Into<FieldDefinition>,
    {
        self.inner = self.inner.fields(fields);
        self
    }

    pub fn doc(mut self, doc: &str) -> Self {
        self.inner = self.inner.doc(doc);
        self
    }

    /// Options set in `config` replace the ones set so far.
    pub fn config(mut self, config: Config) -> Self {
        self.inner.config = config.merged_over(&self.inner.config);
        self
    }

    pub fn frozen(mut self) -> Self {
        self.inner.config.frozen = Some(true);
        self
    }

    pub fn strict(mut self) -> Self {
        self.inner.config.strict = Some(true);
        self
    }

    pub fn extra(mut self, extra: Extra) -> Self {
        self.inner.config.extra = Some(extra);
        self
    }

    pub fn validate_assignment(mut self) -> Self {
        self.inner.config.validate_assignment = Some(true);
        self
    }

    pub fn populate_by_name(mut self) -> Self {
        self.inner.config.populate_by_name = Some(true);
        self
    }

    pub fn use_enum_values(mut self) -> Self {
        self.inner.config.use_enum_values = Some(true);
        self
    }

    pub fn validator<F>(mut self, field: &str, validator: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, std::string::String> + Send + Sync + 'static,
    {
        self.inner = self.inner.validator(field, validator);
        self
    }

    pub fn check<F>(mut self, field: &str, predicate: F, message: Option<&str>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.inner = self.inner.check(field, predicate, message);
        self
    }

    pub fn base(mut self, base: &SchemaType) -> Self {
        self.inner = self.inner.base(base);
        self
    }

    pub fn build(self) -> Result<SchemaType, SchemaError> {
        self.inner.build()
    }
}

/// Starts a named record type.
pub fn model(name: &str) -> ModelBuilder {
    ModelBuilder {
        inner: Interface::new().name(name),
    }
}
