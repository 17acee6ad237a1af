// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Immutable, chainable descriptions of a single field.
//!
//! A builder pairs an intended type with an ordered set of constraints, the
//! field metadata and a set of hooks. Every chain method copies the builder,
//! applies one change to the copy and returns it:
//!
//! ```text
//! let short = string().max(5);
//! let bounded = short.min(2);   // `short` still has no minimum
//! ```
//!
//! Container builders hold their children behind shared references, so copying
//! a builder only copies its own constraint state.

use crate::constraints::{ConstraintSet, Metadata};
use crate::error::SchemaError;
use crate::hooks::Hooks;
use crate::resolve::ResolveContext;
use crate::schema::{Field, Type};
use crate::*;

pub mod container;
pub mod primitive;

/// Accumulated state shared by every builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuilderState {
    pub constraints: ConstraintSet,
    pub meta: Metadata,
    pub hooks: Hooks,
}

impl BuilderState {
    /// Field of type `ty` carrying this state.
    pub(crate) fn field(&self, ty: Type) -> Field {
        Field {
            ty,
            constraints: self.constraints.clone(),
            meta: self.meta.clone(),
            hooks: self.hooks.clone(),
        }
    }
}

/// Anything that can be turned into a resolved [`Field`].
pub trait Resolve: fmt::Debug + Send + Sync {
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Field, SchemaError>;
}

/// Methods common to every builder.
pub trait TypeBuilder: Resolve + Clone + Sized + 'static {
    #[doc(hidden)]
    fn state(&self) -> &BuilderState;

    #[doc(hidden)]
    fn state_mut(&mut self) -> &mut BuilderState;

    /// Copy of the builder with `f` applied to the copy's state.
    fn with<F: FnOnce(&mut BuilderState)>(&self, f: F) -> Self {
        let mut next = self.clone();
        f(next.state_mut());
        next
    }

    fn constraints(&self) -> &ConstraintSet {
        &self.state().constraints
    }

    fn metadata(&self) -> &Metadata {
        &self.state().meta
    }

    fn hooks(&self) -> &Hooks {
        &self.state().hooks
    }

    /// Makes the field optional with the given default.
    fn default(&self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.with(|s| s.meta.default = Some(value))
    }

    /// Same as `default(Value::Null)`.
    fn optional(&self) -> Self {
        self.default(Value::Null)
    }

    /// Input key to read the field from.
    fn alias(&self, alias: &str) -> Self {
        self.with(|s| s.meta.alias = Some(alias.into()))
    }

    fn title(&self, title: &str) -> Self {
        self.with(|s| s.meta.title = Some(title.into()))
    }

    fn description(&self, description: &str) -> Self {
        self.with(|s| s.meta.description = Some(description.into()))
    }

    fn examples<I, V>(&self, examples: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let examples = examples.into_iter().map(Into::into).collect();
        self.with(|s| s.meta.examples = Some(examples))
    }

    fn deprecated(&self, deprecated: bool) -> Self {
        self.with(|s| s.meta.deprecated = deprecated)
    }
}

/// Implements the state accessors of [`TypeBuilder`] and the conversion into a
/// [`FieldDefinition`](crate::FieldDefinition) for a builder type.
///
/// # Arguments
/// * `$builder` - Builder type with a `state: BuilderState` member
macro_rules! impl_type_builder {
    ($($builder:ty),+ $(,)?) => {
        $(
            impl $crate::builders::TypeBuilder for $builder {
                fn state(&self) -> &$crate::builders::BuilderState {
                    &self.state
                }

                fn state_mut(&mut self) -> &mut $crate::builders::BuilderState {
                    &mut self.state
                }
            }

            impl From<$builder> for $crate::resolve::FieldDefinition {
                fn from(builder: $builder) -> Self {
                    $crate::resolve::FieldDefinition::Builder($crate::Rc::new(builder))
                }
            }

            impl From<&$builder> for $crate::resolve::FieldDefinition {
                fn from(builder: &$builder) -> Self {
                    $crate::resolve::FieldDefinition::Builder($crate::Rc::new(builder.clone()))
                }
            }
        )+
    };
}

pub(crate) use impl_type_builder;
