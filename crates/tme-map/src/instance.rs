//! Placed instances of environment types.

use std::sync::Arc;

use tme_types::TypePath;
use tme_vars::{Variables, VariablesBuilder};

use crate::environment::Prototype;

pub const VAR_NAME: &str = "name";
pub const VAR_ICON_STATE: &str = "icon_state";

/// An instance of a type placed on a tile.
///
/// Instances are immutable. Local variables override the type defaults the
/// store is parented to; editing produces a new instance sharing those
/// defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    path: TypePath,
    vars: Arc<Variables>,
}

impl Instance {
    pub fn new(path: TypePath, vars: Arc<Variables>) -> Self {
        Self { path, vars }
    }

    /// An instance with no overrides of its own.
    pub fn from_prototype(prototype: &Prototype) -> Self {
        Self {
            path: prototype.path().clone(),
            vars: Arc::new(Variables::from_parent(Arc::clone(prototype.vars()))),
        }
    }

    /// An instance overriding the prototype defaults with `overrides`.
    pub fn with_overrides<I, K, V>(prototype: &Prototype, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut builder = VariablesBuilder::with_parent(Arc::clone(prototype.vars()));
        builder.extend(overrides);
        Self {
            path: prototype.path().clone(),
            vars: Arc::new(builder.freeze()),
        }
    }

    pub fn path(&self) -> &TypePath {
        &self.path
    }

    pub fn vars(&self) -> &Arc<Variables> {
        &self.vars
    }

    /// A copy of this instance with its variables rebuilt by `edit`.
    ///
    /// The builder starts from this instance's overrides and parent.
    pub fn edit(&self, edit: impl FnOnce(&mut VariablesBuilder)) -> Self {
        let mut builder = self.vars.to_builder();
        edit(&mut builder);
        Self {
            path: self.path.clone(),
            vars: Arc::new(builder.freeze()),
        }
    }

    /// Display name: the `name` variable, or the last path segment.
    pub fn name(&self) -> &str {
        self.vars
            .text(VAR_NAME)
            .unwrap_or_else(|| self.path.name())
    }

    pub fn icon_state(&self) -> &str {
        self.vars.text(VAR_ICON_STATE).unwrap_or("")
    }

    /// `true` if both instances have the same type and the same overrides.
    pub fn same_as(&self, other: &Instance) -> bool {
        self.path == other.path && self.vars.same_locals(&other.vars)
    }
}
