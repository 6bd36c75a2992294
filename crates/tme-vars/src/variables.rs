//! The frozen variable store.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;

use crate::builder::VariablesBuilder;
use crate::error::{VarsError, VarsResult};

/// World-format literal for "value explicitly absent".
pub const NULL_VALUE: &str = "null";

/// Immutable variables of a type or an instance.
///
/// Values are stored as raw literal text. A name without a local value is
/// resolved through `parent`, recursively, until a store without a parent
/// reports it missing.
///
/// The only way to fill a store is [`VariablesBuilder::freeze`]. The parent
/// handle is shared, never owned exclusively: many instances point at the
/// same type defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Variables {
    names: Vec<String>,
    vars: HashMap<String, String>,
    parent: Option<Arc<Variables>>,
}

/// A value found by [`Variables::resolve`] together with the chain depth it
/// came from (`0` is the store itself, `1` its parent, and so on).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolved<'a> {
    pub value: &'a str,
    pub depth: usize,
}

impl Variables {
    /// An empty store with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store that inherits everything from `parent`.
    pub fn from_parent(parent: Arc<Variables>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub(crate) fn from_parts(
        names: Vec<String>,
        vars: HashMap<String, String>,
        parent: Option<Arc<Variables>>,
    ) -> Self {
        Self {
            names,
            vars,
            parent,
        }
    }

    /// A builder seeded with a copy of the local values and the same parent.
    pub fn to_builder(&self) -> VariablesBuilder {
        VariablesBuilder::from_parts(self.names.clone(), self.vars.clone(), self.parent.clone())
    }

    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub fn parent(&self) -> Option<&Arc<Variables>> {
        self.parent.as_ref()
    }

    /// Attach a parent to a store that has none.
    ///
    /// A store's parent is set at most once. A second call is a defect in the
    /// caller: it is logged, the store is left untouched, and
    /// [`VarsError::ParentAlreadyLinked`] is returned.
    pub fn link_parent(&mut self, parent: Arc<Variables>) -> VarsResult<()> {
        if self.parent.is_some() {
            error!("linking a parent to occupied variables is prohibited");
            return Err(VarsError::ParentAlreadyLinked);
        }
        self.parent = Some(parent);
        Ok(())
    }

    /// Local names in first-insertion order. Inherited names are not listed.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Local `(name, value)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(|name| (name.as_str(), self.vars[name].as_str()))
    }

    /// Number of local values.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `true` if `name` has a local value in this store.
    pub fn contains_local(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Raw literal of `name`, resolved through the parent chain.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.resolve(name).map(|r| r.value)
    }

    /// Like [`Variables::value`], but also reports the depth of the store
    /// that held the value.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
        let mut store = self;
        let mut depth = 0;
        loop {
            if let Some(value) = store.vars.get(name) {
                return Some(Resolved {
                    value: value.as_str(),
                    depth,
                });
            }
            store = store.parent.as_deref()?;
            depth += 1;
        }
    }

    /// Text value of `name`.
    ///
    /// Literals longer than one character lose their first and last
    /// character, which are the delimiters of string (`"..."`) and resource
    /// (`'...'`) literals. A one-character literal is returned as-is.
    /// Missing values and `null` yield `None`.
    pub fn text(&self, name: &str) -> Option<&str> {
        let value = self.non_null(name)?;
        let mut chars = value.char_indices();
        match (chars.next(), chars.next_back()) {
            (Some((_, first)), Some((last, _))) => Some(&value[first.len_utf8()..last]),
            _ => Some(value),
        }
    }

    /// Floating point value of `name`. Missing, `null`, malformed and
    /// out-of-range values all yield `None`. The literals `inf` and
    /// `infinity` still decode to infinity.
    pub fn float(&self, name: &str) -> Option<f32> {
        let raw = self.non_null(name)?;
        let value = raw.parse::<f32>().ok()?;
        if value.is_infinite() && !is_infinity_literal(raw) {
            return None;
        }
        Some(value)
    }

    /// Base-10 integer value of `name`. Missing, `null`, malformed and
    /// out-of-range values all yield `None`.
    pub fn int(&self, name: &str) -> Option<i32> {
        self.non_null(name)?.parse::<i32>().ok()
    }

    /// `true` if both stores have the same local values in the same order.
    /// Parents are not compared.
    pub fn same_locals(&self, other: &Variables) -> bool {
        self.names == other.names && self.vars == other.vars
    }

    fn non_null(&self, name: &str) -> Option<&str> {
        self.value(name).filter(|value| *value != NULL_VALUE)
    }
}

fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
