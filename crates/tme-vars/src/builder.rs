//! Mutable staging area for [`Variables`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::variables::Variables;

/// Accumulates variable edits and freezes them into an immutable
/// [`Variables`] store.
///
/// `freeze` consumes the builder, so nothing done afterwards can reach the
/// frozen store.
#[derive(Clone, Debug, Default)]
pub struct VariablesBuilder {
    names: Vec<String>,
    vars: HashMap<String, String>,
    parent: Option<Arc<Variables>>,
}

impl VariablesBuilder {
    /// An empty builder with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty builder whose frozen store will inherit from `parent`.
    pub fn with_parent(parent: Arc<Variables>) -> Self {
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

    /// Insert or overwrite a raw literal.
    ///
    /// The first write of a name appends it to the order list; later writes
    /// only replace the value.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        if !self.vars.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.vars.insert(name, value);
        self
    }

    /// Drop a local value so the frozen store inherits it again. Returns the
    /// removed literal.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let removed = self.vars.remove(name)?;
        self.names.retain(|n| n != name);
        Some(removed)
    }

    /// Local literal staged for `name`. The parent is not consulted.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn parent(&self) -> Option<&Arc<Variables>> {
        self.parent.as_ref()
    }

    /// Freeze the staged values into an immutable store.
    pub fn freeze(self) -> Variables {
        Variables::from_parts(self.names, self.vars, self.parent)
    }
}

impl<K, V> FromIterator<(K, V)> for VariablesBuilder
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

impl<K, V> Extend<(K, V)> for VariablesBuilder
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.put(name, value);
        }
    }
}
