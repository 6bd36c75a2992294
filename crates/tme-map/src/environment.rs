//! Loaded types and their default variables.

use std::collections::BTreeMap;
use std::sync::Arc;

use tme_types::TypePath;
use tme_vars::{Variables, VariablesBuilder};
use tracing::{debug, info};

use crate::error::{MapError, MapResult};

/// A type of the environment together with its default variables.
#[derive(Debug, PartialEq)]
pub struct Prototype {
    path: TypePath,
    vars: Arc<Variables>,
}

impl Prototype {
    pub fn path(&self) -> &TypePath {
        &self.path
    }

    /// Defaults of this type, chained to the defaults of its ancestors.
    pub fn vars(&self) -> &Arc<Variables> {
        &self.vars
    }
}

/// The set of types a map can place.
#[derive(Debug, Default)]
pub struct Environment {
    name: String,
    types: BTreeMap<TypePath, Arc<Prototype>>,
}

impl Environment {
    pub fn builder(name: impl Into<String>) -> EnvironmentBuilder {
        EnvironmentBuilder {
            name: name.into(),
            types: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, path: &TypePath) -> Option<&Arc<Prototype>> {
        self.types.get(path)
    }

    /// Like [`Environment::get`], failing with [`MapError::UnknownType`].
    pub fn prototype(&self, path: &TypePath) -> MapResult<&Arc<Prototype>> {
        self.get(path)
            .ok_or_else(|| MapError::UnknownType(path.clone()))
    }

    /// Every type, in path order.
    pub fn prototypes(&self) -> impl Iterator<Item = &Arc<Prototype>> {
        self.types.values()
    }

    /// `path` and every defined type beneath it, in path order.
    pub fn subtypes_of<'a>(
        &'a self,
        path: &'a TypePath,
    ) -> impl Iterator<Item = &'a Arc<Prototype>> + 'a {
        self.types
            .range(path.clone()..)
            .take_while(move |(p, _)| p.as_str().starts_with(path.as_str()))
            .filter(move |(p, _)| p.is_subtype_of(path))
            .map(|(_, proto)| proto)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Collects type definitions and links their defaults into chains.
#[derive(Debug)]
pub struct EnvironmentBuilder {
    name: String,
    types: BTreeMap<TypePath, VariablesBuilder>,
}

impl EnvironmentBuilder {
    /// Stage the defaults of `path`. The builder must not carry a parent;
    /// parents are linked from the type hierarchy in [`EnvironmentBuilder::build`].
    pub fn define(&mut self, path: TypePath, vars: VariablesBuilder) -> MapResult<&mut Self> {
        if self.types.contains_key(&path) {
            return Err(MapError::DuplicateType(path));
        }
        self.types.insert(path, vars);
        Ok(self)
    }

    /// Freeze every type's defaults and link each one to the defaults of its
    /// nearest defined ancestor.
    pub fn build(self) -> MapResult<Environment> {
        let mut built: BTreeMap<TypePath, Arc<Prototype>> = BTreeMap::new();

        // A path sorts after all of its ancestors, so parents are built first.
        for (path, builder) in self.types {
            let mut vars = builder.freeze();
            if let Some(ancestor) = path.ancestors().find_map(|a| built.get(&a)) {
                vars.link_parent(Arc::clone(ancestor.vars()))?;
                debug!(%path, parent = %ancestor.path(), "linked type defaults");
            }
            let prototype = Prototype {
                path: path.clone(),
                vars: Arc::new(vars),
            };
            built.insert(path, Arc::new(prototype));
        }

        info!(environment = %self.name, types = built.len(), "environment built");
        Ok(Environment {
            name: self.name,
            types: built,
        })
    }
}
