//! Distinct instances of one type across open maps.

use std::sync::Arc;

use tme_types::TypePath;

use crate::environment::Environment;
use crate::error::MapResult;
use crate::instance::Instance;
use crate::map::Map;

/// Shown for an instance without overrides.
pub const EMPTY_OVERRIDES: &str = "empty (instance with initial vars)";

/// The instances of a type a user can pick from.
///
/// The first entry is always the bare prototype instance. The rest are the
/// distinct variants found on the given maps, ordered by icon state, then by
/// number of overrides, then by name.
#[derive(Clone, Debug)]
pub struct InstanceCatalog {
    path: TypePath,
    entries: Vec<Arc<Instance>>,
}

impl InstanceCatalog {
    pub fn collect<'a>(
        env: &Environment,
        path: &TypePath,
        maps: impl IntoIterator<Item = &'a Map>,
    ) -> MapResult<Self> {
        let prototype = Arc::new(Instance::from_prototype(env.prototype(path)?));

        let mut variants: Vec<Arc<Instance>> = Vec::new();
        for map in maps {
            for (_, instance) in map.instances_of(path) {
                if instance.same_as(&prototype) || variants.iter().any(|v| v.same_as(instance)) {
                    continue;
                }
                variants.push(Arc::clone(instance));
            }
        }
        variants.sort_by(|a, b| {
            a.icon_state()
                .cmp(b.icon_state())
                .then(a.vars().len().cmp(&b.vars().len()))
                .then_with(|| a.name().cmp(b.name()))
        });

        let mut entries = Vec::with_capacity(variants.len() + 1);
        entries.push(prototype);
        entries.extend(variants);
        Ok(Self {
            path: path.clone(),
            entries,
        })
    }

    pub fn path(&self) -> &TypePath {
        &self.path
    }

    pub fn entries(&self) -> &[Arc<Instance>] {
        &self.entries
    }

    /// The bare prototype instance.
    pub fn prototype(&self) -> &Arc<Instance> {
        &self.entries[0]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of the entry with the same overrides as `instance`.
    pub fn position(&self, instance: &Instance) -> Option<usize> {
        self.entries.iter().position(|entry| entry.same_as(instance))
    }

    /// One `name: value` line per override.
    pub fn describe(instance: &Instance) -> Vec<String> {
        if instance.vars().is_empty() {
            return vec![EMPTY_OVERRIDES.to_string()];
        }
        instance
            .vars()
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Bounds;
    use crate::MapError;
    use tme_types::Point;
    use tme_vars::VariablesBuilder;

    fn path(s: &str) -> TypePath {
        TypePath::parse(s).unwrap()
    }

    fn env() -> Environment {
        let mut builder = Environment::builder("test");
        builder
            .define(path("/obj/sign"), [("name", "\"sign\"")].into_iter().collect())
            .unwrap()
            .define(path("/obj/lamp"), VariablesBuilder::new())
            .unwrap();
        builder.build().unwrap()
    }

    fn place(map: &mut Map, x: u32, instance: Instance) {
        map.tile_mut(Point::flat(x, 1)).unwrap().push(Arc::new(instance));
    }

    #[test]
    fn prototype_first_then_sorted_variants() {
        let env = env();
        let sign = env.prototype(&path("/obj/sign")).unwrap();
        let mut a = Map::new("a", Bounds::new(4, 1, 1).unwrap());
        let mut b = Map::new("b", Bounds::new(4, 1, 1).unwrap());

        place(&mut a, 1, Instance::with_overrides(sign, [("icon_state", "\"red\"")]));
        place(&mut a, 2, Instance::from_prototype(sign));
        place(&mut a, 3, Instance::with_overrides(sign, [("name", "\"zed\"")]));
        place(&mut b, 1, Instance::with_overrides(sign, [("name", "\"abe\"")]));
        place(&mut b, 2, Instance::with_overrides(sign, [("icon_state", "\"red\"")]));
        place(
            &mut b,
            3,
            Instance::with_overrides(sign, [("name", "\"abe\""), ("dir", "4")]),
        );

        let catalog = InstanceCatalog::collect(&env, &path("/obj/sign"), [&a, &b]).unwrap();
        let names: Vec<_> = catalog
            .entries()
            .iter()
            .map(|i| (i.icon_state(), i.vars().len(), i.name()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("", 0, "sign"),
                ("", 1, "abe"),
                ("", 1, "zed"),
                ("", 2, "abe"),
                ("red", 1, "sign"),
            ]
        );
        assert_eq!(catalog.position(&Instance::from_prototype(sign)), Some(0));
    }

    #[test]
    fn other_types_are_ignored() {
        let env = env();
        let lamp = env.prototype(&path("/obj/lamp")).unwrap();
        let mut map = Map::new("m", Bounds::new(2, 1, 1).unwrap());
        place(&mut map, 1, Instance::with_overrides(lamp, [("dir", "2")]));

        let catalog = InstanceCatalog::collect(&env, &path("/obj/sign"), [&map]).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.prototype().path(), &path("/obj/sign"));
    }

    #[test]
    fn unknown_type_fails() {
        let env = env();
        let err = InstanceCatalog::collect(&env, &path("/mob"), Vec::<&Map>::new()).unwrap_err();
        assert_eq!(err, MapError::UnknownType(path("/mob")));
    }

    #[test]
    fn describe_lists_overrides() {
        let env = env();
        let sign = env.prototype(&path("/obj/sign")).unwrap();
        assert_eq!(
            InstanceCatalog::describe(&Instance::from_prototype(sign)),
            vec![EMPTY_OVERRIDES]
        );
        let tagged = Instance::with_overrides(sign, [("name", "\"x\""), ("dir", "8")]);
        assert_eq!(
            InstanceCatalog::describe(&tagged),
            vec!["name: \"x\"", "dir: 8"]
        );
    }
}
