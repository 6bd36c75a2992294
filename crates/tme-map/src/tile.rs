use std::sync::{Arc, OnceLock};

use tme_types::Digest;

use crate::instance::Instance;

/// Instances stacked on one tile, bottom first.
///
/// The content digest is computed on first use and kept until the next
/// mutation, so tiles shared between captured states are hashed once.
#[derive(Clone, Debug, Default)]
pub struct Tile {
    content: Vec<Arc<Instance>>,
    digest: OnceLock<Digest>,
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Tile {
    pub fn new() -> Self {
        Self::default()
    }

    /// BLAKE3 digest of the instance paths and local variables, bottom first.
    pub fn digest(&self) -> Digest {
        *self.digest.get_or_init(|| {
            let mut hasher = blake3::Hasher::new();
            hasher.update(&(self.content.len() as u64).to_le_bytes());
            for instance in &self.content {
                hasher.update(instance.path().as_str().as_bytes());
                hasher.update(&[0]);
                hasher.update(&(instance.vars().len() as u64).to_le_bytes());
                for (name, value) in instance.vars().iter() {
                    hasher.update(name.as_bytes());
                    hasher.update(&[0]);
                    hasher.update(value.as_bytes());
                    hasher.update(&[0]);
                }
            }
            Digest::from(hasher.finalize())
        })
    }

    pub fn push(&mut self, instance: Arc<Instance>) {
        self.digest.take();
        self.content.push(instance);
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Instance>> {
        self.content.get(index)
    }

    /// Remove the instance at `index`, shifting the ones above it down.
    pub fn remove(&mut self, index: usize) -> Option<Arc<Instance>> {
        if index >= self.content.len() {
            return None;
        }
        self.digest.take();
        Some(self.content.remove(index))
    }

    /// Swap the instance at `index` for `instance`, returning the old one.
    pub fn replace(&mut self, index: usize, instance: Arc<Instance>) -> Option<Arc<Instance>> {
        let slot = self.content.get_mut(index)?;
        self.digest.take();
        Some(std::mem::replace(slot, instance))
    }

    pub fn instances(&self) -> &[Arc<Instance>] {
        &self.content
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Instance>> {
        self.content.iter()
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn clear(&mut self) {
        self.digest.take();
        self.content.clear();
    }
}
