//! Collaborators the session talks to: the renderer and the instance picker.

use std::sync::Arc;

use tme_map::Instance;
use tme_types::Point;

/// Region of the map that needs repainting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Redraw {
    All,
    Points(Vec<Point>),
}

/// Receives repaint requests after the map changed.
pub trait RedrawHook {
    fn redraw(&mut self, region: &Redraw);
}

impl<F> RedrawHook for F
where
    F: FnMut(&Redraw),
{
    fn redraw(&mut self, region: &Redraw) {
        self(region)
    }
}

/// A hook for headless sessions.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRedraw;

impl RedrawHook for NoRedraw {
    fn redraw(&mut self, _region: &Redraw) {}
}

/// Source of the instance a paint stroke places.
pub trait SelectionProvider {
    fn selected_instance(&self) -> Option<Arc<Instance>>;

    fn has_selected_instance(&self) -> bool {
        self.selected_instance().is_some()
    }
}

/// The currently picked instance, if any.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    instance: Option<Arc<Instance>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, instance: Arc<Instance>) {
        self.instance = Some(instance);
    }

    pub fn clear(&mut self) {
        self.instance = None;
    }
}

impl SelectionProvider for Selection {
    fn selected_instance(&self) -> Option<Arc<Instance>> {
        self.instance.clone()
    }
}
