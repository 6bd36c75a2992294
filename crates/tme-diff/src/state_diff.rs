//! Compare two captured map states.

use std::sync::Arc;

use tme_map::{Instance, MapState, Tile};
use tme_types::Point;

/// The result of comparing two map states.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapDiff {
    /// `true` when the states have different bounds. No tile changes are
    /// reported in that case; the whole map differs.
    pub resized: bool,
    pub changes: Vec<TileChange>,
}

impl MapDiff {
    pub fn is_empty(&self) -> bool {
        !self.resized && self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Distinct changed points, in tile order.
    pub fn points(&self) -> Vec<Point> {
        let mut points: Vec<Point> = Vec::new();
        for change in &self.changes {
            let point = change.point();
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
        points
    }

    pub fn additions(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, TileChange::Added { .. }))
            .count()
    }

    pub fn removals(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, TileChange::Removed { .. }))
            .count()
    }

    pub fn modifications(&self) -> usize {
        self.changes
            .iter()
            .filter(|c| matches!(c, TileChange::Modified { .. }))
            .count()
    }
}

/// A change at one position of a tile's instance stack.
#[derive(Clone, Debug, PartialEq)]
pub enum TileChange {
    /// Present only in the new state.
    Added {
        point: Point,
        index: usize,
        instance: Arc<Instance>,
    },
    /// Present only in the old state.
    Removed {
        point: Point,
        index: usize,
        instance: Arc<Instance>,
    },
    /// A different instance, or the same type with different overrides.
    Modified {
        point: Point,
        index: usize,
        old: Arc<Instance>,
        new: Arc<Instance>,
    },
}

impl TileChange {
    pub fn point(&self) -> Point {
        match self {
            TileChange::Added { point, .. }
            | TileChange::Removed { point, .. }
            | TileChange::Modified { point, .. } => *point,
        }
    }
}

/// Compute the diff between two captured states.
pub fn diff_states(old: &MapState, new: &MapState) -> MapDiff {
    if old.bounds() != new.bounds() {
        return MapDiff {
            resized: true,
            changes: Vec::new(),
        };
    }

    let mut changes = Vec::new();
    for ((point, old_tile), (_, new_tile)) in old.tiles().zip(new.tiles()) {
        if Arc::ptr_eq(old_tile, new_tile) {
            continue;
        }
        diff_tile(point, old_tile, new_tile, &mut changes);
    }
    MapDiff {
        resized: false,
        changes,
    }
}

fn diff_tile(point: Point, old: &Tile, new: &Tile, changes: &mut Vec<TileChange>) {
    for index in 0..old.len().max(new.len()) {
        match (old.get(index), new.get(index)) {
            (Some(a), Some(b)) => {
                if !Arc::ptr_eq(a, b) && !a.same_as(b) {
                    changes.push(TileChange::Modified {
                        point,
                        index,
                        old: Arc::clone(a),
                        new: Arc::clone(b),
                    });
                }
            }
            (Some(a), None) => changes.push(TileChange::Removed {
                point,
                index,
                instance: Arc::clone(a),
            }),
            (None, Some(b)) => changes.push(TileChange::Added {
                point,
                index,
                instance: Arc::clone(b),
            }),
            (None, None) => {}
        }
    }
}
