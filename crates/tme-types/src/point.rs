use std::fmt;

use serde::{Deserialize, Serialize};

/// A tile coordinate on a map.
///
/// Coordinates are 1-based on every axis, matching the world format: the
/// bottom-left tile of the first z-level is `(1, 1, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// A point on the first z-level.
    pub const fn flat(x: u32, y: u32) -> Self {
        Self { x, y, z: 1 }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(u32, u32, u32)> for Point {
    fn from((x, y, z): (u32, u32, u32)) -> Self {
        Self { x, y, z }
    }
}
