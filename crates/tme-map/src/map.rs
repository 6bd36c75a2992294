//! Maps and their captured states.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tme_history::{Fingerprint, Snapshot};
use tme_types::{Digest, Point, TypePath};
use tracing::{debug, info};

use crate::error::{MapError, MapResult};
use crate::instance::Instance;
use crate::tile::Tile;

/// Domain separator for state fingerprints.
const STATE_DIGEST_PREFIX: &[u8] = b"tme-state-v1:";

/// Largest number of tiles a map may hold.
pub const MAX_TILES: usize = 1 << 22;

/// Map dimensions, in tiles.
///
/// Always at least one tile on every axis and at most [`MAX_TILES`] in
/// total. Deserializing goes through the same check as [`Bounds::new`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Dimensions", into = "Dimensions")]
pub struct Bounds {
    width: u32,
    height: u32,
    depth: u32,
}

/// Unchecked wire form of [`Bounds`].
#[derive(Clone, Copy, Serialize, Deserialize)]
struct Dimensions {
    width: u32,
    height: u32,
    depth: u32,
}

impl Bounds {
    pub fn new(width: u32, height: u32, depth: u32) -> MapResult<Self> {
        let tiles = (width as usize)
            .checked_mul(height as usize)
            .and_then(|tiles| tiles.checked_mul(depth as usize));
        match tiles {
            Some(1..=MAX_TILES) => Ok(Self {
                width,
                height,
                depth,
            }),
            _ => Err(MapError::InvalidDimensions {
                width,
                height,
                depth,
            }),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn contains(&self, point: Point) -> bool {
        (1..=self.width).contains(&point.x)
            && (1..=self.height).contains(&point.y)
            && (1..=self.depth).contains(&point.z)
    }

    /// Row-major tile index of a 1-based point.
    pub fn index(&self, point: Point) -> MapResult<usize> {
        if !self.contains(point) {
            return Err(MapError::OutOfBounds {
                point,
                width: self.width,
                height: self.height,
                depth: self.depth,
            });
        }
        let (x, y, z) = (
            (point.x - 1) as usize,
            (point.y - 1) as usize,
            (point.z - 1) as usize,
        );
        let (w, h) = (self.width as usize, self.height as usize);
        Ok((z * h + y) * w + x)
    }

    /// Number of tiles.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Every point in index order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let Bounds {
            width,
            height,
            depth,
        } = *self;
        (1..=depth).flat_map(move |z| {
            (1..=height).flat_map(move |y| (1..=width).map(move |x| Point::new(x, y, z)))
        })
    }
}

impl TryFrom<Dimensions> for Bounds {
    type Error = MapError;

    fn try_from(dims: Dimensions) -> MapResult<Self> {
        Bounds::new(dims.width, dims.height, dims.depth)
    }
}

impl From<Bounds> for Dimensions {
    fn from(bounds: Bounds) -> Self {
        Dimensions {
            width: bounds.width,
            height: bounds.height,
            depth: bounds.depth,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            depth: 1,
        }
    }
}

/// A map being edited.
///
/// Tiles are held as `Arc<Tile>`. A tile shared with a captured
/// [`MapState`] is copied on its first mutation.
#[derive(Clone, Debug)]
pub struct Map {
    name: String,
    bounds: Bounds,
    tiles: Vec<Arc<Tile>>,
}

impl Map {
    /// An empty map. Every tile starts out sharing the same empty tile.
    pub fn new(name: impl Into<String>, bounds: Bounds) -> Self {
        let name = name.into();
        info!(map = %name, width = bounds.width, height = bounds.height, depth = bounds.depth, "map created");
        Self {
            name,
            bounds,
            tiles: vec![Arc::new(Tile::new()); bounds.area()],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }

    pub fn tile(&self, point: Point) -> MapResult<&Tile> {
        let index = self.bounds.index(point)?;
        Ok(&self.tiles[index])
    }

    /// Mutable access to a tile, copying it first if a capture shares it.
    pub fn tile_mut(&mut self, point: Point) -> MapResult<&mut Tile> {
        let index = self.bounds.index(point)?;
        Ok(Arc::make_mut(&mut self.tiles[index]))
    }

    /// The instance at `index` on the tile at `point`.
    pub fn instance(&self, point: Point, index: usize) -> MapResult<&Arc<Instance>> {
        self.tile(point)?
            .get(index)
            .ok_or(MapError::NoInstance { point, index })
    }

    pub fn points(&self) -> impl Iterator<Item = Point> {
        self.bounds.points()
    }

    /// Every placed instance of exactly `path`, in tile order.
    pub fn instances_of<'a>(
        &'a self,
        path: &'a TypePath,
    ) -> impl Iterator<Item = (Point, &'a Arc<Instance>)> + 'a {
        self.points()
            .zip(self.tiles.iter())
            .flat_map(move |(point, tile)| {
                tile.iter()
                    .filter(move |instance| instance.path() == path)
                    .map(move |instance| (point, instance))
            })
    }

    /// Structural copy of the current content.
    pub fn capture(&self) -> MapState {
        MapState {
            bounds: self.bounds,
            tiles: self.tiles.clone(),
        }
    }

    /// Replace the content with a captured state.
    pub fn restore(&mut self, state: &MapState) {
        self.bounds = state.bounds;
        self.tiles = state.tiles.clone();
        debug!(map = %self.name, "map restored");
    }
}

impl Snapshot for Map {
    type State = MapState;

    fn capture(&self) -> MapState {
        Map::capture(self)
    }

    fn restore(&mut self, state: &MapState) {
        Map::restore(self, state)
    }
}

/// Captured map content.
///
/// Shares its tiles with the map it came from; they are never mutated in
/// place afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct MapState {
    bounds: Bounds,
    tiles: Vec<Arc<Tile>>,
}

impl MapState {
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn tile(&self, point: Point) -> Option<&Arc<Tile>> {
        let index = self.bounds.index(point).ok()?;
        self.tiles.get(index)
    }

    /// Points paired with their tiles, in index order.
    pub fn tiles(&self) -> impl Iterator<Item = (Point, &Arc<Tile>)> {
        self.bounds.points().zip(self.tiles.iter())
    }

    /// Total number of placed instances.
    pub fn instance_count(&self) -> usize {
        self.tiles.iter().map(|tile| tile.len()).sum()
    }
}

impl Fingerprint for MapState {
    /// Combines the per-tile digests, so only tiles changed since they were
    /// last hashed are read again.
    fn fingerprint(&self) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(STATE_DIGEST_PREFIX);
        for dim in [self.bounds.width, self.bounds.height, self.bounds.depth] {
            hasher.update(&dim.to_le_bytes());
        }
        for tile in &self.tiles {
            hasher.update(tile.digest().as_bytes());
        }
        Digest::from(hasher.finalize())
    }
}
