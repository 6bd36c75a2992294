use tme_types::{Point, TypeError, TypePath};
use tme_vars::VarsError;

/// Errors from map and environment operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The point lies outside the map.
    #[error("point {point} is outside the {width}x{height}x{depth} map")]
    OutOfBounds {
        point: Point,
        width: u32,
        height: u32,
        depth: u32,
    },

    /// A map needs at least one tile on every axis and at most
    /// `MAX_TILES` in total.
    #[error("invalid map dimensions {width}x{height}x{depth}")]
    InvalidDimensions { width: u32, height: u32, depth: u32 },

    /// The tile has no instance at the given index.
    #[error("no instance #{index} on tile {point}")]
    NoInstance { point: Point, index: usize },

    #[error("unknown type: {0}")]
    UnknownType(TypePath),

    #[error("type defined twice: {0}")]
    DuplicateType(TypePath),

    #[error(transparent)]
    Vars(#[from] VarsError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result alias for map operations.
pub type MapResult<T> = Result<T, MapError>;
