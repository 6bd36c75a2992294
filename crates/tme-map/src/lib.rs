//! Map content for the tile map editor.
//!
//! # Model
//!
//! - An [`Environment`] holds the loaded types. Each [`Prototype`] owns the
//!   default variables of one type path, linked to the defaults of its
//!   nearest defined ancestor.
//! - An [`Instance`] is an immutable placement of a type with its own
//!   variable overrides, parented to the prototype's defaults.
//! - A [`Tile`] is an ordered stack of shared instances.
//! - A [`Map`] owns its tiles as `Arc<Tile>`. Editing a tile goes through
//!   `Arc::make_mut`, so a tile still referenced by a captured [`MapState`]
//!   is copied first and the capture never changes.
//!
//! [`Map`] implements [`tme_history::Snapshot`], so it can be committed to
//! and restored from a `HistoryLedger<MapState>`.

pub mod catalog;
pub mod environment;
pub mod error;
pub mod instance;
pub mod map;
pub mod tile;

pub use catalog::InstanceCatalog;
pub use environment::{Environment, EnvironmentBuilder, Prototype};
pub use error::{MapError, MapResult};
pub use instance::Instance;
pub use map::{Bounds, Map, MapState, MAX_TILES};
pub use tile::Tile;
