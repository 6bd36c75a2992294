//! Foundation types for the tile map editor (TME).
//!
//! This crate provides the small value types shared by every other TME
//! crate. Nothing here owns map content; these are identifiers and
//! coordinates.
//!
//! # Key Types
//!
//! - [`Point`] -- 1-based tile coordinate on a map (`x`, `y`, `z`)
//! - [`StateId`] -- dense, monotonically increasing history state identifier
//! - [`TypePath`] -- slash-separated world-format type path (`/obj/item`)
//! - [`Digest`] -- BLAKE3 fingerprint of captured map content

pub mod digest;
pub mod error;
pub mod path;
pub mod point;
pub mod state;

pub use digest::Digest;
pub use error::TypeError;
pub use path::TypePath;
pub use point::Point;
pub use state::StateId;
