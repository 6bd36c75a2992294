//! Instance variables for the tile map editor.
//!
//! Every type in an environment and every instance placed on a map carries a
//! set of variables: raw world-format literals keyed by name. A
//! [`Variables`] store is immutable once frozen and may point at a parent
//! store holding the defaults it inherits, forming a resolution chain from an
//! instance through its type up to the root type.
//!
//! Stores are only ever populated through a [`VariablesBuilder`]. Editing an
//! instance means seeding a builder from its current store, applying the
//! edits, and freezing a replacement; the old store stays valid. This is what
//! lets history snapshots hold plain `Arc<Variables>` references.
//!
//! # Modules
//!
//! - [`variables`] -- the frozen store and its typed accessors
//! - [`builder`] -- the mutable staging builder
//! - [`error`] -- defect errors raised by misuse of the store

pub mod builder;
pub mod error;
pub mod variables;

pub use builder::VariablesBuilder;
pub use error::{VarsError, VarsResult};
pub use variables::{Resolved, Variables, NULL_VALUE};
