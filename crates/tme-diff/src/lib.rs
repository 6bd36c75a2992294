//! Diff between two captured map states.
//!
//! Used to find the tiles that need redrawing after a jump through history.
//! Tiles still shared by both states (`Arc::ptr_eq`) are skipped without
//! looking at their content; the rest are compared instance by instance.
//!
//! - [`MapDiff`] / [`TileChange`] -- instance-level changes, keyed by point

pub mod state_diff;

pub use state_diff::{diff_states, MapDiff, TileChange};
