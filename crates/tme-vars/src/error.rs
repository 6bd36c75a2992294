//! Error types for variable stores.
//!
//! Lookups never fail: a missing or malformed value is reported as `None`.
//! The only error is a defect in how a store is wired into a chain.

use thiserror::Error;

/// Errors raised by invalid use of a [`crate::Variables`] store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VarsError {
    /// A parent was linked to a store that already has one. This is a caller
    /// bug: the parent of a store is set at most once.
    #[error("defect: linking a parent to variables that already have one is prohibited")]
    ParentAlreadyLinked,
}

/// Convenience type alias for variable store operations.
pub type VarsResult<T> = std::result::Result<T, VarsError>;
