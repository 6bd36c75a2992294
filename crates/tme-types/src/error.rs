use thiserror::Error;

/// Errors produced by type operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid type path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },
}
