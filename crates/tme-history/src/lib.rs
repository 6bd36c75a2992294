//! Snapshot history for the tile map editor.
//!
//! A [`HistoryLedger`] is an append-only sequence of captured states. Each
//! entry is tagged with a dense, strictly increasing [`StateId`]; the
//! baseline captured at construction is `s#0`. The ledger can jump to any
//! committed id in either direction without removing entries.
//!
//! The ledger is generic over what it captures: anything implementing
//! [`Snapshot`] can be committed and restored. Captured states are expected
//! to share immutable data with the live value, so a commit costs a
//! structural copy rather than a deep one.
//!
//! - [`traits`] -- `Snapshot` and `Fingerprint`
//! - [`ledger`] -- `HistoryLedger` and `LedgerEntry`
//! - [`validation`] -- integrity checks over ledger entries

pub mod error;
pub mod ledger;
pub mod traits;
pub mod validation;

pub use error::{HistoryError, HistoryResult};
pub use ledger::{HistoryLedger, LedgerEntry};
pub use tme_types::StateId;
pub use traits::{Fingerprint, Snapshot};
pub use validation::{LedgerValidator, ValidationReport, Violation, ViolationKind};
