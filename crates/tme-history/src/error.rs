use tme_types::StateId;

/// Errors produced by history ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("state {id} was never committed (head is {head})")]
    OutOfRange { id: StateId, head: StateId },
}

pub type HistoryResult<T> = Result<T, HistoryError>;
