use tme_types::{Digest, StateId};
use tracing::debug;

use crate::error::{HistoryError, HistoryResult};
use crate::traits::{Fingerprint, Snapshot};

/// Label of the baseline entry.
pub const BASELINE_LABEL: &str = "initial";

/// One committed state.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerEntry<S> {
    pub id: StateId,
    /// Ledger position when this entry was committed. `None` for the
    /// baseline.
    pub parent: Option<StateId>,
    pub label: String,
    pub digest: Digest,
    pub state: S,
}

/// Append-only history of captured states.
///
/// Commits never remove or renumber entries, including commits made after
/// jumping back to an older id: the new entry records the id it branched
/// from as its `parent`, and every earlier entry stays reachable.
#[derive(Clone, Debug)]
pub struct HistoryLedger<S> {
    entries: Vec<LedgerEntry<S>>,
    current: StateId,
}

impl<S: Clone + Fingerprint> HistoryLedger<S> {
    /// Create a ledger whose baseline `s#0` is the current content of
    /// `target`.
    pub fn new<T>(target: &T) -> Self
    where
        T: Snapshot<State = S>,
    {
        let state = target.capture();
        let baseline = LedgerEntry {
            id: StateId::BASELINE,
            parent: None,
            label: BASELINE_LABEL.to_string(),
            digest: state.fingerprint(),
            state,
        };
        Self {
            entries: vec![baseline],
            current: StateId::BASELINE,
        }
    }

    /// Capture `target` as a new unlabeled entry.
    pub fn commit<T>(&mut self, target: &T) -> StateId
    where
        T: Snapshot<State = S>,
    {
        self.commit_labeled(target, "")
    }

    /// Capture `target` as a new entry and make it current.
    pub fn commit_labeled<T>(&mut self, target: &T, label: &str) -> StateId
    where
        T: Snapshot<State = S>,
    {
        let id = self.head().next();
        let state = target.capture();
        let digest = state.fingerprint();
        self.entries.push(LedgerEntry {
            id,
            parent: Some(self.current),
            label: label.to_string(),
            digest,
            state,
        });
        debug!(%id, parent = %self.current, digest = %digest.short_hex(), label, "state committed");
        self.current = id;
        id
    }

    /// Restore `target` to the content captured under `id`.
    ///
    /// Entries before and after `id` are kept; jumps may go in either
    /// direction.
    pub fn go_to<T>(&mut self, id: StateId, target: &mut T) -> HistoryResult<()>
    where
        T: Snapshot<State = S>,
    {
        let entry = self.entry(id).ok_or(HistoryError::OutOfRange {
            id,
            head: self.head(),
        })?;
        target.restore(&entry.state);
        debug!(from = %self.current, to = %id, "jumped to state");
        self.current = id;
        Ok(())
    }
}

impl<S> HistoryLedger<S> {
    /// The state the target was last committed or restored to.
    pub fn current(&self) -> StateId {
        self.current
    }

    /// The most recently committed id.
    pub fn head(&self) -> StateId {
        self.entries
            .last()
            .map(|entry| entry.id)
            .unwrap_or(StateId::BASELINE)
    }

    /// Number of entries, baseline included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a ledger holds at least its baseline.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, id: StateId) -> Option<&LedgerEntry<S>> {
        let index = usize::try_from(id.value()).ok()?;
        self.entries.get(index).filter(|entry| entry.id == id)
    }

    /// Captured content of `id`.
    pub fn state(&self, id: StateId) -> HistoryResult<&S> {
        self.entry(id)
            .map(|entry| &entry.state)
            .ok_or(HistoryError::OutOfRange {
                id,
                head: self.head(),
            })
    }

    /// The id `id` was committed on top of.
    pub fn parent_of(&self, id: StateId) -> HistoryResult<Option<StateId>> {
        self.entry(id)
            .map(|entry| entry.parent)
            .ok_or(HistoryError::OutOfRange {
                id,
                head: self.head(),
            })
    }

    pub fn entries(&self) -> &[LedgerEntry<S>] {
        &self.entries
    }

    /// Whether `id` has been committed.
    pub fn contains(&self, id: StateId) -> bool {
        self.entry(id).is_some()
    }
}
