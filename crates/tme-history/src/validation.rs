use tme_types::StateId;

use crate::ledger::{HistoryLedger, LedgerEntry};
use crate::traits::Fingerprint;

/// Result of ledger validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub entry_count: u64,
    pub ids_dense: bool,
    pub parents_ordered: bool,
    pub digests_match: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub id: StateId,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    IdGap,
    MissingParent,
    ParentNotEarlier,
    DigestMismatch,
}

/// Ledger integrity validator.
pub struct LedgerValidator;

impl LedgerValidator {
    /// Validate every entry of a ledger.
    pub fn validate<S: Clone + Fingerprint>(ledger: &HistoryLedger<S>) -> ValidationReport {
        Self::validate_entries(ledger.entries())
    }

    /// Validate a sequence of entries: ids start at the baseline and have no
    /// gaps, every non-baseline entry names an earlier parent, and digests
    /// match the captured content.
    pub fn validate_entries<S: Fingerprint>(entries: &[LedgerEntry<S>]) -> ValidationReport {
        let mut violations = Vec::new();
        let mut ids_dense = true;
        let mut parents_ordered = true;
        let mut digests_match = true;

        for (index, entry) in entries.iter().enumerate() {
            let expected = StateId::new(index as u64);
            if entry.id != expected {
                ids_dense = false;
                violations.push(Violation {
                    id: entry.id,
                    kind: ViolationKind::IdGap,
                    description: format!("expected {expected}, found {}", entry.id),
                });
            }

            match entry.parent {
                None if !entry.id.is_baseline() => {
                    parents_ordered = false;
                    violations.push(Violation {
                        id: entry.id,
                        kind: ViolationKind::MissingParent,
                        description: "only the baseline may lack a parent".into(),
                    });
                }
                Some(parent) if parent >= entry.id => {
                    parents_ordered = false;
                    violations.push(Violation {
                        id: entry.id,
                        kind: ViolationKind::ParentNotEarlier,
                        description: format!("parent {parent} is not before {}", entry.id),
                    });
                }
                _ => {}
            }

            if entry.state.fingerprint() != entry.digest {
                digests_match = false;
                violations.push(Violation {
                    id: entry.id,
                    kind: ViolationKind::DigestMismatch,
                    description: "captured content does not match its digest".into(),
                });
            }
        }

        ValidationReport {
            entry_count: entries.len() as u64,
            ids_dense,
            parents_ordered,
            digests_match,
            violations,
        }
    }
}
