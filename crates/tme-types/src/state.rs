use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a committed map state in the history ledger.
///
/// Ids are dense and strictly increasing: the baseline captured when a
/// ledger is created is `StateId(0)` and every commit takes the next value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(u64);

impl StateId {
    /// The baseline state id.
    pub const BASELINE: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The id following this one.
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// The id preceding this one, or `None` for the baseline.
    pub fn prev(&self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    pub const fn is_baseline(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s#{}", self.0)
    }
}

impl From<u64> for StateId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<StateId> for u64 {
    fn from(id: StateId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_has_no_predecessor() {
        assert!(StateId::BASELINE.is_baseline());
        assert_eq!(StateId::BASELINE.prev(), None);
    }

    #[test]
    fn next_and_prev_are_inverse() {
        let id = StateId::new(7);
        assert_eq!(id.next().prev(), Some(id));
        assert!(id < id.next());
    }

    #[test]
    fn display_and_serde() {
        assert_eq!(StateId::new(3).to_string(), "s#3");
        assert_eq!(serde_json::to_string(&StateId::new(3)).unwrap(), "3");
    }
}
