use tme_types::Digest;

/// Content fingerprint used to check that a restore reproduced a commit.
pub trait Fingerprint {
    fn fingerprint(&self) -> Digest;
}

/// Something whose content can be captured into a ledger and restored.
///
/// `capture` must not alias mutable live data: the returned state has to
/// stay unchanged whatever happens to `self` afterwards.
pub trait Snapshot {
    type State: Clone + Fingerprint;

    fn capture(&self) -> Self::State;

    fn restore(&mut self, state: &Self::State);
}
