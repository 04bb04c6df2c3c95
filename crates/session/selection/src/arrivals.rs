//! First-arrival filter for block deliveries.
//!
//! Several peers may answer the same want. Only the earliest copy of a block
//! may credit its sender, so duplicates are filtered here before they reach
//! the tracker.

use std::collections::HashSet;
use std::hash::Hash;

use blockx_net_peer::{LatencyOracle, PeerIdentity};
use parking_lot::Mutex;
use tracing::trace;

use crate::tracker::PeerResponseTracker;

/// Blocks already received this session.
#[derive(Debug)]
pub struct ArrivalLedger<B> {
    seen: Mutex<HashSet<B>>,
}

impl<B: Eq + Hash> Default for ArrivalLedger<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Eq + Hash> ArrivalLedger<B> {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Mark `block` as received. Returns `true` only for its first arrival.
    pub fn observe(&self, block: B) -> bool {
        self.seen.lock().insert(block)
    }

    /// Credit `peer` on `tracker` if this is the first copy of `block`.
    pub fn record_arrival<Id, O>(
        &self,
        block: B,
        peer: Id,
        tracker: &PeerResponseTracker<Id, O>,
    ) -> bool
    where
        Id: PeerIdentity,
        O: LatencyOracle<Id>,
    {
        let first = self.observe(block);
        if first {
            tracker.record_first_response(peer);
        } else {
            trace!(?peer, "duplicate block arrival, not credited");
        }
        first
    }

    pub fn contains(&self, block: &B) -> bool {
        self.seen.lock().contains(block)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::SelectionMode;
    use blockx_net_peer::RttTable;

    #[test]
    fn test_observe_once() {
        let ledger = ArrivalLedger::new();
        assert!(ledger.observe("block-a"));
        assert!(!ledger.observe("block-a"));
        assert!(ledger.observe("block-b"));
        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains(&"block-a"));
    }

    #[test]
    fn test_duplicates_not_credited() {
        let tracker = PeerResponseTracker::new(SelectionMode::Default, RttTable::<u64>::new());
        let ledger = ArrivalLedger::new();

        assert!(ledger.record_arrival([1u8; 32], 7, &tracker));
        assert!(!ledger.record_arrival([1u8; 32], 8, &tracker));
        assert!(!ledger.record_arrival([1u8; 32], 7, &tracker));
        assert!(ledger.record_arrival([2u8; 32], 7, &tracker));

        assert_eq!(tracker.weight(&7), 2);
        assert_eq!(tracker.weight(&8), 1);
        let history = tracker.history();
        assert_eq!(history.len(), 1);
    }
}
