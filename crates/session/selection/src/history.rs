//! First-responder reputation.

use std::collections::HashMap;

use blockx_net_peer::PeerIdentity;

use crate::constants::COLD_START_WEIGHT;

/// How many times each peer was first to deliver a block this session.
///
/// Counts only grow. A peer without an entry has never been first.
#[derive(Debug, Clone)]
pub struct ResponseHistory<Id: PeerIdentity> {
    first_responses: HashMap<Id, u64>,
}

impl<Id: PeerIdentity> Default for ResponseHistory<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: PeerIdentity> ResponseHistory<Id> {
    pub fn new() -> Self {
        Self {
            first_responses: HashMap::new(),
        }
    }

    /// Credit `peer` with one first response and return its new count.
    pub fn record(&mut self, peer: Id) -> u64 {
        let count = self.first_responses.entry(peer).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// Recorded count, `None` if the peer was never first.
    pub fn count(&self, peer: &Id) -> Option<u64> {
        self.first_responses.get(peer).copied()
    }

    /// Reputation weight: the count, or [`COLD_START_WEIGHT`] for unknown peers.
    pub fn weight(&self, peer: &Id) -> u64 {
        self.count(peer).unwrap_or(COLD_START_WEIGHT)
    }

    pub fn len(&self) -> usize {
        self.first_responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_responses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Id, u64)> {
        self.first_responses.iter().map(|(peer, count)| (peer, *count))
    }
}
