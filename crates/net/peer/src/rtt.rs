//! In-memory latency oracle fed by round-trip samples.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::trace;

use crate::latency::{LatencyError, LatencyOracle};
use crate::traits::PeerIdentity;

#[derive(Debug, Default, Clone, Copy)]
struct RttSamples {
    sum_nanos: u128,
    count: u32,
}

impl RttSamples {
    fn record(&mut self, rtt: Duration) {
        self.sum_nanos = self.sum_nanos.saturating_add(rtt.as_nanos());
        self.count = self.count.saturating_add(1);
    }

    fn average(&self) -> Option<Duration> {
        if self.count == 0 {
            return None;
        }
        let avg = self.sum_nanos / u128::from(self.count);
        Some(Duration::from_nanos(u64::try_from(avg).unwrap_or(u64::MAX)))
    }
}

/// Per-peer round-trip averages.
///
/// Peers without samples answer [`LatencyError::Unmeasured`].
#[derive(Debug)]
pub struct RttTable<Id: PeerIdentity> {
    peers: RwLock<HashMap<Id, RttSamples>>,
}

impl<Id: PeerIdentity> Default for RttTable<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: PeerIdentity> RttTable<Id> {
    pub fn new() -> Self {
        Self {
            peers: RwLock::new(HashMap::new()),
        }
    }

    /// Record one round-trip sample for `peer`.
    pub fn record(&self, peer: Id, rtt: Duration) {
        trace!(?peer, ?rtt, "recording rtt sample");
        self.peers.write().entry(peer).or_default().record(rtt);
    }

    /// Mean of all samples recorded for `peer`.
    pub fn average(&self, peer: &Id) -> Option<Duration> {
        self.peers.read().get(peer).and_then(RttSamples::average)
    }

    pub fn samples(&self, peer: &Id) -> u32 {
        self.peers.read().get(peer).map(|s| s.count).unwrap_or(0)
    }

    /// Forget all samples for `peer`.
    pub fn remove(&self, peer: &Id) -> bool {
        self.peers.write().remove(peer).is_some()
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}

impl<Id: PeerIdentity> LatencyOracle<Id> for RttTable<Id> {
    fn latency(&self, peer: &Id) -> Result<Duration, LatencyError> {
        self.average(peer).ok_or(LatencyError::Unmeasured)
    }
}
