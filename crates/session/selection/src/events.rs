//! Selection events and non-blocking broadcast emitter.
//!
//! Telemetry collectors subscribe here; the tracker never waits on them.

use blockx_net_peer::PeerIdentity;
use tokio::sync::broadcast;

use crate::constants::DEFAULT_EVENT_CHANNEL_CAPACITY;
use crate::mode::Strategy;

/// Session selection events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent<Id: PeerIdentity> {
    /// `peer` delivered a block before anyone else.
    FirstResponse { peer: Id },
    /// `peer` was chosen to be queried next.
    PeerChosen { peer: Id, strategy: Strategy },
    /// `from` hit the streak cap and `to` took over.
    StreakEscalated { from: Id, to: Id },
}

impl<Id: PeerIdentity> SelectionEvent<Id> {
    pub fn peer(&self) -> &Id {
        match self {
            Self::FirstResponse { peer } | Self::PeerChosen { peer, .. } => peer,
            Self::StreakEscalated { to, .. } => to,
        }
    }
}

/// Non-blocking broadcast emitter. Slow subscribers drop events independently.
#[derive(Debug)]
pub struct EventEmitter<Id: PeerIdentity> {
    tx: broadcast::Sender<SelectionEvent<Id>>,
}

impl<Id: PeerIdentity> Clone for EventEmitter<Id> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<Id: PeerIdentity> Default for EventEmitter<Id> {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }
}

impl<Id: PeerIdentity> EventEmitter<Id> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn emit(&self, event: SelectionEvent<Id>) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SelectionEvent<Id>> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn first_response(&self, peer: Id) {
        self.emit(SelectionEvent::FirstResponse { peer });
    }

    pub fn peer_chosen(&self, peer: Id, strategy: Strategy) {
        self.emit(SelectionEvent::PeerChosen { peer, strategy });
    }

    pub fn streak_escalated(&self, from: Id, to: Id) {
        self.emit(SelectionEvent::StreakEscalated { from, to });
    }
}
