//! Anti-starvation cap for adaptive selection.
//!
//! While the session latency threshold is exceeded, adaptive modes route to
//! the nearest peer. Left alone, that hammers one peer for the rest of the
//! session. The streak tracks how many consecutive rounds the same peer won
//! and rotates to the runner-up once [`MAX_CONSECUTIVE_QUERIES`] is reached.
//!
//! ```text
//!  NoStreak ──winner X──▶ Streaking(X, 1) ──X──▶ … ──X──▶ Streaking(X, 4)
//!                              ▲  │                             │
//!                    winner Y  │  │ winner Y                    │ X again
//!                              │  ▼                             ▼
//!                         Streaking(Y, 1) ◀──────────── escalate to runner-up
//! ```

use blockx_net_peer::PeerIdentity;

use crate::constants::MAX_CONSECUTIVE_QUERIES;

/// Outcome of feeding one round's nearest peer into the streak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreakDecision<Id> {
    /// Same winner as last round, still under the cap.
    Continue(Id),
    /// New winner; the streak restarts on it.
    Adopt(Id),
    /// Winner hit the cap; the runner-up was adopted instead.
    Escalate { capped: Id, secondary: Id },
    /// Winner hit the cap and there is no runner-up. The streak is unchanged.
    Exhausted(Id),
}

impl<Id> StreakDecision<Id> {
    /// Peer chosen by the decision, if the streak settled it.
    pub fn chosen(&self) -> Option<&Id> {
        match self {
            Self::Continue(peer) | Self::Adopt(peer) => Some(peer),
            Self::Escalate { secondary, .. } => Some(secondary),
            Self::Exhausted(_) => None,
        }
    }
}

/// Most recently favoured peer and its run length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakState<Id: PeerIdentity> {
    last_winner: Option<Id>,
    consecutive: u8,
}

impl<Id: PeerIdentity> Default for StreakState<Id> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Id: PeerIdentity> StreakState<Id> {
    pub fn new() -> Self {
        Self {
            last_winner: None,
            consecutive: 0,
        }
    }

    pub fn last_winner(&self) -> Option<&Id> {
        self.last_winner.as_ref()
    }

    pub fn consecutive(&self) -> u8 {
        self.consecutive
    }

    /// No adaptive pick has been made yet.
    pub fn is_idle(&self) -> bool {
        self.last_winner.is_none()
    }

    pub fn is_capped(&self) -> bool {
        self.consecutive >= MAX_CONSECUTIVE_QUERIES
    }

    /// Advance with this round's nearest peer and the nearest other peer.
    pub fn advance(&mut self, winner: Id, secondary: Option<Id>) -> StreakDecision<Id> {
        if self.last_winner.as_ref() != Some(&winner) {
            self.restart(winner.clone());
            return StreakDecision::Adopt(winner);
        }

        if !self.is_capped() {
            self.consecutive += 1;
            return StreakDecision::Continue(winner);
        }

        match secondary {
            Some(secondary) => {
                self.restart(secondary.clone());
                StreakDecision::Escalate {
                    capped: winner,
                    secondary,
                }
            }
            None => StreakDecision::Exhausted(winner),
        }
    }

    pub fn reset(&mut self) {
        self.last_winner = None;
        self.consecutive = 0;
    }

    fn restart(&mut self, peer: Id) {
        self.last_winner = Some(peer);
        self.consecutive = 1;
    }
}
