//! Per-session peer selection for block exchange.
//!
//! Given candidate peers believed to hold a wanted block, decide which one
//! to query next. Selection blends two signals:
//!
//! - **First-responder history**: how often each peer delivered a block
//!   before anyone else this session ([`ResponseHistory`])
//! - **Latency tiers**: round-trip estimates from the networking layer's
//!   [`LatencyOracle`](blockx_net_peer::LatencyOracle), bucketed into weights
//!
//! # Components
//!
//! - [`PeerResponseTracker`] - Session entry point; routes each pick by [`SelectionMode`]
//! - [`WeightedSampler`] - Proportional random selection
//! - [`StreakState`] - Caps consecutive adaptive picks of one peer
//! - [`ArrivalLedger`] - Credits only the first copy of each block
//! - [`EventEmitter`] - Broadcasts [`SelectionEvent`]s to telemetry subscribers
//!
//! # Usage
//!
//! ```ignore
//! let tracker = PeerResponseTracker::new(SelectionMode::AdaptiveStrict, rtt_table);
//!
//! // A block arrived: credit the sender only if it was the first copy.
//! ledger.record_arrival(cid, peer, &tracker);
//!
//! // Pick who to ask next.
//! if let Some(peer) = tracker.choose(&providers, session_is_slow) {
//!     send_want(peer, cid);
//! }
//! ```

mod arrivals;
mod config;
mod error;
mod history;
mod metrics;
mod mode;
mod sampler;
mod streak;
mod tracker;

pub mod args;
pub mod constants;
pub mod events;
pub mod score;

pub use args::SelectionArgs;
pub use arrivals::ArrivalLedger;
pub use config::SelectionConfig;
pub use constants::{COLD_START_WEIGHT, MAX_CONSECUTIVE_QUERIES};
pub use error::SelectionError;
pub use events::{EventEmitter, SelectionEvent};
pub use history::ResponseHistory;
pub use mode::{SelectionMode, Strategy};
pub use sampler::WeightedSampler;
pub use streak::{StreakDecision, StreakState};
pub use tracker::PeerResponseTracker;
