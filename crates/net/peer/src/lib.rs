//! Protocol-agnostic peer utilities consumed by exchange sessions.
//!
//! - [`traits`] - The [`PeerIdentity`] bound for opaque peer identifiers
//! - [`latency`] - The [`LatencyOracle`] boundary owned by the networking layer
//! - [`tier`] - Discrete latency tiers used as selection weights
//! - [`rtt`] - An in-memory oracle fed by round-trip samples

pub mod latency;
pub mod rtt;
pub mod tier;
pub mod traits;

pub use latency::{LatencyError, LatencyOracle};
pub use rtt::RttTable;
pub use tier::{
    DEFAULT_DISTANT_WEIGHT, DEFAULT_EXCELLENT_WEIGHT, DEFAULT_FAIR_WEIGHT, DEFAULT_GOOD_WEIGHT,
    DEFAULT_SLOW_TIER_WEIGHT, LatencyTiers, TierError,
};
pub use traits::PeerIdentity;
