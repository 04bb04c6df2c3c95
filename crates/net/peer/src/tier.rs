//! Discrete latency tiers.
//!
//! A continuous round-trip estimate is bucketed into a small integer weight
//! so that nearer peers are preferred without excluding distant ones:
//!
//! | Latency                    | Weight                       |
//! |----------------------------|------------------------------|
//! | `< excellent_below`        | `excellent_weight` (8)       |
//! | `< good_below`             | `good_weight` (4)            |
//! | `< fair_below`             | `fair_weight` (2)            |
//! | `<= slow_up_to`            | `slow_weight` (1)            |
//! | `> slow_up_to` or unknown  | `distant_weight` (1)         |

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::latency::LatencyError;

/// Upper bound (exclusive) of the excellent tier.
pub const DEFAULT_EXCELLENT_BELOW: Duration = Duration::from_millis(51);
/// Upper bound (exclusive) of the good tier.
pub const DEFAULT_GOOD_BELOW: Duration = Duration::from_millis(100);
/// Upper bound (exclusive) of the fair tier.
pub const DEFAULT_FAIR_BELOW: Duration = Duration::from_millis(250);
/// Upper bound (inclusive) of the slow tier.
pub const DEFAULT_SLOW_UP_TO: Duration = Duration::from_millis(500);

pub const DEFAULT_EXCELLENT_WEIGHT: u64 = 8;
pub const DEFAULT_GOOD_WEIGHT: u64 = 4;
pub const DEFAULT_FAIR_WEIGHT: u64 = 2;
/// Weight of the `[250ms, 500ms]` band.
///
/// Equal to the distant weight: a slow peer is as good as an unmeasured one.
pub const DEFAULT_SLOW_TIER_WEIGHT: u64 = 1;
/// Weight beyond the slow tier, and for peers without a usable estimate.
pub const DEFAULT_DISTANT_WEIGHT: u64 = 1;

/// Invalid tier table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TierError {
    /// Bounds must be strictly increasing.
    #[error("tier bounds must be strictly increasing, got {lower:?} >= {upper:?}")]
    UnorderedBounds { lower: Duration, upper: Duration },

    /// A zero weight would make peers in that tier unselectable.
    #[error("{tier} tier weight must be nonzero")]
    ZeroWeight { tier: &'static str },
}

/// Latency bucket boundaries and their weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyTiers {
    pub excellent_below: Duration,
    pub good_below: Duration,
    pub fair_below: Duration,
    pub slow_up_to: Duration,
    pub excellent_weight: u64,
    pub good_weight: u64,
    pub fair_weight: u64,
    pub slow_weight: u64,
    pub distant_weight: u64,
}

impl Default for LatencyTiers {
    fn default() -> Self {
        Self {
            excellent_below: DEFAULT_EXCELLENT_BELOW,
            good_below: DEFAULT_GOOD_BELOW,
            fair_below: DEFAULT_FAIR_BELOW,
            slow_up_to: DEFAULT_SLOW_UP_TO,
            excellent_weight: DEFAULT_EXCELLENT_WEIGHT,
            good_weight: DEFAULT_GOOD_WEIGHT,
            fair_weight: DEFAULT_FAIR_WEIGHT,
            slow_weight: DEFAULT_SLOW_TIER_WEIGHT,
            distant_weight: DEFAULT_DISTANT_WEIGHT,
        }
    }
}

impl LatencyTiers {
    /// Override the weight of the `(fair_below, slow_up_to]` band.
    pub fn with_slow_weight(mut self, weight: u64) -> Self {
        self.slow_weight = weight;
        self
    }

    /// Weight for a measured latency.
    pub fn weight(&self, latency: Duration) -> u64 {
        if latency < self.excellent_below {
            self.excellent_weight
        } else if latency < self.good_below {
            self.good_weight
        } else if latency < self.fair_below {
            self.fair_weight
        } else if latency <= self.slow_up_to {
            self.slow_weight
        } else {
            self.distant_weight
        }
    }

    /// Weight for an oracle answer. Failures land in the distant tier.
    pub fn weight_for(&self, latency: &Result<Duration, LatencyError>) -> u64 {
        match latency {
            Ok(latency) => self.weight(*latency),
            Err(_) => self.distant_weight,
        }
    }

    pub fn validate(&self) -> Result<(), TierError> {
        let bounds = [
            self.excellent_below,
            self.good_below,
            self.fair_below,
            self.slow_up_to,
        ];
        for pair in bounds.windows(2) {
            if let &[lower, upper] = pair {
                if lower >= upper {
                    return Err(TierError::UnorderedBounds { lower, upper });
                }
            }
        }

        let weights = [
            ("excellent", self.excellent_weight),
            ("good", self.good_weight),
            ("fair", self.fair_weight),
            ("slow", self.slow_weight),
            ("distant", self.distant_weight),
        ];
        if let Some(&(tier, _)) = weights.iter().find(|(_, w)| *w == 0) {
            return Err(TierError::ZeroWeight { tier });
        }

        Ok(())
    }
}
