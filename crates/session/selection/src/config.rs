//! Session selection configuration.

use blockx_net_peer::LatencyTiers;
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::mode::SelectionMode;

/// Configuration fixed at session creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Strategy routing for this session.
    pub mode: SelectionMode,
    /// Latency-to-weight table for latency weighting.
    pub tiers: LatencyTiers,
    /// Seed for the weighted sampler. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl SelectionConfig {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tiers(mut self, tiers: LatencyTiers) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), SelectionError> {
        self.tiers.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockx_net_peer::TierError;

    #[test]
    fn test_default_is_valid() {
        let config = SelectionConfig::default();
        assert_eq!(config.mode, SelectionMode::Default);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_tiers_rejected() {
        let config = SelectionConfig::new(SelectionMode::ClosestWeighted)
            .with_tiers(LatencyTiers::default().with_slow_weight(0));
        assert_eq!(
            config.validate(),
            Err(SelectionError::Tiers(TierError::ZeroWeight { tier: "slow" }))
        );
    }

    #[test]
    fn test_from_toml() {
        let config: SelectionConfig = toml::from_str(
            r#"
            mode = "adaptive-strict"
            seed = 9

            [tiers]
            slow_weight = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, SelectionMode::AdaptiveStrict);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.tiers.slow_weight, 2);
        assert_eq!(config.tiers.excellent_weight, 8);
    }
}
