//! CLI arguments for peer selection configuration.

use blockx_net_peer::{DEFAULT_SLOW_TIER_WEIGHT, LatencyTiers};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::config::SelectionConfig;
use crate::error::SelectionError;
use crate::mode::SelectionMode;

/// Peer selection CLI arguments.
#[derive(Debug, Args, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[command(next_help_heading = "Peer Selection")]
#[serde(default)]
pub struct SelectionArgs {
    /// Provider selection mode
    ///
    /// - default: weight peers by how often they delivered first
    /// - closest-weighted: weight peers by latency tier
    /// - adaptive-strict: default, then nearest peer once the session is slow
    /// - adaptive-with-default-fallback: closest-weighted, then nearest peer once the session is slow
    #[arg(long = "selection.mode", value_enum, default_value_t = SelectionMode::Default)]
    pub mode: SelectionMode,

    /// Weight of peers measured between 250ms and 500ms
    #[arg(long = "selection.slow-tier-weight", default_value_t = DEFAULT_SLOW_TIER_WEIGHT)]
    pub slow_tier_weight: u64,

    /// Seed for reproducible sampling
    #[arg(long = "selection.seed")]
    pub seed: Option<u64>,
}

impl Default for SelectionArgs {
    fn default() -> Self {
        Self {
            mode: SelectionMode::default(),
            slow_tier_weight: DEFAULT_SLOW_TIER_WEIGHT,
            seed: None,
        }
    }
}

impl SelectionArgs {
    /// Validate argument combinations.
    pub fn validate(&self) -> Result<(), SelectionError> {
        SelectionConfig::try_from(self).map(|_| ())
    }
}

impl TryFrom<&SelectionArgs> for SelectionConfig {
    type Error = SelectionError;

    fn try_from(args: &SelectionArgs) -> Result<Self, Self::Error> {
        let config = SelectionConfig {
            mode: args.mode,
            tiers: LatencyTiers::default().with_slow_weight(args.slow_tier_weight),
            seed: args.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        selection: SelectionArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["blockx"]).unwrap();
        assert_eq!(cli.selection, SelectionArgs::default());
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "blockx",
            "--selection.mode",
            "adaptive-with-default-fallback",
            "--selection.slow-tier-weight",
            "2",
            "--selection.seed",
            "11",
        ])
        .unwrap();

        assert_eq!(
            cli.selection.mode,
            SelectionMode::AdaptiveWithDefaultFallback
        );
        let config = SelectionConfig::try_from(&cli.selection).unwrap();
        assert_eq!(config.tiers.slow_weight, 2);
        assert_eq!(config.seed, Some(11));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["blockx", "--selection.mode", "fastest"]).is_err());
    }

    #[test]
    fn test_zero_slow_weight_rejected() {
        let args = SelectionArgs {
            slow_tier_weight: 0,
            ..SelectionArgs::default()
        };
        assert!(matches!(args.validate(), Err(SelectionError::Tiers(_))));
    }
}
