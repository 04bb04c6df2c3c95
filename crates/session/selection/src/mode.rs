//! Selection modes and the strategies they route to.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::SelectionError;

/// Peer selection mode, fixed when a session is created.
///
/// | Mode                          | Threshold not exceeded | Threshold exceeded |
/// |-------------------------------|------------------------|--------------------|
/// | `Default`                     | history weighted       | history weighted   |
/// | `ClosestWeighted`             | latency weighted       | latency weighted   |
/// | `AdaptiveStrict`              | history weighted       | least latency      |
/// | `AdaptiveWithDefaultFallback` | latency weighted       | least latency      |
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    strum::FromRepr,
    strum::IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum SelectionMode {
    /// Favour peers that were first to deliver earlier blocks.
    #[default]
    Default = 1,
    /// Favour low-latency peers, still reaching distant ones.
    ClosestWeighted = 2,
    /// Default weighting until the session latency threshold is crossed,
    /// then the nearest peer under a streak cap.
    AdaptiveStrict = 3,
    /// Closest weighting until the session latency threshold is crossed,
    /// then the nearest peer under a streak cap.
    AdaptiveWithDefaultFallback = 4,
}

impl SelectionMode {
    /// Whether the mode reacts to the session latency threshold.
    pub const fn is_adaptive(&self) -> bool {
        matches!(
            self,
            Self::AdaptiveStrict | Self::AdaptiveWithDefaultFallback
        )
    }

    /// Weighted strategy used while the latency threshold is not exceeded.
    pub const fn baseline(&self) -> Strategy {
        match self {
            Self::Default | Self::AdaptiveStrict => Strategy::HistoryWeighted,
            Self::ClosestWeighted | Self::AdaptiveWithDefaultFallback => {
                Strategy::LatencyWeighted
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// Legacy integer configuration. `0` and `1` both mean the default mode.
impl TryFrom<u8> for SelectionMode {
    type Error = SelectionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Default),
            n => Self::from_repr(n).ok_or(SelectionError::InvalidMode(n)),
        }
    }
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy that produced a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    /// Proportional to first-response counts.
    HistoryWeighted,
    /// Proportional to latency tier, with history taking precedence.
    LatencyWeighted,
    /// Nearest peer, streak still under the cap.
    LeastLatency,
    /// Nearest peer was capped; the runner-up was adopted.
    StreakEscalation,
    /// Nearest peer was capped with no runner-up; the baseline sampler decided.
    ExhaustedFallback,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_integers() {
        assert_eq!(SelectionMode::try_from(0), Ok(SelectionMode::Default));
        assert_eq!(SelectionMode::try_from(1), Ok(SelectionMode::Default));
        assert_eq!(SelectionMode::try_from(2), Ok(SelectionMode::ClosestWeighted));
        assert_eq!(SelectionMode::try_from(3), Ok(SelectionMode::AdaptiveStrict));
        assert_eq!(
            SelectionMode::try_from(4),
            Ok(SelectionMode::AdaptiveWithDefaultFallback)
        );
        assert_eq!(
            SelectionMode::try_from(5),
            Err(SelectionError::InvalidMode(5))
        );
    }

    #[test]
    fn test_adaptive_modes() {
        assert!(!SelectionMode::Default.is_adaptive());
        assert!(!SelectionMode::ClosestWeighted.is_adaptive());
        assert!(SelectionMode::AdaptiveStrict.is_adaptive());
        assert!(SelectionMode::AdaptiveWithDefaultFallback.is_adaptive());
    }

    #[test]
    fn test_baselines() {
        assert_eq!(SelectionMode::Default.baseline(), Strategy::HistoryWeighted);
        assert_eq!(
            SelectionMode::ClosestWeighted.baseline(),
            Strategy::LatencyWeighted
        );
        assert_eq!(
            SelectionMode::AdaptiveStrict.baseline(),
            Strategy::HistoryWeighted
        );
        assert_eq!(
            SelectionMode::AdaptiveWithDefaultFallback.baseline(),
            Strategy::LatencyWeighted
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(SelectionMode::AdaptiveStrict.as_str(), "adaptive-strict");
        assert_eq!(
            SelectionMode::AdaptiveWithDefaultFallback.to_string(),
            "adaptive-with-default-fallback"
        );
        assert_eq!(Strategy::StreakEscalation.as_str(), "streak-escalation");
    }

    #[test]
    fn test_value_enum_parse() {
        let mode = SelectionMode::from_str("closest-weighted", false).unwrap();
        assert_eq!(mode, SelectionMode::ClosestWeighted);
    }
}
