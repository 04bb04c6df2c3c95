//! Selection error types.

use blockx_net_peer::TierError;

/// Errors raised while configuring a selection session.
///
/// Selection itself never fails; these only come from configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Legacy integer mode outside 0..=4.
    #[error("unknown provider selection mode {0}")]
    InvalidMode(u8),

    /// Latency tier table rejected.
    #[error("invalid latency tiers: {0}")]
    Tiers(#[from] TierError),
}
