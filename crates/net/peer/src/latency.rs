//! Round-trip latency boundary between the networking layer and sessions.
//!
//! Sessions never measure latency themselves. They ask a [`LatencyOracle`]
//! owned by the networking layer, which may not have data for a peer yet or
//! may fail outright. Neither case is fatal to callers: both are reported as
//! a [`LatencyError`] so the caller can place the peer in its worst tier.

use std::time::Duration;

use auto_impl::auto_impl;

/// Why a latency estimate could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LatencyError {
    /// No round-trip sample has been taken for this peer yet.
    #[error("no latency measurement for peer")]
    Unmeasured,

    /// The oracle itself failed.
    #[error("latency oracle unavailable: {0}")]
    Unavailable(String),
}

/// Source of round-trip latency estimates for peers.
///
/// Lookups may block on measurement. Callers must not hold their own locks
/// across a call.
#[auto_impl(&, Box, Arc)]
pub trait LatencyOracle<Id>: Send + Sync {
    /// Current round-trip estimate for `peer`.
    fn latency(&self, peer: &Id) -> Result<Duration, LatencyError>;

    /// Estimate with failures collapsed to [`Duration::MAX`].
    ///
    /// Unknown peers sort after every measured peer.
    fn latency_or_max(&self, peer: &Id) -> Duration {
        self.latency(peer).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Fixed(Duration);

    impl LatencyOracle<u64> for Fixed {
        fn latency(&self, peer: &u64) -> Result<Duration, LatencyError> {
            match peer {
                0 => Err(LatencyError::Unmeasured),
                1 => Err(LatencyError::Unavailable("socket closed".into())),
                _ => Ok(self.0),
            }
        }
    }

    #[test]
    fn test_latency_or_max() {
        let oracle = Fixed(Duration::from_millis(40));
        assert_eq!(oracle.latency_or_max(&2), Duration::from_millis(40));
        assert_eq!(oracle.latency_or_max(&0), Duration::MAX);
        assert_eq!(oracle.latency_or_max(&1), Duration::MAX);
    }

    #[test]
    fn test_oracle_through_pointers() {
        let oracle = Arc::new(Fixed(Duration::from_millis(7)));
        let by_ref: &dyn LatencyOracle<u64> = &oracle;
        assert_eq!(by_ref.latency(&9), Ok(Duration::from_millis(7)));

        let boxed: Box<dyn LatencyOracle<u64>> = Box::new(Fixed(Duration::from_millis(3)));
        assert_eq!(boxed.latency(&9), Ok(Duration::from_millis(3)));
    }

    #[test]
    fn test_error_display() {
        let err = LatencyError::Unavailable("timeout".into());
        assert_eq!(err.to_string(), "latency oracle unavailable: timeout");
        assert_eq!(
            LatencyError::Unmeasured.to_string(),
            "no latency measurement for peer"
        );
    }
}
