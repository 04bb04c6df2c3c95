//! Score functions over history and latency.
//!
//! These are pure apart from the oracle lookups; callers decide which
//! locks (if any) to hold around them.

use std::time::Duration;

use blockx_net_peer::{LatencyError, LatencyOracle, LatencyTiers};
use tracing::warn;

/// Ask the oracle for `peer`, logging outright oracle failures.
pub fn probe<Id, O>(oracle: &O, peer: &Id) -> Result<Duration, LatencyError>
where
    Id: std::fmt::Debug,
    O: LatencyOracle<Id> + ?Sized,
{
    let latency = oracle.latency(peer);
    if let Err(LatencyError::Unavailable(reason)) = &latency {
        warn!(?peer, %reason, "latency oracle unavailable, using worst tier");
    }
    latency
}

/// Latency-tier weight, overridden by first-response history.
///
/// Once a peer has been first to respond at all, its count is trusted over
/// its measured latency and the oracle is not consulted.
pub fn latency_weight<Id, O>(
    peer: &Id,
    history_count: Option<u64>,
    oracle: &O,
    tiers: &LatencyTiers,
) -> u64
where
    Id: std::fmt::Debug,
    O: LatencyOracle<Id> + ?Sized,
{
    match history_count {
        Some(count) => count,
        None => tiers.weight_for(&probe(oracle, peer)),
    }
}

/// Candidate with the smallest oracle latency.
///
/// The running best starts at the first candidate's own latency and is
/// replaced only by a strictly smaller one, so ties keep the earliest.
/// Unknown latencies rank last.
pub fn least_latency<'a, Id, O>(candidates: &'a [Id], oracle: &O) -> Option<&'a Id>
where
    Id: std::fmt::Debug,
    O: LatencyOracle<Id> + ?Sized,
{
    least_by(
        candidates
            .iter()
            .map(|peer| (peer, probe(oracle, peer).unwrap_or(Duration::MAX))),
    )
}

/// [`least_latency`] ignoring every occurrence of `excluded`.
pub fn least_latency_excluding<'a, Id, O>(
    candidates: &'a [Id],
    excluded: &Id,
    oracle: &O,
) -> Option<&'a Id>
where
    Id: std::fmt::Debug + PartialEq,
    O: LatencyOracle<Id> + ?Sized,
{
    least_by(
        candidates
            .iter()
            .filter(|peer| *peer != excluded)
            .map(|peer| (peer, probe(oracle, peer).unwrap_or(Duration::MAX))),
    )
}

/// Least-latency search over already measured candidates.
pub(crate) fn least_measured<'a, Id: PartialEq>(
    measured: &[(&'a Id, Duration)],
    excluded: Option<&Id>,
) -> Option<&'a Id> {
    least_by(
        measured
            .iter()
            .filter(|(peer, _)| Some(*peer) != excluded)
            .copied(),
    )
}

fn least_by<'a, Id>(measured: impl IntoIterator<Item = (&'a Id, Duration)>) -> Option<&'a Id> {
    let mut measured = measured.into_iter();
    let (mut best, mut best_latency) = measured.next()?;
    for (peer, latency) in measured {
        if latency < best_latency {
            best = peer;
            best_latency = latency;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockx_net_peer::RttTable;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn oracle(latencies: &[(&'static str, u64)]) -> RttTable<&'static str> {
        let table = RttTable::new();
        for (peer, latency) in latencies {
            table.record(*peer, ms(*latency));
        }
        table
    }

    struct Broken;

    impl LatencyOracle<&'static str> for Broken {
        fn latency(&self, _peer: &&'static str) -> Result<Duration, LatencyError> {
            Err(LatencyError::Unavailable("no route".into()))
        }
    }

    #[test]
    fn test_least_latency_any_position() {
        let table = oracle(&[("a", 80), ("b", 30), ("c", 200)]);

        assert_eq!(least_latency(&["a", "b", "c"], &table), Some(&"b"));
        assert_eq!(least_latency(&["b", "a", "c"], &table), Some(&"b"));
        assert_eq!(least_latency(&["a", "c", "b"], &table), Some(&"b"));
        assert_eq!(least_latency(&["b"], &table), Some(&"b"));
    }

    #[test]
    fn test_least_latency_single_candidate() {
        let table = oracle(&[("a", 80)]);
        assert_eq!(least_latency(&["a"], &table), Some(&"a"));
        // Unmeasured, but still the only choice.
        assert_eq!(least_latency(&["z"], &table), Some(&"z"));
    }

    #[test]
    fn test_least_latency_empty() {
        let table = oracle(&[]);
        let none: [&str; 0] = [];
        assert_eq!(least_latency(&none, &table), None);
    }

    #[test]
    fn test_least_latency_ties_keep_earliest() {
        let table = oracle(&[("a", 30), ("b", 30)]);
        assert_eq!(least_latency(&["a", "b"], &table), Some(&"a"));
        assert_eq!(least_latency(&["b", "a"], &table), Some(&"b"));
    }

    #[test]
    fn test_unmeasured_ranks_last() {
        let table = oracle(&[("a", 400)]);
        assert_eq!(least_latency(&["x", "a"], &table), Some(&"a"));
    }

    #[test]
    fn test_least_latency_excluding() {
        let table = oracle(&[("a", 80), ("b", 30), ("c", 200)]);

        assert_eq!(
            least_latency_excluding(&["a", "b", "c"], &"b", &table),
            Some(&"a")
        );
        assert_eq!(
            least_latency_excluding(&["c", "b", "a"], &"b", &table),
            Some(&"a")
        );
        assert_eq!(least_latency_excluding(&["b"], &"b", &table), None);
        assert_eq!(least_latency_excluding(&["b", "b"], &"b", &table), None);
    }

    #[test]
    fn test_latency_weight_history_overrides() {
        let table = oracle(&[("a", 40), ("b", 90), ("c", 150), ("d", 600), ("e", 300)]);
        let tiers = LatencyTiers::default();

        assert_eq!(latency_weight(&"a", None, &table, &tiers), 8);
        assert_eq!(latency_weight(&"b", None, &table, &tiers), 4);
        assert_eq!(latency_weight(&"c", None, &table, &tiers), 2);
        assert_eq!(latency_weight(&"d", None, &table, &tiers), 1);
        assert_eq!(latency_weight(&"e", None, &table, &tiers), 1);

        // A slow peer with history is weighted by its count.
        assert_eq!(latency_weight(&"d", Some(5), &table, &tiers), 5);
    }

    #[test]
    fn test_broken_oracle_is_worst_tier() {
        let tiers = LatencyTiers::default();
        assert_eq!(latency_weight(&"a", None, &Broken, &tiers), 1);
        assert_eq!(least_latency(&["a", "b"], &Broken), Some(&"a"));
    }

    #[test]
    fn test_least_measured_excluding() {
        let (a, b, c) = ("a", "b", "c");
        let measured = [(&a, ms(80)), (&b, ms(30)), (&c, ms(200))];

        assert_eq!(least_measured(&measured, None), Some(&b));
        assert_eq!(least_measured(&measured, Some(&b)), Some(&a));
    }
}
