//! Per-session peer response tracker and strategy dispatcher.
//!
//! The tracker owns the session's first-responder history and adaptive
//! streak behind a single mutex. The latency oracle is only consulted while
//! that mutex is released: history counts are snapshotted, the lock dropped,
//! latencies fetched, and the lock re-taken for the streak transition.

use std::time::Duration;

use blockx_net_peer::{LatencyOracle, LatencyTiers, PeerIdentity};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::config::SelectionConfig;
use crate::error::SelectionError;
use crate::events::EventEmitter;
use crate::history::ResponseHistory;
use crate::metrics::SelectionMetrics;
use crate::mode::{SelectionMode, Strategy};
use crate::sampler::WeightedSampler;
use crate::score;
use crate::streak::{StreakDecision, StreakState};

#[derive(Debug)]
struct TrackerState<Id: PeerIdentity> {
    history: ResponseHistory<Id>,
    streak: StreakState<Id>,
}

/// Chooses which candidate peer to query next for a wanted block.
///
/// One tracker per exchange session. All methods take `&self` and may be
/// called from concurrent request handlers of the same session.
pub struct PeerResponseTracker<Id: PeerIdentity, O> {
    mode: SelectionMode,
    tiers: LatencyTiers,
    oracle: O,
    state: Mutex<TrackerState<Id>>,
    sampler: Mutex<WeightedSampler>,
    events: Option<EventEmitter<Id>>,
    metrics: SelectionMetrics,
}

impl<Id, O> PeerResponseTracker<Id, O>
where
    Id: PeerIdentity,
    O: LatencyOracle<Id>,
{
    /// Tracker with default latency tiers and an OS-seeded sampler.
    pub fn new(mode: SelectionMode, oracle: O) -> Self {
        Self::build(SelectionConfig::new(mode), oracle)
    }

    /// Tracker from a full configuration.
    pub fn with_config(config: SelectionConfig, oracle: O) -> Result<Self, SelectionError> {
        config.validate()?;
        Ok(Self::build(config, oracle))
    }

    /// Tracker drawing from `rng`, ignoring any seed in `config`.
    pub fn with_rng(
        config: SelectionConfig,
        oracle: O,
        rng: StdRng,
    ) -> Result<Self, SelectionError> {
        config.validate()?;
        Ok(Self::assemble(config, oracle, WeightedSampler::new(rng)))
    }

    fn build(config: SelectionConfig, oracle: O) -> Self {
        let sampler = match config.seed {
            Some(seed) => WeightedSampler::seeded(seed),
            None => WeightedSampler::from_os_rng(),
        };
        Self::assemble(config, oracle, sampler)
    }

    fn assemble(config: SelectionConfig, oracle: O, sampler: WeightedSampler) -> Self {
        debug!(mode = %config.mode, seeded = config.seed.is_some(), "creating peer response tracker");
        Self {
            mode: config.mode,
            tiers: config.tiers,
            oracle,
            state: Mutex::new(TrackerState {
                history: ResponseHistory::new(),
                streak: StreakState::new(),
            }),
            sampler: Mutex::new(sampler),
            events: None,
            metrics: SelectionMetrics::default(),
        }
    }

    /// Publish selection events to `emitter`.
    pub fn with_events(mut self, emitter: EventEmitter<Id>) -> Self {
        self.events = Some(emitter);
        self
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn tiers(&self) -> &LatencyTiers {
        &self.tiers
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Credit `peer` with delivering a block first.
    ///
    /// Call at most once per block, for the earliest arrival only.
    pub fn record_first_response(&self, peer: Id) {
        let count = self.state.lock().history.record(peer.clone());
        trace!(?peer, count, "recorded first response");
        self.metrics.first_responses_total.increment(1);
        if let Some(events) = &self.events {
            events.first_response(peer);
        }
    }

    /// History weight of `peer`; `1` if it was never first.
    pub fn weight(&self, peer: &Id) -> u64 {
        self.state.lock().history.weight(peer)
    }

    /// Latency-tier weight of `peer`, or its history count if it has one.
    pub fn latency_weight(&self, peer: &Id) -> u64 {
        let count = self.state.lock().history.count(peer);
        score::latency_weight(peer, count, &self.oracle, &self.tiers)
    }

    /// Snapshot of the adaptive streak.
    pub fn streak(&self) -> StreakState<Id> {
        self.state.lock().streak.clone()
    }

    /// Snapshot of first-response counts.
    pub fn history(&self) -> Vec<(Id, u64)> {
        self.state
            .lock()
            .history
            .iter()
            .map(|(peer, count)| (peer.clone(), count))
            .collect()
    }

    /// Pick the next peer to query, `None` for an empty candidate set.
    ///
    /// `threshold_exceeded` reports whether the session's average latency
    /// is above its configured bound; only adaptive modes react to it.
    pub fn choose(&self, candidates: &[Id], threshold_exceeded: bool) -> Option<Id> {
        self.choose_with_strategy(candidates, threshold_exceeded)
            .map(|(peer, _)| peer)
    }

    /// [`choose`](Self::choose), also reporting the strategy that decided.
    pub fn choose_with_strategy(
        &self,
        candidates: &[Id],
        threshold_exceeded: bool,
    ) -> Option<(Id, Strategy)> {
        if candidates.is_empty() {
            self.metrics.empty_candidates_total.increment(1);
            return None;
        }

        let choice = if threshold_exceeded && self.mode.is_adaptive() {
            self.choose_adaptive(candidates)
        } else {
            self.choose_baseline(candidates)
        };

        if let Some((peer, strategy)) = &choice {
            trace!(?peer, %strategy, mode = %self.mode, threshold_exceeded, "chose peer");
            self.metrics.inc_choice(*strategy);
            if let Some(events) = &self.events {
                events.peer_chosen(peer.clone(), *strategy);
            }
        }
        choice
    }

    fn choose_baseline(&self, candidates: &[Id]) -> Option<(Id, Strategy)> {
        let strategy = self.mode.baseline();
        let weights = match strategy {
            Strategy::LatencyWeighted => self.latency_weights(candidates),
            _ => self.history_weights(candidates),
        };
        let peer = self.sampler.lock().sample_weighted(candidates, &weights)?;
        Some((peer.clone(), strategy))
    }

    fn choose_adaptive(&self, candidates: &[Id]) -> Option<(Id, Strategy)> {
        let measured: Vec<(&Id, Duration)> = candidates
            .iter()
            .map(|peer| {
                let latency = score::probe(&self.oracle, peer).unwrap_or(Duration::MAX);
                (peer, latency)
            })
            .collect();
        let winner = score::least_measured(&measured, None)?;
        let secondary = score::least_measured(&measured, Some(winner));

        let decision = self
            .state
            .lock()
            .streak
            .advance(winner.clone(), secondary.cloned());

        match decision {
            StreakDecision::Continue(peer) | StreakDecision::Adopt(peer) => {
                Some((peer, Strategy::LeastLatency))
            }
            StreakDecision::Escalate { capped, secondary } => {
                debug!(?capped, ?secondary, "streak cap reached, rotating to runner-up");
                if let Some(events) = &self.events {
                    events.streak_escalated(capped, secondary.clone());
                }
                Some((secondary, Strategy::StreakEscalation))
            }
            StreakDecision::Exhausted(capped) => {
                debug!(?capped, "streak cap reached with no runner-up, using baseline sampler");
                self.choose_baseline(candidates)
                    .map(|(peer, _)| (peer, Strategy::ExhaustedFallback))
            }
        }
    }

    fn history_weights(&self, candidates: &[Id]) -> Vec<u64> {
        let state = self.state.lock();
        candidates
            .iter()
            .map(|peer| state.history.weight(peer))
            .collect()
    }

    fn latency_weights(&self, candidates: &[Id]) -> Vec<u64> {
        let counts: Vec<Option<u64>> = {
            let state = self.state.lock();
            candidates
                .iter()
                .map(|peer| state.history.count(peer))
                .collect()
        };
        candidates
            .iter()
            .zip(counts)
            .map(|(peer, count)| score::latency_weight(peer, count, &self.oracle, &self.tiers))
            .collect()
    }
}

impl<Id: PeerIdentity, O> std::fmt::Debug for PeerResponseTracker<Id, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PeerResponseTracker")
            .field("mode", &self.mode)
            .field("tracked_peers", &state.history.len())
            .field("streak", &state.streak)
            .finish()
    }
}
