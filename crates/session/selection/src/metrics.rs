//! Peer selection metrics

use metrics::Counter;

use crate::mode::Strategy;

/// Peer selection metrics
#[derive(Clone, Debug)]
pub(crate) struct SelectionMetrics {
    /// Picks made by history weighting
    history_weighted_total: Counter,
    /// Picks made by latency weighting
    latency_weighted_total: Counter,
    /// Picks of the nearest peer
    least_latency_total: Counter,
    /// Picks of the runner-up after the nearest peer was capped
    streak_escalation_total: Counter,
    /// Picks made by the baseline sampler after the nearest peer was capped alone
    exhausted_fallback_total: Counter,
    /// First responses credited to a peer
    pub(crate) first_responses_total: Counter,
    /// Selection requests with no candidates
    pub(crate) empty_candidates_total: Counter,
}

impl Default for SelectionMetrics {
    fn default() -> Self {
        let choices = |strategy: Strategy| {
            metrics::counter!("session.selection.choices_total", "strategy" => strategy.as_str())
        };
        Self {
            history_weighted_total: choices(Strategy::HistoryWeighted),
            latency_weighted_total: choices(Strategy::LatencyWeighted),
            least_latency_total: choices(Strategy::LeastLatency),
            streak_escalation_total: metrics::counter!(
                "session.selection.streak_escalations_total"
            ),
            exhausted_fallback_total: metrics::counter!(
                "session.selection.exhausted_fallbacks_total"
            ),
            first_responses_total: metrics::counter!("session.selection.first_responses_total"),
            empty_candidates_total: metrics::counter!(
                "session.selection.empty_candidates_total"
            ),
        }
    }
}

impl SelectionMetrics {
    /// Increments the counter for the strategy that made a pick.
    pub(crate) fn inc_choice(&self, strategy: Strategy) {
        let counter = match strategy {
            Strategy::HistoryWeighted => &self.history_weighted_total,
            Strategy::LatencyWeighted => &self.latency_weighted_total,
            Strategy::LeastLatency => &self.least_latency_total,
            Strategy::StreakEscalation => &self.streak_escalation_total,
            Strategy::ExhaustedFallback => &self.exhausted_fallback_total,
        };
        counter.increment(1);
    }
}
