//! Default constants for peer selection.

/// Consecutive adaptive picks of one peer before it must be rotated out.
pub const MAX_CONSECUTIVE_QUERIES: u8 = 4;

/// Weight of a peer that has never been first to respond.
///
/// Nonzero so that unproven peers keep a chance of being explored.
pub const COLD_START_WEIGHT: u64 = 1;

/// Capacity of the selection event broadcast channel.
pub(crate) const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;
