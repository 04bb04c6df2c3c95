//! Traits for peer identifiers.

use std::fmt::Debug;
use std::hash::Hash;

/// Opaque peer identifier.
///
/// Blanket-implemented for any type with Clone + Eq + Hash + Send + Sync + Debug.
/// `Hash` only keys per-session maps; no ordering between peers is ever assumed.
pub trait PeerIdentity: Clone + Eq + Hash + Send + Sync + Debug + 'static {}

impl<T> PeerIdentity for T where T: Clone + Eq + Hash + Send + Sync + Debug + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_identity<T: PeerIdentity>() {}

    #[test]
    fn test_common_identities() {
        assert_identity::<u64>();
        assert_identity::<String>();
        assert_identity::<[u8; 32]>();
    }
}
