use thiserror::Error;

use crate::types::Rank;

/// Error kinds surfaced by the decision core. Internal invariant breaches
/// inside the recursion (removing from a slot the enumeration saw as
/// positive, a malformed embedded chart) are hard panics instead: a loud
/// failure beats a silently wrong EV.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid rank symbol {0:?}")]
    InvalidRank(String),

    #[error("hand has no cards")]
    EmptyHand,

    #[error("bad counts: {0}")]
    BadCounts(String),

    /// A caller-driven removal hit a slot with no cards left.
    #[error("no cards of rank {0} left to remove")]
    EmptySlot(Rank),

    #[error("insurance requires a dealer ace up")]
    DealerUpNotAce,
}
