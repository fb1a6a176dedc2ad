//! Exact-composition blackjack decision core.
//!
//! Given the remaining composition of a multi-deck shoe, a player hand, a
//! dealer upcard, and a peek rule, the core computes the per-stake EV of
//! every legal action by exact enumeration over the shoe, and picks the
//! argmax. The [`simulation`] module plays the same policy out against a live
//! shoe so realized returns can be checked against the predicted numbers.

pub mod basic_strategy;
pub mod dealer;
pub mod decision;
pub mod error;
pub mod evaluate;
pub mod hand;
pub mod insurance;
pub mod rules;
pub mod shoe;
pub mod simulation;
pub mod split;
pub mod types;

pub use decision::{decide, decide_with, p_dealer_blackjack};
pub use error::CoreError;

/// Drop every memoized dealer distribution and evaluator state, e.g. on a
/// shoe reshuffle. Correctness never depends on cache contents; this only
/// bounds memory.
pub fn clear_caches() {
    dealer::clear_cache();
    evaluate::clear_cache();
}
