use enum_map::EnumMap;
use memoize::memoize;

use crate::dealer::{dealer_pmf, DealerState};
use crate::evaluate::state::PlayerState;
use crate::shoe::Shoe;
use crate::types::{Action, PeekConstraint, Rank, RANKS};

pub mod state;

/// The result of evaluating a player state: per-action EVs and the argmax.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct EvCalcResult {
    pub ev: f64,
    pub action: Action,

    /// The EV of each possible action in a situation. Actions that were not
    /// evaluated carry `f64::NEG_INFINITY`. Stand and hit are per stake; the
    /// double entry is in total units on the doubled wager.
    pub choices: EnumMap<Action, f64>,
}

/// Per-stake EV of standing on `player` against the dealer's exact final
/// total distribution. The dealer starts from the upcard alone; `shoe` is the
/// post-deal composition with the upcard already excluded. The value is
/// conditional on the peek constraint: blending in dealer-blackjack worlds is
/// the caller's business.
pub fn stand_ev(
    player: PlayerState,
    upcard: Rank,
    shoe: &Shoe,
    h17: bool,
    constraint: PeekConstraint,
) -> f64 {
    if player.total > 21 {
        return -1.0;
    }

    let pmf = dealer_pmf(DealerState::from_upcard(upcard), *shoe, h17, constraint);

    let mut win = pmf.p_bust();
    for dealer_total in 17..player.total {
        win += pmf.p_total(dealer_total);
    }
    let push = pmf.p_total(player.total);
    let lose = 1.0 - win - push;

    win - lose
}

/// Combinatorial evaluation of stand, hit, and (at depth 0 of a hand) double.
///
/// `depth` bounds how many further decision points the hit branch may expand;
/// at depth 0 the player is assumed to hit once and then stand, a
/// conservative floor that still dominates standing on many soft totals.
#[memoize(Capacity: 300_000)]
pub fn ev(
    player: PlayerState,
    upcard: Rank,
    shoe: Shoe,
    depth: u32,
    double_allowed: bool,
    constraint: PeekConstraint,
    h17: bool,
) -> EvCalcResult {
    let mut choices = EnumMap::from_array([f64::NEG_INFINITY; 5]);

    if player.total > 21 {
        choices[Action::Stand] = -1f64;
        return EvCalcResult { ev: -1f64, action: Action::Stand, choices };
    }

    choices[Action::Stand] = stand_ev(player, upcard, &shoe, h17, constraint);

    if shoe.is_empty() {
        return EvCalcResult { ev: choices[Action::Stand], action: Action::Stand, choices };
    }

    choices[Action::Hit] = ev_hit(player, upcard, &shoe, depth, constraint, h17);

    if double_allowed {
        choices[Action::Double] = ev_double(player, upcard, &shoe, constraint, h17);
    }

    // Return the choice that maximizes expected value. Strict comparison
    // keeps earlier variants on ties: stand before hit before double.
    let mut max_ev_choice = Action::Stand;
    for (action, action_ev) in choices {
        if action_ev > choices[max_ev_choice] {
            max_ev_choice = action;
        }
    }
    EvCalcResult { ev: choices[max_ev_choice], action: max_ev_choice, choices }
}

fn ev_hit(
    player: PlayerState,
    upcard: Rank,
    shoe: &Shoe,
    depth: u32,
    constraint: PeekConstraint,
    h17: bool,
) -> f64 {
    let remaining = shoe.len();
    let mut cumul_ev = 0f64;
    for next_card in RANKS {
        if shoe[next_card] == 0 {
            continue;
        }

        let p = shoe[next_card] as f64 / remaining as f64;
        let next = player + next_card;
        let shoe_after = shoe.removed(next_card);

        if next.total > 21 {
            cumul_ev -= p;
        } else if depth == 0 {
            cumul_ev += p * stand_ev(next, upcard, &shoe_after, h17, constraint);
        } else {
            cumul_ev += p * ev(next, upcard, shoe_after, depth - 1, false, constraint, h17).ev;
        }
    }

    cumul_ev
}

/// Total-units double EV: twice the one-card-then-stand expectation. The
/// outward interface reports this per stake (halved).
fn ev_double(
    player: PlayerState,
    upcard: Rank,
    shoe: &Shoe,
    constraint: PeekConstraint,
    h17: bool,
) -> f64 {
    2f64 * one_card_stand_ev(player, upcard, shoe, constraint, h17)
}

/// Deck-weighted stand EV after exactly one forced card, with no further
/// player action. An exhausted shoe degrades to standing in place.
pub fn one_card_stand_ev(
    player: PlayerState,
    upcard: Rank,
    shoe: &Shoe,
    constraint: PeekConstraint,
    h17: bool,
) -> f64 {
    let remaining = shoe.len();
    if remaining == 0 {
        return stand_ev(player, upcard, shoe, h17, constraint);
    }

    let mut cumul_ev = 0f64;
    for next_card in RANKS {
        if shoe[next_card] == 0 {
            continue;
        }
        let p = shoe[next_card] as f64 / remaining as f64;
        let next = player + next_card;
        let shoe_after = shoe.removed(next_card);
        cumul_ev += p * stand_ev(next, upcard, &shoe_after, h17, constraint);
    }

    cumul_ev
}

pub fn clear_cache() {
    memoized_flush_ev();
}
