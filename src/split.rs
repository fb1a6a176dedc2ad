use crate::evaluate::state::PlayerState;
use crate::evaluate::{ev, stand_ev};
use crate::rules::{Rules, Tuning};
use crate::shoe::Shoe;
use crate::types::{PeekConstraint, Rank, A, RANKS};

/// Per-original-stake EV of splitting a pair of `pair` against `upcard`.
///
/// Both children's second cards are enumerated jointly against the shared
/// shoe, and each child then plays out as a non-splittable hand. Split aces
/// receive one card and stand when the rules say so; otherwise the child runs
/// through the full evaluator with its double right governed by DAS.
///
/// The result is the average of the two children's per-stake EVs, so it
/// compares directly against the stand/hit per-stake numbers; realized splits
/// settle at 1x stake per child downstream. The shoe must hold at least two
/// cards.
pub fn split_ev(
    pair: Rank,
    upcard: Rank,
    shoe: &Shoe,
    rules: &Rules,
    tuning: &Tuning,
    constraint: PeekConstraint,
) -> f64 {
    assert!(shoe.len() >= 2, "split evaluation needs two drawable cards");

    let one_card_aces = pair == A && rules.split_aces_one;
    let depth = tuning.split_child_depth();

    let first_remaining = shoe.len();
    let mut cumul_ev = 0f64;
    for first_card in RANKS {
        if shoe[first_card] == 0 {
            continue;
        }
        let p_first = shoe[first_card] as f64 / first_remaining as f64;
        let shoe_one = shoe.removed(first_card);
        let second_remaining = shoe_one.len();

        for second_card in RANKS {
            if shoe_one[second_card] == 0 {
                continue;
            }
            let p_second = shoe_one[second_card] as f64 / second_remaining as f64;
            let shoe_two = shoe_one.removed(second_card);

            let ev_first = child_ev(pair, first_card, upcard, &shoe_two, rules, depth, constraint, one_card_aces);
            let ev_second = child_ev(pair, second_card, upcard, &shoe_two, rules, depth, constraint, one_card_aces);

            cumul_ev += p_first * p_second * (ev_first + ev_second) / 2f64;
        }
    }

    cumul_ev
}

fn child_ev(
    pair: Rank,
    second: Rank,
    upcard: Rank,
    shoe: &Shoe,
    rules: &Rules,
    depth: u32,
    constraint: PeekConstraint,
    one_card_aces: bool,
) -> f64 {
    let child = PlayerState::from_two(pair, second);
    if one_card_aces {
        stand_ev(child, upcard, shoe, rules.h17, constraint)
    } else {
        ev(child, upcard, *shoe, depth, rules.das, constraint, rules.h17).ev
    }
}
