use std::cmp::Ordering;

use derive_more::{Add, AddAssign};
use log::debug;

use crate::basic_strategy::SplitChart;
use crate::decision::{choose, Eligibility};
use crate::hand;
use crate::hand::Hand;
use crate::rules::{Rules, Tuning};
use crate::shoe::Shoe;
use crate::types::{Action, PeekRule, Rank, A, T};

#[derive(Default, Add, AddAssign)]
pub struct SimulationResult {
    pub hands_played: u64,
    pub decisions_made: u64,
    /// Return on investment, in units of the original stake.
    pub roi: f64,
    /// The core's predicted per-round EV, summed over tracked rounds.
    pub predicted_ev: f64,
    /// Realized return over the same tracked rounds.
    pub tracked_roi: f64,
    /// Rounds where the first decision's prediction covers the whole round:
    /// no dealt naturals and no splits.
    pub tracked_rounds: u64,
}

/// Play out one complete round with the given starting shoe, deciding every
/// stand/hit/double with the exact-composition core and gating splits with
/// the basic pairs chart.
///
/// The solver sees the composition as the player would: the dealer's hole
/// card stays inside the counts handed to the core, with the peek constraint
/// carrying what the US check revealed.
///
/// # Arguments
/// * `shoe` - State of the shoe before the round. Mutated as cards are dealt;
///            the caller is responsible for reshuffling between rounds.
pub fn play_hand(
    shoe: &mut Shoe,
    chart: &SplitChart,
    rules: &Rules,
    tuning: &Tuning,
) -> SimulationResult {
    let mut result = SimulationResult::default();
    result.hands_played += 1;

    let player = hand![shoe.draw(), shoe.draw()];
    let upcard = shoe.draw();

    // Composition the core reasons over: everything dealt face-up removed,
    // the hole card (not yet seen) still inside.
    let mut solver_shoe = *shoe;

    // US peek resolves naturals before any player action.
    let mut hole: Option<Rank> = None;
    let mut dealer_bj = false;
    if rules.peek_rule == PeekRule::US && (upcard == A || upcard == T) {
        let hole_card = shoe.draw();
        dealer_bj = (upcard == A && hole_card == T) || (upcard == T && hole_card == A);
        hole = Some(hole_card);
    }

    match (dealer_bj, player.is_blackjack()) {
        (true, true) => return result,
        (true, false) => {
            result.roi = -1f64;
            return result;
        }
        (false, true) => {
            result.roi = rules.bj_payout;
            return result;
        }
        (false, false) => (),
    }

    let mut hands: Vec<Hand> = vec![player];
    let mut bets: Vec<f64> = vec![1.0];
    let mut frozen: Vec<bool> = vec![false];
    let mut predicted: Option<f64> = None;
    let mut split_round = false;

    let mut hand_idx = 0;
    while hand_idx < hands.len() {
        while !frozen[hand_idx] && hands[hand_idx].total() < 21 {
            // Chart-gated splits come before the EV core sees the hand.
            if let Some(pair) = hands[hand_idx].is_pair() {
                if chart.should_split(pair, upcard, hands.len() as u32, rules.max_splits)
                    && solver_shoe.len() >= 2
                {
                    split_round = true;
                    let first = shoe.draw();
                    let second = shoe.draw();
                    solver_shoe = solver_shoe.removed(first).removed(second);

                    hands[hand_idx] = hand![pair, first];
                    hands.push(hand![pair, second]);
                    bets.push(bets[hand_idx]);
                    frozen.push(false);

                    if pair == A && rules.split_aces_one {
                        frozen[hand_idx] = true;
                        *frozen.last_mut().unwrap() = true;
                    }
                    continue;
                }
            }

            let can_double = hands[hand_idx].cards.len() == 2
                && (hands.len() == 1 || rules.das)
                && !solver_shoe.is_empty();
            let (action, evs) = choose(
                &hands[hand_idx],
                upcard,
                &solver_shoe,
                rules,
                tuning,
                Eligibility { can_double, can_split: false, can_surrender: false },
            )
            .expect("simulator hands over validated inputs");
            result.decisions_made += 1;

            if predicted.is_none() {
                // First decision of the round: its EV covers the whole round
                // in original-stake units, with doubles counted at 2x.
                predicted = Some(match action {
                    Action::Double => 2.0 * evs.double.unwrap_or(0.0),
                    other => evs.get(other).unwrap_or(0.0),
                });
            }

            match action {
                Action::Stand => break,
                Action::Hit => {
                    let card = shoe.draw();
                    solver_shoe = solver_shoe.removed(card);
                    hands[hand_idx] += card;
                }
                Action::Double => {
                    bets[hand_idx] *= 2.0;
                    let card = shoe.draw();
                    solver_shoe = solver_shoe.removed(card);
                    hands[hand_idx] += card;
                    break;
                }
                Action::Split | Action::Surrender => {
                    unreachable!("core never chooses a gated-off action")
                }
            }
        }
        hand_idx += 1;
    }

    // Dealer action. The hole card comes out now if the peek never did.
    let hole_card = match hole {
        Some(card) => card,
        None => shoe.draw(),
    };
    let mut dealer_hand = hand![upcard, hole_card];

    if hands.iter().any(|h| h.total() <= 21) {
        loop {
            if dealer_hand.total() >= 18 {
                break;
            }
            if dealer_hand.total() >= 17 {
                if !rules.h17 {
                    break;
                }
                if !dealer_hand.is_soft() {
                    break;
                }
            }
            dealer_hand += shoe.draw();
        }
    }

    // Sum up winnings. A dealer natural (EU only at this point: the US peek
    // already settled those rounds) beats every surviving hand.
    let dealer_natural = dealer_hand.is_blackjack();
    let dealer_score = match dealer_hand.total() {
        t if t > 21 => 1, // Dealer bust score of 1, still beats a player bust (0)
        t => t,
    };
    for (hand_idx, hand) in hands.iter().enumerate() {
        let hand_score = match hand.total() {
            t if t > 21 => 0,
            t => t,
        };
        if dealer_natural {
            result.roi -= bets[hand_idx];
            continue;
        }
        match hand_score.cmp(&dealer_score) {
            Ordering::Greater => result.roi += bets[hand_idx],
            Ordering::Equal => { /* Push */ }
            Ordering::Less => result.roi -= bets[hand_idx],
        }
    }

    if let Some(prediction) = predicted {
        if !split_round {
            result.tracked_rounds += 1;
            result.predicted_ev += prediction;
            result.tracked_roi += result.roi;
        }
    }

    debug!(
        "round roi={:+} dealer={} hands={:?}",
        result.roi,
        dealer_hand.total(),
        hands.iter().map(Hand::total).collect::<Vec<_>>()
    );

    result
}
