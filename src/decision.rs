use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::evaluate::ev;
use crate::evaluate::state::PlayerState;
use crate::hand::Hand;
use crate::rules::{Rules, Tuning};
use crate::shoe::Shoe;
use crate::split::split_ev;
use crate::types::{
    rank_from_symbol, Action, Conditioning, PeekConstraint, PeekRule, Rank, A, T,
};

/// Per-stake EV of surrendering, where allowed.
pub const SURRENDER_EV: f64 = -0.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandSpec {
    pub cards: Vec<String>,
    pub can_double: bool,
    pub can_split: bool,
    pub can_surrender: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    /// Cards remaining, in rank order A,2..9,T. Signed on the wire so a
    /// corrupt negative slot is reported instead of wrapping.
    pub counts: Vec<i32>,
    pub hand: HandSpec,
    pub dealer_up: String,
    pub rules: Rules,
}

/// Eligibility gates for a decision, as asserted by the caller. The core
/// trusts these; session bookkeeping (hand count, prior actions) lives with
/// the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Eligibility {
    pub can_double: bool,
    pub can_split: bool,
    pub can_surrender: bool,
}

/// Per-stake EV of every evaluated action; `None` marks an action that was
/// not available in the situation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ActionEvs {
    pub stand: Option<f64>,
    pub hit: Option<f64>,
    pub double: Option<f64>,
    pub split: Option<f64>,
    pub surrender: Option<f64>,
}

impl ActionEvs {
    pub fn get(&self, action: Action) -> Option<f64> {
        match action {
            Action::Stand => self.stand,
            Action::Hit => self.hit,
            Action::Double => self.double,
            Action::Split => self.split,
            Action::Surrender => self.surrender,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DecisionMeta {
    pub peek_mode: PeekRule,
    pub conditioning: Conditioning,
    /// Dealer natural probability from the request counts.
    pub p_bj: f64,
    /// Unit convention for the double EV field.
    pub double_units: &'static str,
    pub rules: Rules,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DecisionResponse {
    pub action: Action,
    pub evs: ActionEvs,
    pub meta: DecisionMeta,
}

/// Evaluate a decision request with default tuning.
pub fn decide(request: &DecisionRequest) -> Result<DecisionResponse, CoreError> {
    decide_with(request, &Tuning::default())
}

/// Evaluate a decision request: validate, compute per-stake EVs for every
/// eligible action, and pick the argmax under the margin and tie policy.
pub fn decide_with(request: &DecisionRequest, tuning: &Tuning) -> Result<DecisionResponse, CoreError> {
    let shoe = Shoe::from_counts(&request.counts)?;
    let hand = Hand::from_symbols(&request.hand.cards)?;
    let upcard = rank_from_symbol(&request.dealer_up)?;
    let allowed = Eligibility {
        can_double: request.hand.can_double,
        can_split: request.hand.can_split,
        can_surrender: request.hand.can_surrender,
    };

    let (action, evs) = choose(&hand, upcard, &shoe, &request.rules, tuning, allowed)?;

    let constraint = PeekConstraint::for_upcard(request.rules.peek_rule, upcard);
    let meta = DecisionMeta {
        peek_mode: request.rules.peek_rule,
        conditioning: match constraint {
            PeekConstraint::None => Conditioning::Unconditioned,
            _ => Conditioning::NoDealerBlackjack,
        },
        p_bj: p_dealer_blackjack(&shoe, upcard),
        double_units: "per-stake",
        rules: request.rules,
    };

    debug!(
        "decision up={} hand={:?} best={} evs={:?}",
        request.dealer_up, request.hand.cards, action, evs
    );

    Ok(DecisionResponse { action, evs, meta })
}

/// Typed core of the decision call, shared with the simulator. The hand is
/// already parsed and the shoe is the post-deal composition (upcard and hand
/// cards excluded by the caller).
pub fn choose(
    hand: &Hand,
    upcard: Rank,
    shoe: &Shoe,
    rules: &Rules,
    tuning: &Tuning,
    allowed: Eligibility,
) -> Result<(Action, ActionEvs), CoreError> {
    let constraint = PeekConstraint::for_upcard(rules.peek_rule, upcard);
    let player = PlayerState::from(hand);

    if allowed.can_double && shoe.is_empty() {
        return Err(CoreError::BadCounts(
            "double needs a card left in the shoe".to_string(),
        ));
    }
    let pair = hand.is_pair();
    let split_eligible = allowed.can_split && pair.is_some() && rules.max_splits > 0;
    if split_eligible && shoe.len() < 2 {
        return Err(CoreError::BadCounts(
            "split needs two cards left in the shoe".to_string(),
        ));
    }

    let calc = ev(
        player,
        upcard,
        *shoe,
        tuning.dp_depth,
        allowed.can_double,
        constraint,
        rules.h17,
    );

    let ev_stand = calc.choices[Action::Stand];
    let ev_hit = calc.choices[Action::Hit];
    let hit_available = ev_hit != f64::NEG_INFINITY;
    // The evaluator's double entry is in total units on the 2x wager; all
    // reporting and comparison here is per stake.
    let ev_double = allowed
        .can_double
        .then(|| calc.choices[Action::Double])
        .filter(|d| *d != f64::NEG_INFINITY)
        .map(|d| d / 2.0);
    let ev_split = split_eligible
        .then(|| split_ev(pair.unwrap(), upcard, shoe, rules, tuning, constraint));
    let ev_surrender = allowed.can_surrender.then_some(SURRENDER_EV);

    let evs = ActionEvs {
        stand: Some(ev_stand),
        hit: hit_available.then_some(ev_hit),
        double: ev_double,
        split: ev_split,
        surrender: ev_surrender,
    };

    Ok((pick(&evs, tuning), evs))
}

/// Argmax with the margin and tie policy: doubling must clear the best of
/// stand/hit by `double_margin` (ties go to the double), hitting must beat
/// standing outright, and split or surrender must beat everything else.
fn pick(evs: &ActionEvs, tuning: &Tuning) -> Action {
    let eps = tuning.tie_eps;
    let ev_stand = evs.stand.unwrap_or(f64::NEG_INFINITY);
    let ev_hit = evs.hit.unwrap_or(f64::NEG_INFINITY);
    let best_alt = ev_stand.max(ev_hit);

    let mut action = match evs.double {
        Some(d) if d >= best_alt + tuning.double_margin - eps => Action::Double,
        _ if ev_hit > ev_stand + eps => Action::Hit,
        _ => Action::Stand,
    };

    let mut best = evs.get(action).unwrap_or(f64::NEG_INFINITY);
    if let Some(s) = evs.split {
        if s > best.max(ev_stand).max(ev_hit) + eps {
            action = Action::Split;
            best = s;
        }
    }
    if let Some(s) = evs.surrender {
        if s > best + eps {
            action = Action::Surrender;
        }
    }

    action
}

/// Dealer natural probability as a pure function of the composition: the
/// density of the rank that would complete a natural under the upcard.
pub fn p_dealer_blackjack(shoe: &Shoe, upcard: Rank) -> f64 {
    let remaining = shoe.len();
    if remaining == 0 {
        return 0.0;
    }
    match upcard {
        A => shoe[T] as f64 / remaining as f64,
        T => shoe[A] as f64 / remaining as f64,
        _ => 0.0,
    }
}
