use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::CoreError;
use crate::hand::Hand;
use crate::shoe::Shoe;
use crate::types::{rank_from_symbol, Rank, A, T};

/// The ten density at which insurance breaks even.
pub const BREAK_EVEN_P: f64 = 1.0 / 3.0;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Take,
    Decline,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRequest {
    /// Cards remaining, in rank order A,2..9,T.
    pub counts: Vec<i32>,
    pub dealer_up: String,
    /// The held hand, if the caller wants even-money detection.
    pub hand: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct InsuranceResponse {
    pub recommendation: Recommendation,
    /// EV per unit of the original wager.
    pub ev_per_original: f64,
    /// EV per unit of the half-stake side bet itself.
    pub ev_per_insurance: f64,
    pub p_bj: f64,
    pub break_even_p: f64,
    /// Set when the held hand is a natural, where insurance locks in an even
    /// 1x payout.
    pub even_money_equivalent: bool,
}

/// Evaluate an insurance request from wire counts and symbols.
pub fn evaluate(request: &InsuranceRequest) -> Result<InsuranceResponse, CoreError> {
    let shoe = Shoe::from_counts(&request.counts)?;
    let dealer_up = rank_from_symbol(&request.dealer_up)?;
    let held = match &request.hand {
        Some(cards) => Some(Hand::from_symbols(cards)?),
        None => None,
    };
    evaluate_shoe(&shoe, dealer_up, held.as_ref())
}

/// Closed-form insurance EV against the current composition. The side bet
/// costs half the stake and pays 2:1 on a dealer natural, so it is profitable
/// exactly when more than a third of the unseen cards are ten-valued.
pub fn evaluate_shoe(
    shoe: &Shoe,
    dealer_up: Rank,
    held: Option<&Hand>,
) -> Result<InsuranceResponse, CoreError> {
    if dealer_up != A {
        return Err(CoreError::DealerUpNotAce);
    }

    let remaining = shoe.len();
    let p_bj = if remaining == 0 {
        0.0
    } else {
        shoe[T] as f64 / remaining as f64
    };

    Ok(InsuranceResponse {
        recommendation: if p_bj > BREAK_EVEN_P {
            Recommendation::Take
        } else {
            Recommendation::Decline
        },
        ev_per_original: 1.5 * p_bj - 0.5,
        ev_per_insurance: 3.0 * p_bj - 1.0,
        p_bj,
        break_even_p: BREAK_EVEN_P,
        even_money_equivalent: held.map_or(false, Hand::is_blackjack),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::N_RANKS;
    use crate::{hand, shoe};

    #[test]
    fn test_requires_ace_up() {
        assert_eq!(
            evaluate_shoe(&shoe!(1), T, None),
            Err(CoreError::DealerUpNotAce)
        );
    }

    #[test]
    fn test_fresh_shoe_declines() {
        let shoe = shoe!(8).removed(A);
        let result = evaluate_shoe(&shoe, A, None).unwrap();
        assert_eq!(result.recommendation, Recommendation::Decline);
        assert!(result.p_bj < BREAK_EVEN_P);
        assert!(result.ev_per_original < 0.0);
        assert!(!result.even_money_equivalent);
    }

    #[test]
    fn test_ten_rich_shoe_takes() {
        let mut counts = [2; N_RANKS];
        counts[T] = 30;
        let result = evaluate_shoe(&Shoe { counts }, A, None).unwrap();
        assert!(result.p_bj > BREAK_EVEN_P);
        assert_eq!(result.recommendation, Recommendation::Take);
        assert!(result.ev_per_original > 0.0);
    }

    #[test]
    fn test_unit_identity() {
        // Per-insurance EV is exactly twice the per-original EV for any
        // composition: both are linear in p and differ only by the 0.5 unit.
        for tens in [0, 10, 60, 128] {
            let mut counts = [4; N_RANKS];
            counts[T] = tens;
            let result = evaluate_shoe(&Shoe { counts }, A, None).unwrap();
            assert!((result.ev_per_insurance - 2.0 * result.ev_per_original).abs() < 1e-12);
        }
    }

    #[test]
    fn test_even_money_flag() {
        let shoe = shoe!(8).removed(A).removed(A).removed(T);
        let natural = hand![A, T];
        let result = evaluate_shoe(&shoe, A, Some(&natural)).unwrap();
        assert!(result.even_money_equivalent);

        let twenty = hand![T, T];
        let result = evaluate_shoe(&shoe, A, Some(&twenty)).unwrap();
        assert!(!result.even_money_equivalent);
    }

    #[test]
    fn test_wire_request() {
        let mut counts = vec![4i32; N_RANKS];
        counts[A] -= 1;
        let request = InsuranceRequest {
            counts,
            dealer_up: "A".to_string(),
            hand: Some(vec!["A".to_string(), "T".to_string()]),
        };
        let result = evaluate(&request).unwrap();
        assert!(result.even_money_equivalent);
        assert!((result.p_bj - 16.0 / 51.0).abs() < 1e-12);

        let bad = InsuranceRequest {
            counts: vec![4i32; N_RANKS],
            dealer_up: "7".to_string(),
            hand: None,
        };
        assert_eq!(evaluate(&bad), Err(CoreError::DealerUpNotAce));
    }
}
