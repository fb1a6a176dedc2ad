use enum_map::Enum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::CoreError;

/// Index into a shoe's count vector: Ace at 0, pip ranks 2..9 at 1..8, and
/// every ten-valued card (10/J/Q/K) bucketed at 9.
pub type Rank = usize;

pub const A: Rank = 0;
pub const T: Rank = 9;
pub const N_RANKS: usize = 10;
pub const RANKS: [Rank; N_RANKS] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];

/// Point value of a rank. Aces count 11 here; demotion to 1 is the hand
/// arithmetic's job.
pub fn rank_value(rank: Rank) -> i32 {
    match rank {
        A => 11,
        T => 10,
        n => n as i32 + 1,
    }
}

/// Parse a one-character wire symbol from the closed set `A 2 3 4 5 6 7 8 9 T`.
pub fn rank_from_symbol(symbol: &str) -> Result<Rank, CoreError> {
    match symbol {
        "A" => Ok(A),
        "T" => Ok(T),
        s if s.len() == 1 => match s.parse::<usize>() {
            Ok(n) if (2..=9).contains(&n) => Ok(n - 1),
            _ => Err(CoreError::InvalidRank(symbol.to_string())),
        },
        _ => Err(CoreError::InvalidRank(symbol.to_string())),
    }
}

pub fn rank_symbol(rank: Rank) -> &'static str {
    const SYMBOLS: [&str; N_RANKS] = ["A", "2", "3", "4", "5", "6", "7", "8", "9", "T"];
    SYMBOLS[rank]
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Enum, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Stand,
    Hit,
    Double,
    Split,
    Surrender,
}

/// Whether the dealer checks the hole card under an Ace or ten upcard.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum PeekRule {
    US,
    EU,
}

/// Restriction on the dealer's next draw after a cleared US peek. `NotTen`
/// means an Ace is up and the hole cannot be ten-valued; `NotAce` the reverse.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum PeekConstraint {
    None,
    NotTen,
    NotAce,
}

impl PeekConstraint {
    /// The constraint in force for player decisions once the dealer's check
    /// (if any) has come back clean.
    pub fn for_upcard(peek_rule: PeekRule, upcard: Rank) -> PeekConstraint {
        match (peek_rule, upcard) {
            (PeekRule::US, A) => PeekConstraint::NotTen,
            (PeekRule::US, T) => PeekConstraint::NotAce,
            _ => PeekConstraint::None,
        }
    }
}

/// Whether reported EVs exclude dealer-blackjack worlds.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Display, Serialize)]
pub enum Conditioning {
    #[strum(serialize = "no-dealer-BJ")]
    #[serde(rename = "no-dealer-BJ")]
    NoDealerBlackjack,
    #[strum(serialize = "unconditioned")]
    #[serde(rename = "unconditioned")]
    Unconditioned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_symbols_round_trip() {
        for rank in RANKS {
            assert_eq!(rank_from_symbol(rank_symbol(rank)).unwrap(), rank);
        }
    }

    #[test]
    fn test_rank_parse() {
        assert_eq!(rank_from_symbol("A").unwrap(), A);
        assert_eq!(rank_from_symbol("T").unwrap(), T);
        assert_eq!(rank_from_symbol("2").unwrap(), 1);
        assert_eq!(rank_from_symbol("9").unwrap(), 8);
    }

    #[test]
    fn test_rank_parse_rejects_unknown_symbols() {
        for bad in ["K", "Q", "J", "10", "1", "0", "a", "t", "", " ", "77"] {
            assert_eq!(
                rank_from_symbol(bad),
                Err(CoreError::InvalidRank(bad.to_string()))
            );
        }
    }

    #[test]
    fn test_rank_values() {
        assert_eq!(rank_value(A), 11);
        assert_eq!(rank_value(T), 10);
        assert_eq!(rank_value(4), 5);
    }

    #[test]
    fn test_peek_constraint_selection() {
        assert_eq!(
            PeekConstraint::for_upcard(PeekRule::US, A),
            PeekConstraint::NotTen
        );
        assert_eq!(
            PeekConstraint::for_upcard(PeekRule::US, T),
            PeekConstraint::NotAce
        );
        assert_eq!(
            PeekConstraint::for_upcard(PeekRule::US, 5),
            PeekConstraint::None
        );
        assert_eq!(
            PeekConstraint::for_upcard(PeekRule::EU, A),
            PeekConstraint::None
        );
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::Stand.to_string(), "stand");
        assert_eq!(Action::Surrender.to_string(), "surrender");
        assert_eq!("double".parse::<Action>().unwrap(), Action::Double);
    }
}
