use std::ops;

use crate::hand::{add_rank, Hand};
use crate::types::Rank;

/// A player hand reduced to the fields the evaluator's cache keys on. Two
/// hands with the same total and softness are interchangeable to the DP.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct PlayerState {
    pub total: i32,
    pub soft: bool,
}

impl PlayerState {
    pub fn from_two(first: Rank, second: Rank) -> Self {
        let (total, soft) = add_rank(0, false, first);
        let (total, soft) = add_rank(total, soft, second);
        PlayerState { total, soft }
    }
}

impl From<&Hand> for PlayerState {
    fn from(hand: &Hand) -> Self {
        PlayerState {
            total: hand.total(),
            soft: hand.is_soft(),
        }
    }
}

impl ops::Add<Rank> for PlayerState {
    type Output = PlayerState;

    fn add(self, rhs: Rank) -> Self::Output {
        let (total, soft) = add_rank(self.total, self.soft, rhs);
        PlayerState { total, soft }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand;
    use crate::types::{A, T};

    #[test]
    fn test_from_two() {
        // Rank indices: a seven sits at 6, a six at 5.
        assert_eq!(
            PlayerState::from_two(A, 6),
            PlayerState { total: 18, soft: true }
        );
        assert_eq!(
            PlayerState::from_two(A, A),
            PlayerState { total: 12, soft: true }
        );
        assert_eq!(
            PlayerState::from_two(T, 5),
            PlayerState { total: 16, soft: false }
        );
    }

    #[test]
    fn test_matches_hand_view() {
        let hand = hand![A, 3, T]; // ace, four, ten
        assert_eq!(
            PlayerState::from(&hand),
            PlayerState { total: 15, soft: false }
        );
    }

    #[test]
    fn test_add_demotes_soft() {
        let soft18 = PlayerState { total: 18, soft: true };
        // Drawing a nine (index 8) demotes; a three (index 2) makes 21.
        assert_eq!(soft18 + 8, PlayerState { total: 17, soft: false });
        assert_eq!(soft18 + 2, PlayerState { total: 21, soft: true });
    }
}
