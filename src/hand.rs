use std::ops;
use std::ops::Index;

use crate::error::CoreError;
use crate::types::{rank_from_symbol, rank_value, Rank, A, T};

/// A hand of cards belonging to a player or dealer.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub struct Hand {
    /// All cards in this hand.
    pub cards: Vec<Rank>,
}

#[macro_export]
macro_rules! hand {
    ( $( $x:expr ),* ) => {
        {
            let mut temp_vec = Vec::new();
            $(
                temp_vec.push($x);
            )*
            $crate::hand::Hand { cards: temp_vec }
        }
    };
}

impl Hand {
    /// Parse a hand from wire rank symbols. An empty list is a client error.
    pub fn from_symbols(symbols: &[String]) -> Result<Hand, CoreError> {
        if symbols.is_empty() {
            return Err(CoreError::EmptyHand);
        }
        let cards = symbols
            .iter()
            .map(|s| rank_from_symbol(s))
            .collect::<Result<Vec<Rank>, CoreError>>()?;
        Ok(Hand { cards })
    }

    /// Sum total of this hand, returning the "high" total for soft hands but
    /// not accounting for blackjack bonuses or busts.
    pub fn total(&self) -> i32 {
        self.total_internal().0
    }

    /// Checks whether the hand is soft (an ace still counted as 11).
    pub fn is_soft(&self) -> bool {
        self.total_internal().1
    }

    /// A two-card 21.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.total() == 21
    }

    /// Checks whether this hand is exactly two cards of equal rank. This does
    /// NOT check whether a split is allowed, only the shape of the hand.
    pub fn is_pair(&self) -> Option<Rank> {
        if self.cards.len() == 2 && self.cards[0] == self.cards[1] {
            Some(self.cards[0])
        } else {
            None
        }
    }

    fn total_internal(&self) -> (i32, bool) {
        let mut contains_ace = false;
        let mut total: i32 = 0;
        for card in &self.cards {
            total += match *card {
                T => 10,
                A => {
                    contains_ace = true;
                    1 // 11 accounted for below
                }
                n => n as i32 + 1,
            };
        }

        if contains_ace && total <= 11 {
            (total + 10, true)
        } else {
            (total, false)
        }
    }
}

/// Incremental total arithmetic used by the enumeration recursions. Aces come
/// in as 1 and are promoted to 11 only while the total stays at or under 21.
pub fn add_rank(total: i32, soft: bool, rank: Rank) -> (i32, bool) {
    let mut new_total = total + if rank == A { 1 } else { rank_value(rank) };
    let mut new_soft = soft;

    if new_total > 21 && new_soft {
        new_total -= 10;
        new_soft = false;
    }

    if rank == A && new_total <= 11 {
        new_total += 10;
        new_soft = true;
    }

    (new_total, new_soft)
}

impl Index<usize> for Hand {
    type Output = Rank;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cards[index]
    }
}

impl ops::Add<Rank> for Hand {
    type Output = Hand;

    fn add(self, rhs: Rank) -> Self::Output {
        let mut copy = self.cards.clone();
        copy.push(rhs);
        Hand { cards: copy }
    }
}

impl ops::AddAssign<Rank> for Hand {
    fn add_assign(&mut self, rhs: Rank) {
        self.cards.push(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        // Rank indices: a five sits at 4, a six at 5.
        assert_eq!(hand![4, 5].total(), 11);
        assert!(!hand![4, 5].is_soft());
        assert_eq!(hand![A, 5].total(), 17);
        assert!(hand![A, 5].is_soft());
        assert_eq!(hand![A, 5, 4].total(), 12);
        assert!(!hand![A, 5, 4].is_soft());
        assert_eq!(hand![T, T, 1].total(), 22);
    }

    #[test]
    fn test_two_aces_stay_soft() {
        let aces = hand![A, A];
        assert_eq!(aces.total(), 12);
        assert!(aces.is_soft());

        // A third ten forces both aces down to 1.
        let hand = hand![A, A, T];
        assert_eq!(hand.total(), 12);
        assert!(!hand.is_soft());
    }

    #[test]
    fn test_add_rank_matches_hand_totals() {
        let mut total = 0;
        let mut soft = false;
        for &card in &[A, A, T, 8] {
            let next = add_rank(total, soft, card);
            total = next.0;
            soft = next.1;
        }
        let hand = hand![A, A, T, 8];
        assert_eq!((total, soft), (hand.total(), hand.is_soft()));
    }

    #[test]
    fn test_soft_demotion_on_overflow() {
        // Soft 17 plus a ten demotes the ace instead of busting.
        assert_eq!(add_rank(17, true, T), (17, false));
        // Hard 16 plus a ten busts.
        assert_eq!(add_rank(16, false, T), (26, false));
    }

    #[test]
    fn test_pairs_and_blackjack() {
        assert_eq!(hand![8, 8].is_pair(), Some(8));
        assert_eq!(hand![8, 7].is_pair(), None);
        assert_eq!(hand![8, 8, 8].is_pair(), None);
        assert!(hand![A, T].is_blackjack());
        assert!(!hand![A, 5, 5].is_blackjack());
    }

    #[test]
    fn test_from_symbols() {
        let hand = Hand::from_symbols(&["A".into(), "T".into()]).unwrap();
        assert_eq!(hand.cards, vec![A, T]);
        assert_eq!(Hand::from_symbols(&[]), Err(CoreError::EmptyHand));
        assert_eq!(
            Hand::from_symbols(&["A".into(), "K".into()]),
            Err(CoreError::InvalidRank("K".to_string()))
        );
    }
}
