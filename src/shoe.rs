use std::ops::Index;

use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{PeekConstraint, Rank, A, N_RANKS, T};

/// A shoe of cards, represented by the number of cards of each rank left.
/// Slot order follows the rank indices: Ace first, then 2..9, tens last.
///
/// Immutable by contract throughout the decision core: every removal yields a
/// fresh value, so a `Shoe` held as a cache key is never written through.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Shoe {
    pub counts: [u32; N_RANKS],
}

impl Shoe {
    /// A full shoe of `decks` standard 52-card decks.
    pub fn fresh(decks: u32) -> Self {
        let mut counts = [4 * decks; N_RANKS];
        counts[T] = 16 * decks;
        Shoe { counts }
    }

    /// Build from wire-order counts, rejecting wrong arity and negative slots.
    pub fn from_counts(counts: &[i32]) -> Result<Self, CoreError> {
        if counts.len() != N_RANKS {
            return Err(CoreError::BadCounts(format!(
                "expected {} slots, got {}",
                N_RANKS,
                counts.len()
            )));
        }
        let mut out = [0u32; N_RANKS];
        for (idx, &count) in counts.iter().enumerate() {
            if count < 0 {
                return Err(CoreError::BadCounts(format!(
                    "negative count {} in slot {}",
                    count, idx
                )));
            }
            out[idx] = count as u32;
        }
        Ok(Shoe { counts: out })
    }

    pub fn len(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a copy of this shoe with one card of `rank` removed. Callers only
    /// remove ranks they just drew or enumerated with a positive count.
    pub fn removed(&self, rank: Rank) -> Self {
        assert!(
            self.counts[rank] > 0,
            "removed {} from an empty slot",
            rank
        );
        let mut c = *self;
        c.counts[rank] -= 1;
        c
    }

    /// Checked counterpart of [`Shoe::removed`] for caller-driven removals
    /// (a session store applying observed cards), where an exhausted slot is
    /// a conflict to report rather than a broken invariant.
    pub fn removed_checked(&self, rank: Rank) -> Result<Self, CoreError> {
        if self.counts[rank] == 0 {
            return Err(CoreError::EmptySlot(rank));
        }
        Ok(self.removed(rank))
    }

    /// View with the constraint's excluded rank zeroed, for draw weights
    /// only. Removals during recursion always operate on the unmasked shoe.
    pub fn masked(&self, constraint: PeekConstraint) -> Self {
        let mut c = *self;
        match constraint {
            PeekConstraint::None => {}
            PeekConstraint::NotTen => c.counts[T] = 0,
            PeekConstraint::NotAce => c.counts[A] = 0,
        }
        c
    }

    /// Pick a random card from this shoe without mutating it.
    pub fn random_card(&self) -> Rank {
        let dist = WeightedIndex::new(self.counts).unwrap();
        dist.sample(&mut rand::thread_rng()) as Rank
    }

    /// Draw a random card from this shoe and remove it.
    pub fn draw(&mut self) -> Rank {
        let card = self.random_card();
        self.counts[card] -= 1;
        card
    }
}

impl Index<Rank> for Shoe {
    type Output = u32;

    fn index(&self, index: Rank) -> &Self::Output {
        self.counts.index(index)
    }
}

/// Create a fresh shoe containing the given number of standard 52-card decks.
#[macro_export]
macro_rules! shoe {
    ($decks:expr) => {
        $crate::shoe::Shoe::fresh($decks)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_composition() {
        let shoe = Shoe::fresh(8);
        assert_eq!(shoe.len(), 8 * 52);
        assert_eq!(shoe[A], 32);
        assert_eq!(shoe[T], 128);
        assert_eq!(shoe[4], 32);
    }

    #[test]
    fn test_removed_is_copy_on_write() {
        let shoe = Shoe::fresh(1);
        let smaller = shoe.removed(T);
        assert_eq!(shoe[T], 16);
        assert_eq!(smaller[T], 15);
        assert_eq!(smaller.len(), shoe.len() - 1);
    }

    #[test]
    #[should_panic]
    fn test_removed_from_empty_slot_panics() {
        let shoe = Shoe { counts: [0; N_RANKS] };
        shoe.removed(A);
    }

    #[test]
    fn test_removed_checked_reports_empty_slot() {
        let shoe = Shoe::fresh(1).removed(A).removed(A).removed(A).removed(A);
        assert_eq!(shoe.removed_checked(A), Err(CoreError::EmptySlot(A)));

        let smaller = shoe.removed_checked(T).unwrap();
        assert_eq!(smaller[T], 15);
        assert_eq!(shoe[T], 16);
    }

    #[test]
    fn test_masked_view_does_not_mutate() {
        let shoe = Shoe::fresh(2);
        let view = shoe.masked(PeekConstraint::NotTen);
        assert_eq!(view[T], 0);
        assert_eq!(view[A], 8);
        assert_eq!(shoe[T], 32);

        let view = shoe.masked(PeekConstraint::NotAce);
        assert_eq!(view[A], 0);
        assert_eq!(view[T], 32);

        assert_eq!(shoe.masked(PeekConstraint::None), shoe);
    }

    #[test]
    fn test_from_counts_validation() {
        assert!(Shoe::from_counts(&[4; 10]).is_ok());
        assert!(matches!(
            Shoe::from_counts(&[4; 9]),
            Err(CoreError::BadCounts(_))
        ));
        assert!(matches!(
            Shoe::from_counts(&[4, 4, 4, 4, -1, 4, 4, 4, 4, 16]),
            Err(CoreError::BadCounts(_))
        ));
    }

    #[test]
    fn test_removal_order_is_immaterial() {
        let a = Shoe::fresh(2).removed(A).removed(5).removed(T);
        let b = Shoe::fresh(2).removed(T).removed(A).removed(5);
        assert_eq!(a, b);
    }
}
