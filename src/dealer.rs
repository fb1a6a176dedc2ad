use std::ops;

use memoize::memoize;

use crate::hand::add_rank;
use crate::shoe::Shoe;
use crate::types::{rank_value, PeekConstraint, Rank, A, RANKS};

/// A partial dealer hand reduced to the fields the cache keys on.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct DealerState {
    pub total: i32,
    pub soft: bool,
}

impl DealerState {
    /// Starting state contributed by the upcard alone.
    pub fn from_upcard(upcard: Rank) -> Self {
        DealerState {
            total: rank_value(upcard),
            soft: upcard == A,
        }
    }

    fn must_draw(&self, h17: bool) -> bool {
        self.total < 17 || (h17 && self.soft && self.total == 17)
    }
}

impl ops::Add<Rank> for DealerState {
    type Output = DealerState;

    fn add(self, rhs: Rank) -> Self::Output {
        let (total, soft) = add_rank(self.total, self.soft, rhs);
        DealerState { total, soft }
    }
}

/// Probability mass over the dealer's final totals: 17 through 21, bust, and
/// one slot for the degenerate freeze below 17 when the shoe runs dry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DealerPmf {
    buckets: [f64; 7],
}

const BUCKET_BUST: usize = 5;
const BUCKET_UNFINISHED: usize = 6;

impl DealerPmf {
    fn certain(state: DealerState) -> Self {
        let mut pmf = DealerPmf::default();
        if state.total > 21 {
            pmf.buckets[BUCKET_BUST] = 1.0;
        } else if state.total >= 17 {
            pmf.buckets[(state.total - 17) as usize] = 1.0;
        } else {
            pmf.buckets[BUCKET_UNFINISHED] = 1.0;
        }
        pmf
    }

    /// Probability of finishing on exactly `total` (17..=21).
    pub fn p_total(&self, total: i32) -> f64 {
        if (17..=21).contains(&total) {
            self.buckets[(total - 17) as usize]
        } else {
            0.0
        }
    }

    pub fn p_bust(&self) -> f64 {
        self.buckets[BUCKET_BUST]
    }

    pub fn sum(&self) -> f64 {
        self.buckets.iter().sum()
    }

    fn add_scaled(&mut self, child: &DealerPmf, p: f64) {
        for (bucket, value) in self.buckets.iter_mut().zip(child.buckets) {
            *bucket += p * value;
        }
    }
}

/// Exact distribution of the dealer's final total from a partial hand against
/// the remaining shoe, by enumeration over every draw order. The shoe must
/// already exclude the dealer's own visible cards.
///
/// `constraint` restricts only the immediate next draw (the hole card under a
/// cleared US peek): children recurse under `PeekConstraint::None`, so their
/// cached distributions are shared across constrained and unconstrained
/// contexts and the constraint is never re-applied to later draws.
#[memoize(Capacity: 200_000)]
pub fn dealer_pmf(dealer: DealerState, shoe: Shoe, h17: bool, constraint: PeekConstraint) -> DealerPmf {
    if dealer.total > 21 || !dealer.must_draw(h17) {
        return DealerPmf::certain(dealer);
    }

    let weights = shoe.masked(constraint);
    let remaining = weights.len();
    if remaining == 0 {
        return DealerPmf::certain(dealer);
    }

    let mut pmf = DealerPmf::default();
    for rank in RANKS {
        if weights[rank] == 0 {
            continue;
        }
        let p = weights[rank] as f64 / remaining as f64;
        // The constraint shapes this draw's weights only; the card leaves the
        // unmasked shoe, and the continuation draws without restriction.
        let child = dealer_pmf(dealer + rank, shoe.removed(rank), h17, PeekConstraint::None);
        pmf.add_scaled(&child, p);
    }
    pmf
}

pub fn clear_cache() {
    memoized_flush_dealer_pmf();
}
