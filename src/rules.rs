use serde::{Deserialize, Serialize};

use crate::types::PeekRule;

/// Table rules the core consumes. Passed by value into every decision; the
/// engine holds no rule state of its own.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Dealer hits soft 17 when true, stands on all 17s otherwise.
    pub h17: bool,
    /// Payout multiplier for a player natural.
    pub bj_payout: f64,
    /// Double after split permitted.
    pub das: bool,
    /// Cap on splits; total hands never exceed `max_splits + 1`, and 0
    /// disables splitting entirely.
    pub max_splits: u32,
    /// Split aces receive exactly one card each, with no further action.
    pub split_aces_one: bool,
    pub peek_rule: PeekRule,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            h17: true,
            bj_payout: 1.5,
            das: true,
            max_splits: 3,
            split_aces_one: true,
            peek_rule: PeekRule::US,
        }
    }
}

/// Evaluator knobs, separate from table rules so a service can tune them per
/// deployment without touching game semantics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Recursion depth of the hit evaluator; at depth 0 the player is assumed
    /// to hit once and then stand.
    pub dp_depth: u32,
    /// Depth used for hands whose double right is still alive (split children
    /// under DAS). Falls back to `dp_depth` when unset.
    pub dp_depth_double: Option<u32>,
    /// Conservative bias against doubling, in per-stake EV units.
    pub double_margin: f64,
    /// Tolerance for action ties.
    pub tie_eps: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            dp_depth: 3,
            dp_depth_double: None,
            double_margin: 0.0,
            tie_eps: 1e-9,
        }
    }
}

impl Tuning {
    pub fn split_child_depth(&self) -> u32 {
        self.dp_depth_double.unwrap_or(self.dp_depth)
    }
}
