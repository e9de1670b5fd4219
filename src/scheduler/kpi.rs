//! Trial quality metrics.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Quality | Sum over groups of the best slot's score |
//! | Matched | Distinct people in groups that have a feasible slot |
//! | If-needed | Matched people needing if-needed time for their group's slot |
//!
//! A member needs if-needed time when their regular availability misses
//! any sampled offset of the slot.
//!
//! Groups without a feasible slot contribute nothing. A facilitator leading
//! several groups is counted once in `matched` and `if_needed`; quality sums
//! over groups.

use super::context::RosterContext;

/// Score of one candidate grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrialScore {
    /// Aggregate quality score.
    pub quality: f64,
    /// Matched-person count.
    pub matched: usize,
    /// Matched people relying on if-needed availability.
    pub if_needed: usize,
}

impl TrialScore {
    /// Scores a grouping given as roster index lists.
    pub fn evaluate(ctx: &RosterContext<'_>, groups: &[Vec<usize>]) -> Self {
        let mut quality = 0.0;
        let mut matched = vec![false; ctx.len()];
        let mut if_needed = vec![false; ctx.len()];

        for members in groups {
            let Some(slot) = ctx.best_slot(members) else {
                continue;
            };
            quality += slot.score;
            for &m in members {
                matched[m] = true;
                if ctx.relies_on_if_needed(m, &slot) {
                    if_needed[m] = true;
                }
            }
        }

        Self {
            quality,
            matched: matched.iter().filter(|&&b| b).count(),
            if_needed: if_needed.iter().filter(|&&b| b).count(),
        }
    }

    /// Whether no better outcome is possible: everyone matched on regular
    /// availability alone.
    pub fn is_perfect(&self, total_people: usize) -> bool {
        self.matched == total_people && self.if_needed == 0
    }
}
