//! Post-hoc size balancing.
//!
//! # Algorithm
//!
//! Local search over single-member moves, at most [`MAX_BALANCE_PASSES`]
//! passes. Each pass:
//!
//! 1. Sort groups by size, largest first (stable).
//! 2. Stop when the largest and smallest differ by at most one member.
//! 3. For every target smaller than the largest by more than one (scanned
//!    from the last index down) and every member of the largest group (in
//!    order), keep moves that leave the target valid. Rate each by the best
//!    slot score of the donor after removal plus the target after addition.
//! 4. Commit the highest-rated move; the first found wins ties. Stop when
//!    no move is feasible.
//!
//! Moving one member from the largest group to a group at least two
//! smaller never widens the size gap and never shrinks a group below the
//! target's size.

use std::collections::HashMap;

use tracing::debug;

use super::context::RosterContext;

/// Upper bound on balancing passes.
pub const MAX_BALANCE_PASSES: usize = 500;

/// Balances group sizes in place. Returns the number of moves made.
pub fn balance_groups(ctx: &RosterContext<'_>, groups: &mut [Vec<usize>]) -> usize {
    let mut moves = 0;

    for _ in 0..MAX_BALANCE_PASSES {
        if groups.len() < 2 {
            break;
        }
        groups.sort_by(|a, b| b.len().cmp(&a.len()));

        let largest = groups[0].len();
        let smallest = groups[groups.len() - 1].len();
        if largest - smallest <= 1 {
            break;
        }

        let Some(step) = best_move(ctx, groups, largest) else {
            break;
        };

        let member = groups[0].remove(step.position);
        groups[step.target].push(member);
        moves += 1;
        debug!(
            person = %ctx.people()[member].id,
            target = step.target,
            quality = step.quality,
            "balancing move"
        );
    }

    moves
}

struct Move {
    target: usize,
    position: usize,
    quality: f64,
}

fn best_move(ctx: &RosterContext<'_>, groups: &[Vec<usize>], largest: usize) -> Option<Move> {
    let mut cache = QualityCache::default();
    let mut best: Option<Move> = None;
    let donor = &groups[0];

    for target in (1..groups.len()).rev() {
        let receiver = &groups[target];
        if receiver.len() + 1 >= largest {
            continue;
        }

        for (position, &member) in donor.iter().enumerate() {
            if !ctx.is_valid_with(receiver, member) {
                continue;
            }

            let mut shrunk = donor.clone();
            shrunk.remove(position);
            let mut grown = receiver.clone();
            grown.push(member);

            let quality = cache.quality(ctx, shrunk) + cache.quality(ctx, grown);
            if quality == f64::NEG_INFINITY {
                continue;
            }
            if best.as_ref().map_or(true, |b| quality > b.quality) {
                best = Some(Move {
                    target,
                    position,
                    quality,
                });
            }
        }
    }

    best
}

/// Best-slot scores keyed by sorted membership. Lives for one pass, so it
/// never outlives a membership change.
#[derive(Default)]
struct QualityCache {
    scores: HashMap<Vec<usize>, f64>,
}

impl QualityCache {
    fn quality(&mut self, ctx: &RosterContext<'_>, mut members: Vec<usize>) -> f64 {
        members.sort_unstable();
        *self.scores.entry(members).or_insert_with_key(|key| {
            ctx.best_slot(key)
                .map_or(f64::NEG_INFINITY, |slot| slot.score)
        })
    }
}
