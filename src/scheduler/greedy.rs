//! Randomized greedy grouping (one trial).
//!
//! # Algorithm
//!
//! 1. Order people by `total_available_minutes * jitter`, ascending, so the
//!    hardest-to-place people go first. `jitter` is drawn per person from
//!    `[1 - 0.1r, 1 + 0.1r]` where `r` is the configured randomness.
//! 2. For each person (facilitators are skipped; they only ever seed
//!    groups), collect the groups with room that stay valid with the
//!    person added. Take the first of them, or, when `r > 0` and a uniform
//!    draw exceeds `r`, a uniformly random one.
//! 3. If no group accepts the person and the group cap allows, open a new
//!    group: seeded with the first facilitator that has spare capacity and
//!    can meet with the person, or as a singleton when no facilitators are
//!    configured.
//! 4. Drop groups smaller than `min_people`.
//!
//! Placements are never revisited within a trial.
//!
//! # Complexity
//! O(n * g * s) where n=people, g=groups, s=lattice samples.

use rand::prelude::IndexedRandom;
use rand::Rng;

use super::context::RosterContext;
use crate::config::SchedulerConfig;

/// Runs one greedy trial, returning groups as roster index lists.
pub fn greedy_trial<R: Rng>(
    ctx: &RosterContext<'_>,
    config: &SchedulerConfig,
    rng: &mut R,
) -> Vec<Vec<usize>> {
    let order = placement_order(ctx, config.randomness, rng);
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut cohorts_led = vec![0usize; ctx.len()];
    let group_limit = config.group_limit();

    for person in order {
        if ctx.is_facilitator(person) {
            continue;
        }

        if let Some(g) = choose_group(ctx, &groups, person, config, rng) {
            groups[g].push(person);
            continue;
        }

        if groups.len() >= group_limit {
            continue;
        }

        if ctx.has_facilitators() {
            let people = ctx.people();
            let seed = ctx.facilitators().iter().copied().find(|&f| {
                cohorts_led[f] < config.facilitator_capacity(&people[f].id)
                    && ctx.is_valid(&[f, person])
            });
            if let Some(f) = seed {
                cohorts_led[f] += 1;
                groups.push(vec![f, person]);
            }
        } else {
            groups.push(vec![person]);
        }
    }

    groups.retain(|g| g.len() >= config.min_people);
    groups
}

/// Roster indices sorted by jittered availability, scarcest first.
pub fn placement_order<R: Rng>(
    ctx: &RosterContext<'_>,
    randomness: f64,
    rng: &mut R,
) -> Vec<usize> {
    let keys: Vec<f64> = ctx
        .people()
        .iter()
        .map(|p| {
            let jitter = (1.0 - randomness * 0.1) + rng.random::<f64>() * randomness * 0.2;
            p.total_available_minutes() as f64 * jitter
        })
        .collect();

    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
    order
}

/// Picks an existing group for `person`, if any can take them.
fn choose_group<R: Rng>(
    ctx: &RosterContext<'_>,
    groups: &[Vec<usize>],
    person: usize,
    config: &SchedulerConfig,
    rng: &mut R,
) -> Option<usize> {
    let candidates: Vec<usize> = groups
        .iter()
        .enumerate()
        .filter(|(_, g)| g.len() < config.max_people && ctx.is_valid_with(g, person))
        .map(|(i, _)| i)
        .collect();

    let first = *candidates.first()?;
    if config.randomness > 0.0 && rng.random::<f64>() > config.randomness {
        candidates.choose(rng).copied()
    } else {
        Some(first)
    }
}
