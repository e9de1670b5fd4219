//! Meeting window discovery and scoring.
//!
//! # Quality Score
//!
//! At each sampled offset of a candidate meeting, every member contributes
//! `1.0` when covered by regular availability and `0.9` when covered only by
//! if-needed availability; any uncovered member makes the candidate
//! infeasible. The candidate's score is the **minimum** of these per-offset
//! sums, so a meeting is only as good as its weakest moment.
//!
//! # Ordering
//! Feasible slots are returned by descending score. Equal scores keep
//! ascending start order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::grid::{AvailabilityGrid, SlotGeometry};
use crate::models::{Coverage, MeetingTime, Person};

/// A feasible meeting window with its quality score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeetingSlot {
    /// Start (minutes since Monday 00:00).
    pub start: u32,
    /// End (exclusive): `start + meeting_length`.
    pub end: u32,
    /// Minimum summed coverage weight over the meeting.
    pub score: f64,
}

impl MeetingSlot {
    /// The slot as a meeting time.
    pub fn time(&self) -> MeetingTime {
        MeetingTime::new(self.start, self.end)
    }
}

/// Finds every feasible meeting window for a set of people, best first.
///
/// An empty group yields every start time with score `0.0`; a group with
/// no common window yields an empty list.
///
/// # Panics
/// Panics if `meeting_length` or `increment` is zero.
///
/// # Example
/// ```
/// use u_cohort::meeting::find_meeting_times;
/// use u_cohort::models::Person;
///
/// let a = Person::new("a").with_availability("M09:00 M11:00");
/// let b = Person::new("b")
///     .with_availability("M10:00 M11:00")
///     .with_if_needed("M09:00 M10:00");
///
/// let slots = find_meeting_times(&[&a, &b], 60, 30, true);
/// assert_eq!(slots[0].start, 600); // both regular
/// assert_eq!(slots[0].score, 2.0);
/// assert_eq!(slots.len(), 3);
/// ```
pub fn find_meeting_times(
    people: &[&Person],
    meeting_length: u32,
    increment: u32,
    use_if_needed: bool,
) -> Vec<MeetingSlot> {
    let geometry = SlotGeometry::new(meeting_length, increment);
    let grids: Vec<AvailabilityGrid> = people
        .iter()
        .map(|p| AvailabilityGrid::build(p, &geometry, use_if_needed))
        .collect();
    let refs: Vec<&AvailabilityGrid> = grids.iter().collect();
    score_slots(&refs, &geometry)
}

/// Grid-level finder: all feasible slots sorted by descending score.
pub fn score_slots(grids: &[&AvailabilityGrid], geometry: &SlotGeometry) -> Vec<MeetingSlot> {
    let mut slots = feasible_slots(grids, geometry);
    // Stable sort keeps ascending start order among equal scores
    slots.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    slots
}

/// The best slot: highest score, earliest start among ties.
///
/// Equivalent to the first entry of [`score_slots`] without sorting.
pub fn best_slot(grids: &[&AvailabilityGrid], geometry: &SlotGeometry) -> Option<MeetingSlot> {
    let mut best: Option<MeetingSlot> = None;
    for slot in feasible_slots(grids, geometry) {
        match best {
            Some(b) if slot.score <= b.score => {}
            _ => best = Some(slot),
        }
    }
    best
}

/// Feasible slots in ascending start order.
fn feasible_slots(grids: &[&AvailabilityGrid], geometry: &SlotGeometry) -> Vec<MeetingSlot> {
    let sums = sample_sums(grids, geometry);
    let offsets = geometry.offset_count();
    let mut slots = Vec::new();

    for start in 0..geometry.start_count() {
        let mut score = f64::INFINITY;
        let mut feasible = true;
        for sum in &sums[start..start + offsets] {
            match sum {
                Some(s) => score = score.min(*s),
                None => {
                    feasible = false;
                    break;
                }
            }
        }
        if feasible {
            let minute = geometry.minute_at(start);
            slots.push(MeetingSlot {
                start: minute,
                end: minute + geometry.meeting_length(),
                score,
            });
        }
    }

    slots
}

/// Per-sample summed coverage weight, `None` where someone is unavailable.
fn sample_sums(grids: &[&AvailabilityGrid], geometry: &SlotGeometry) -> Vec<Option<f64>> {
    (0..geometry.sample_count())
        .map(|i| {
            let mut sum = 0.0;
            for grid in grids {
                let coverage = grid.coverage(i);
                if coverage == Coverage::Unavailable {
                    return None;
                }
                sum += coverage.weight();
            }
            Some(sum)
        })
        .collect()
}
