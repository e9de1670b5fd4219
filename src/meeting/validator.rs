//! Group feasibility probe.
//!
//! Answers one question: is there any start time at which every member can
//! attend for the whole (sampled) meeting? It stops at the first such start
//! and does not rank windows; ranking is the finder's job.

use std::collections::BTreeSet;

use super::grid::{AvailabilityGrid, SampleMask, SlotGeometry};
use crate::models::Person;

/// Whether a group of people can meet.
///
/// # Rules
/// 1. An empty group is always valid.
/// 2. With a non-empty facilitator set, exactly one member must be a
///    facilitator. An empty set is the same as `None`.
/// 3. Some start `t` on the increment lattice must exist where every member
///    is available (regular, or if-needed when enabled) at every sampled
///    offset of the meeting.
///
/// # Panics
/// Panics if `meeting_length` or `increment` is zero.
///
/// # Example
/// ```
/// use u_cohort::meeting::is_group_valid;
/// use u_cohort::models::Person;
///
/// let a = Person::new("a").with_availability("M09:00 M11:00");
/// let b = Person::new("b").with_availability("M10:00 M12:00");
/// assert!(is_group_valid(&[&a, &b], 60, 30, true, None));
/// assert!(!is_group_valid(&[&a, &b], 90, 30, true, None));
/// ```
pub fn is_group_valid(
    people: &[&Person],
    meeting_length: u32,
    increment: u32,
    use_if_needed: bool,
    facilitators: Option<&BTreeSet<String>>,
) -> bool {
    if people.is_empty() {
        return true;
    }

    if let Some(facilitators) = facilitators.filter(|f| !f.is_empty()) {
        let count = people.iter().filter(|p| facilitators.contains(&p.id)).count();
        if count != 1 {
            return false;
        }
    }

    let geometry = SlotGeometry::new(meeting_length, increment);
    let grids: Vec<AvailabilityGrid> = people
        .iter()
        .map(|p| AvailabilityGrid::build(p, &geometry, use_if_needed))
        .collect();
    let refs: Vec<&AvailabilityGrid> = grids.iter().collect();
    grids_share_slot(&refs, &geometry)
}

/// Grid-level feasibility: whether the members' availability intersects in
/// a run long enough for one meeting.
pub fn grids_share_slot(grids: &[&AvailabilityGrid], geometry: &SlotGeometry) -> bool {
    first_common_start(grids, geometry).is_some()
}

/// The earliest feasible start index, if any.
pub fn first_common_start(grids: &[&AvailabilityGrid], geometry: &SlotGeometry) -> Option<usize> {
    let mut common = SampleMask::full(geometry.sample_count());
    for grid in grids {
        common.and_with(grid.available());
    }
    common.first_run(geometry.offset_count(), geometry.start_count())
}
