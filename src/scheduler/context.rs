//! Per-run roster context.
//!
//! Samples every person's availability once per run and answers the
//! feasibility and quality questions the heuristic, the scorer and the
//! balancer ask about index-based member lists.

use crate::config::SchedulerConfig;
use crate::meeting::{best_slot, AvailabilityGrid, MeetingSlot, SampleMask, SlotGeometry};
use crate::models::Person;

/// Read-only state shared by all trials of a run.
///
/// Members are referred to by their index in the roster slice.
#[derive(Debug, Clone)]
pub struct RosterContext<'a> {
    people: &'a [Person],
    geometry: SlotGeometry,
    grids: Vec<AvailabilityGrid>,
    facilitator: Vec<bool>,
    facilitators: Vec<usize>,
}

impl<'a> RosterContext<'a> {
    /// Builds the context for a roster and configuration.
    ///
    /// # Panics
    /// Panics if the meeting length or increment is zero; validate the
    /// configuration first.
    pub fn new(people: &'a [Person], config: &SchedulerConfig) -> Self {
        let geometry = SlotGeometry::new(config.meeting_length, config.time_increment);
        let grids = people
            .iter()
            .map(|p| AvailabilityGrid::build(p, &geometry, config.use_if_needed))
            .collect();
        let facilitator: Vec<bool> = people
            .iter()
            .map(|p| config.facilitator_ids.contains(&p.id))
            .collect();
        let facilitators = (0..people.len()).filter(|&i| facilitator[i]).collect();

        Self {
            people,
            geometry,
            grids,
            facilitator,
            facilitators,
        }
    }

    /// The roster.
    #[inline]
    pub fn people(&self) -> &'a [Person] {
        self.people
    }

    /// Number of people in the roster.
    #[inline]
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether the roster is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Sampling lattice.
    #[inline]
    pub fn geometry(&self) -> &SlotGeometry {
        &self.geometry
    }

    /// A person's sampled availability.
    #[inline]
    pub fn grid(&self, person: usize) -> &AvailabilityGrid {
        &self.grids[person]
    }

    /// Whether the facilitator constraint applies to this roster.
    #[inline]
    pub fn has_facilitators(&self) -> bool {
        !self.facilitators.is_empty()
    }

    /// Whether a person is a facilitator.
    #[inline]
    pub fn is_facilitator(&self, person: usize) -> bool {
        self.facilitator[person]
    }

    /// Facilitator indices in roster order.
    #[inline]
    pub fn facilitators(&self) -> &[usize] {
        &self.facilitators
    }

    /// Whether `members` form a valid group.
    pub fn is_valid(&self, members: &[usize]) -> bool {
        self.check(members.iter().copied())
    }

    /// Whether `members` plus `extra` would form a valid group.
    pub fn is_valid_with(&self, members: &[usize], extra: usize) -> bool {
        self.check(members.iter().copied().chain(std::iter::once(extra)))
    }

    fn check(&self, members: impl Iterator<Item = usize> + Clone) -> bool {
        if members.clone().next().is_none() {
            return true;
        }
        if self.has_facilitators() {
            let count = members.clone().filter(|&m| self.facilitator[m]).count();
            if count != 1 {
                return false;
            }
        }

        let mut common = SampleMask::full(self.geometry.sample_count());
        for m in members {
            common.and_with(self.grids[m].available());
        }
        common
            .first_run(self.geometry.offset_count(), self.geometry.start_count())
            .is_some()
    }

    /// Best meeting slot for `members` (highest score, earliest start).
    pub fn best_slot(&self, members: &[usize]) -> Option<MeetingSlot> {
        let grids: Vec<&AvailabilityGrid> =
            members.iter().map(|&m| &self.grids[m]).collect();
        best_slot(&grids, &self.geometry)
    }

    /// Whether a member needs if-needed availability to attend `slot`.
    pub fn relies_on_if_needed(&self, member: usize, slot: &MeetingSlot) -> bool {
        let start = self.geometry.index_of(slot.start);
        !self.grids[member].regular_covers(start, &self.geometry)
    }
}
