//! Meeting window search.
//!
//! Provides the two primitives the grouping heuristic is built on:
//!
//! - [`is_group_valid`]: cheap boolean feasibility probe, called for every
//!   tentative placement.
//! - [`find_meeting_times`]: ranked list of feasible windows with quality
//!   scores, used to score trials and to fix each group's meeting time.
//!
//! Both scan the same lattice: start times every `increment` minutes across
//! the week, offsets every `increment` minutes across the meeting. They
//! therefore agree on feasibility. The grid-level variants
//! ([`grids_share_slot`], [`score_slots`], [`best_slot`]) work on
//! pre-sampled [`AvailabilityGrid`]s so repeated calls skip interval scans.

mod finder;
mod grid;
mod validator;

pub use finder::{best_slot, find_meeting_times, score_slots, MeetingSlot};
pub use grid::{AvailabilityGrid, SampleMask, SlotGeometry};
pub use validator::{first_common_start, grids_share_slot, is_group_valid};
