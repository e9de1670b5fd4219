//! Cohort scheduling domain models.
//!
//! Provides the data types the engine consumes (people and their weekly
//! availability) and emits (groups with selected meeting times, unassigned
//! people, run statistics).
//!
//! # Time Model
//! All times are minutes on a single repeating week axis starting Monday
//! 00:00. Timezone conversion happens upstream.

mod group;
mod interval;
mod person;

pub use group::{Group, MeetingTime, SchedulingResult, SchedulingStats};
pub use interval::{
    format_minute, format_range, parse_availability, parse_day_time, Interval, DAY_MINUTES,
    WEEK_MINUTES,
};
pub use person::{Coverage, Person};
