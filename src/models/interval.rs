//! Weekly availability intervals.
//!
//! Availability is expressed on a single repeating week axis: minutes since
//! Monday 00:00, in `[0, WEEK_MINUTES)`. An interval whose end would fall at
//! or before its start is taken to wrap past the end of the week, so its end
//! is shifted by one full week.
//!
//! # Expression Format
//!
//! `"<Day><HH:MM> <Day><HH:MM>, ..."` with day letters
//! `M T W R F S U` (Monday..Sunday):
//!
//! ```
//! use u_cohort::models::{parse_availability, Interval};
//!
//! let intervals = parse_availability("M09:00 M17:00, R18:30 R20:00");
//! assert_eq!(intervals[0], Interval::new(540, 1020));
//! assert_eq!(intervals[1].duration(), 90);
//! ```
//!
//! Malformed segments are skipped, never reported.

use serde::{Deserialize, Serialize};

/// Minutes in one day.
pub const DAY_MINUTES: u32 = 24 * 60;

/// Minutes in one week (the length of the scheduling axis).
pub const WEEK_MINUTES: u32 = 7 * DAY_MINUTES;

const DAY_LETTERS: [char; 7] = ['M', 'T', 'W', 'R', 'F', 'S', 'U'];
const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// A half-open interval `[start, end)` in minutes since the start of the week.
///
/// `end` may exceed [`WEEK_MINUTES`] for intervals wrapping past Sunday night.
/// Deserialized intervals go through [`Interval::new`], so the wrap rule
/// holds for external input too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawInterval")]
pub struct Interval {
    /// Interval start (minutes, inclusive).
    pub start: u32,
    /// Interval end (minutes, exclusive).
    pub end: u32,
}

#[derive(Deserialize)]
struct RawInterval {
    start: u32,
    end: u32,
}

impl From<RawInterval> for Interval {
    fn from(raw: RawInterval) -> Self {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Creates an interval, wrapping `end` by one week when `end <= start`.
    pub fn new(start: u32, end: u32) -> Self {
        let end = if end <= start { end + WEEK_MINUTES } else { end };
        Self { start, end }
    }

    /// Length of this interval (minutes).
    #[inline]
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }

    /// Whether a minute offset falls within this interval.
    #[inline]
    pub fn contains(&self, minute: u32) -> bool {
        minute >= self.start && minute < self.end
    }
}

/// Parses a comma-separated availability expression into intervals.
pub fn parse_availability(expr: &str) -> Vec<Interval> {
    expr.split(',').filter_map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Option<Interval> {
    let mut parts = segment.split_whitespace();
    let start = parse_day_time(parts.next()?)?;
    let end = parse_day_time(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(Interval::new(start, end))
}

/// Parses a single `<Day><HH:MM>` token into a week offset (minutes).
///
/// Returns `None` for an unknown day letter or an invalid clock time.
pub fn parse_day_time(token: &str) -> Option<u32> {
    let mut chars = token.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    let day = DAY_LETTERS.iter().position(|&d| d == letter)? as u32;

    let (hours, minutes) = chars.as_str().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }

    Some(day * DAY_MINUTES + hours * 60 + minutes)
}

/// Formats a week offset as `"Mon 09:00"`. Offsets past the week wrap.
pub fn format_minute(minute: u32) -> String {
    let minute = minute % WEEK_MINUTES;
    let day = (minute / DAY_MINUTES) as usize;
    let in_day = minute % DAY_MINUTES;
    format!("{} {:02}:{:02}", DAY_NAMES[day], in_day / 60, in_day % 60)
}

/// Formats a meeting range.
///
/// Names the weekday once when both ends fall on the same day
/// (`"Mon 09:00 - 10:00"`), and both weekdays when the range crosses
/// midnight (`"Mon 23:30 - Tue 00:30"`).
pub fn format_range(start: u32, end: u32) -> String {
    let same_day = end > start && (end - 1) / DAY_MINUTES == start / DAY_MINUTES;
    if same_day {
        let in_day = end % DAY_MINUTES;
        format!("{} - {:02}:{:02}", format_minute(start), in_day / 60, in_day % 60)
    } else {
        format!("{} - {}", format_minute(start), format_minute(end))
    }
}
