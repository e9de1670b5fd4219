//! Person (participant) model.
//!
//! A person carries two availability lists: *regular* intervals, and
//! lower-priority *if-needed* intervals usable only as a fallback.
//! People are immutable for the duration of a scheduling run.

use serde::{Deserialize, Serialize};

use super::interval::{parse_availability, Interval};

/// How a person is covered at a given minute.
///
/// Ordered from worst to best, so `max` picks the stronger coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Coverage {
    /// Not available.
    Unavailable,
    /// Available only through if-needed intervals.
    IfNeeded,
    /// Available through regular intervals.
    Regular,
}

impl Coverage {
    /// Quality weight contributed to a meeting score.
    #[inline]
    pub fn weight(self) -> f64 {
        match self {
            Coverage::Regular => 1.0,
            Coverage::IfNeeded => 0.9,
            Coverage::Unavailable => 0.0,
        }
    }

    /// Whether the person can attend at all.
    #[inline]
    pub fn is_available(self) -> bool {
        self != Coverage::Unavailable
    }
}

/// A participant to be placed into a group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    /// Unique person identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Regular availability.
    pub regular: Vec<Interval>,
    /// Fallback availability.
    pub if_needed: Vec<Interval>,
    /// Advisory timezone label. Informational only; intervals are already
    /// expressed on the shared week axis.
    pub timezone: Option<String>,
}

impl Person {
    /// Creates a person with no availability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            regular: Vec::new(),
            if_needed: Vec::new(),
            timezone: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends regular intervals parsed from an availability expression.
    pub fn with_availability(mut self, expr: &str) -> Self {
        self.regular.extend(parse_availability(expr));
        self
    }

    /// Appends if-needed intervals parsed from an availability expression.
    pub fn with_if_needed(mut self, expr: &str) -> Self {
        self.if_needed.extend(parse_availability(expr));
        self
    }

    /// Adds a regular interval.
    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.regular.push(interval);
        self
    }

    /// Adds an if-needed interval.
    pub fn with_if_needed_interval(mut self, interval: Interval) -> Self {
        self.if_needed.push(interval);
        self
    }

    /// Sets the advisory timezone label.
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Total available minutes (regular + if-needed).
    ///
    /// A plain sum: overlapping intervals are counted twice.
    pub fn total_available_minutes(&self) -> u32 {
        self.regular
            .iter()
            .chain(&self.if_needed)
            .map(Interval::duration)
            .sum()
    }

    /// Whether the person has any availability at all.
    pub fn has_availability(&self) -> bool {
        !self.regular.is_empty() || !self.if_needed.is_empty()
    }

    /// Coverage at a minute offset.
    ///
    /// Regular coverage wins over if-needed. If-needed intervals are only
    /// consulted when `use_if_needed` is set.
    pub fn coverage_at(&self, minute: u32, use_if_needed: bool) -> Coverage {
        if self.regular.iter().any(|w| w.contains(minute)) {
            Coverage::Regular
        } else if use_if_needed && self.if_needed.iter().any(|w| w.contains(minute)) {
            Coverage::IfNeeded
        } else {
            Coverage::Unavailable
        }
    }
}
