//! Group (cohort) and scheduling result models.
//!
//! A group references its members by person ID; the engine never owns or
//! mutates people. A finalized group carries its selected meeting time, or
//! `None` when no common slot exists and the group needs attention upstream.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::interval::format_range;

/// A selected weekly meeting time `[start, end)` in week minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingTime {
    /// Meeting start (minutes since Monday 00:00).
    pub start: u32,
    /// Meeting end (exclusive).
    pub end: u32,
}

impl MeetingTime {
    /// Creates a meeting time.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Meeting length (minutes).
    #[inline]
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}

impl fmt::Display for MeetingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_range(self.start, self.end))
    }
}

/// A cohort of people sharing a weekly meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Group identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Member person IDs, in placement order.
    pub members: Vec<String>,
    /// Facilitator person ID. Always one of `members` when set.
    pub facilitator: Option<String>,
    /// Chosen meeting time, filled in at finalization.
    pub selected_time: Option<MeetingTime>,
    /// Quality score of the selected time (0.0 when none).
    pub quality: f64,
    /// Members who need if-needed availability to attend `selected_time`.
    pub if_needed_members: Vec<String>,
}

impl Group {
    /// Creates an empty group.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            members: Vec::new(),
            facilitator: None,
            selected_time: None,
            quality: 0.0,
            if_needed_members: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a member.
    pub fn with_member(mut self, person_id: impl Into<String>) -> Self {
        self.members.push(person_id.into());
        self
    }

    /// Sets the facilitator (also added as a member if absent).
    pub fn with_facilitator(mut self, person_id: impl Into<String>) -> Self {
        let person_id = person_id.into();
        if !self.members.contains(&person_id) {
            self.members.push(person_id.clone());
        }
        self.facilitator = Some(person_id);
        self
    }

    /// Number of members.
    #[inline]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Whether a person is a member.
    pub fn contains(&self, person_id: &str) -> bool {
        self.members.iter().any(|m| m == person_id)
    }

    /// Whether a meeting time has been selected.
    pub fn has_time(&self) -> bool {
        self.selected_time.is_some()
    }
}

/// Run statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulingStats {
    /// Number of people in the input roster.
    pub total_people: usize,
    /// People placed in a group with a feasible meeting time.
    pub matched_people: usize,
    /// Sum of per-group quality scores.
    pub quality_score: f64,
    /// Matched people relying on if-needed availability.
    pub if_needed_people: usize,
    /// Trials actually run.
    pub iterations_run: usize,
    /// Index of the winning trial (`None` when no trial ran).
    pub best_iteration: Option<usize>,
    /// Moves committed by the balancer.
    pub balance_moves: usize,
}

/// Outcome of a scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulingResult {
    /// Finalized groups.
    pub groups: Vec<Group>,
    /// IDs of people not placed in any group.
    pub unassigned: Vec<String>,
    /// Run statistics.
    pub stats: SchedulingStats,
}

impl SchedulingResult {
    /// A result with no groups, every listed person unassigned.
    pub fn empty(unassigned: Vec<String>) -> Self {
        Self {
            groups: Vec::new(),
            stats: SchedulingStats {
                total_people: unassigned.len(),
                ..Default::default()
            },
            unassigned,
        }
    }

    /// Groups that exist but have no feasible meeting time.
    pub fn groups_without_time(&self) -> Vec<&Group> {
        self.groups.iter().filter(|g| !g.has_time()).collect()
    }

    /// The group containing a person, if any.
    pub fn group_of(&self, person_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(person_id))
    }

    /// Number of people placed in some group.
    pub fn assigned_count(&self) -> usize {
        self.groups.iter().map(Group::size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_time_display() {
        let t = MeetingTime::new(540, 600);
        assert_eq!(t.duration(), 60);
        assert_eq!(t.to_string(), "Mon 09:00 - 10:00");
        assert_eq!(MeetingTime::new(1410, 1470).to_string(), "Mon 23:30 - Tue 00:30");
    }

    #[test]
    fn test_group_builder() {
        let g = Group::new("group-1")
            .with_name("Group 1")
            .with_member("a")
            .with_facilitator("f")
            .with_member("b");

        assert_eq!(g.size(), 3);
        assert_eq!(g.members, vec!["a", "f", "b"]);
        assert_eq!(g.facilitator.as_deref(), Some("f"));
        assert!(g.contains("b"));
        assert!(!g.contains("z"));
        assert!(!g.has_time());
    }

    #[test]
    fn test_facilitator_not_duplicated() {
        let g = Group::new("g").with_member("f").with_facilitator("f");
        assert_eq!(g.members, vec!["f"]);
    }

    #[test]
    fn test_result_queries() {
        let mut timed = Group::new("g1").with_member("a").with_member("b");
        timed.selected_time = Some(MeetingTime::new(0, 60));
        let untimed = Group::new("g2").with_member("c");

        let result = SchedulingResult {
            groups: vec![timed, untimed],
            unassigned: vec!["d".into()],
            stats: SchedulingStats::default(),
        };

        assert_eq!(result.assigned_count(), 3);
        assert_eq!(result.group_of("c").map(|g| g.id.as_str()), Some("g2"));
        assert!(result.group_of("d").is_none());
        let missing: Vec<&str> = result
            .groups_without_time()
            .iter()
            .map(|g| g.id.as_str())
            .collect();
        assert_eq!(missing, vec!["g2"]);
    }

    #[test]
    fn test_empty_result() {
        let result = SchedulingResult::empty(vec!["a".into(), "b".into()]);
        assert!(result.groups.is_empty());
        assert_eq!(result.unassigned.len(), 2);
        assert_eq!(result.stats.total_people, 2);
        assert_eq!(result.stats.iterations_run, 0);
        assert_eq!(result.stats.best_iteration, None);
    }

    #[test]
    fn test_result_serialization() {
        let mut g = Group::new("g1").with_name("Group 1").with_member("a");
        g.selected_time = Some(MeetingTime::new(540, 600));
        let result = SchedulingResult {
            groups: vec![g],
            unassigned: vec![],
            stats: SchedulingStats::default(),
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: SchedulingResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.groups[0].selected_time, Some(MeetingTime::new(540, 600)));
        assert_eq!(back.stats, result.stats);
    }
}
