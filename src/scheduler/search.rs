//! Trial search controller and finalization.
//!
//! # Algorithm
//!
//! 1. Run up to `num_iterations` independent greedy trials.
//! 2. Score each trial ([`TrialScore`]); a trial replaces the incumbent only
//!    on strictly higher quality, so the first of equal trials is kept.
//! 3. Stop early when a trial matches everyone on regular availability,
//!    when the stop signal is raised, or when the time limit passes. All
//!    three are checked at trial boundaries.
//! 4. Balance the winning grouping (optional), then fix each group's
//!    meeting time to its best slot.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::balance::balance_groups;
use super::context::RosterContext;
use super::greedy::greedy_trial;
use super::kpi::TrialScore;
use crate::config::{ConfigError, SchedulerConfig};
use crate::models::{Group, Person, SchedulingResult, SchedulingStats};
use crate::validation::validate_roster;

/// Iterations between progress reports.
pub const PROGRESS_INTERVAL: usize = 100;

/// Progress snapshot passed to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Current trial index.
    pub iteration: usize,
    /// Configured number of trials.
    pub total: usize,
    /// Best quality score so far.
    pub best_quality: f64,
    /// Roster size.
    pub total_people: usize,
}

type ProgressFn = dyn Fn(&Progress) + Send + Sync;

/// Cohort scheduler: trial search, balancing and finalization.
///
/// # Example
///
/// ```
/// use u_cohort::config::SchedulerConfig;
/// use u_cohort::models::Person;
/// use u_cohort::scheduler::CohortScheduler;
///
/// let people: Vec<Person> = (0..5)
///     .map(|i| Person::new(format!("p{i}")).with_availability("T18:00 T21:00"))
///     .collect();
/// let config = SchedulerConfig::default().with_iterations(20).with_seed(1);
///
/// let result = CohortScheduler::new(config).schedule(&people).unwrap();
/// assert_eq!(result.groups.len(), 1);
/// assert_eq!(result.groups[0].selected_time.unwrap().to_string(), "Tue 18:00 - 19:00");
/// assert!(result.unassigned.is_empty());
/// ```
#[derive(Clone)]
pub struct CohortScheduler {
    config: SchedulerConfig,
    progress: Option<Arc<ProgressFn>>,
    stop: Option<Arc<AtomicBool>>,
}

struct Incumbent {
    groups: Vec<Vec<usize>>,
    score: TrialScore,
    iteration: usize,
}

impl CohortScheduler {
    /// Creates a scheduler.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            progress: None,
            stop: None,
        }
    }

    /// Sets a progress callback, invoked every [`PROGRESS_INTERVAL`] trials.
    pub fn with_progress(
        mut self,
        callback: impl Fn(&Progress) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Arc::new(callback));
        self
    }

    /// Sets a stop signal checked before each trial.
    pub fn with_stop_signal(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// The configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedules a roster, seeding the RNG from `config.seed` (or the OS).
    pub fn schedule(&self, people: &[Person]) -> Result<SchedulingResult, ConfigError> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.schedule_with_rng(people, &mut rng)
    }

    /// Schedules a roster with a caller-supplied RNG.
    ///
    /// Fails only on invalid configuration.
    pub fn schedule_with_rng<R: Rng>(
        &self,
        people: &[Person],
        rng: &mut R,
    ) -> Result<SchedulingResult, ConfigError> {
        self.config.validate()?;
        if people.is_empty() {
            return Ok(SchedulingResult::empty(Vec::new()));
        }

        if let Err(errors) = validate_roster(people, &self.config) {
            for e in &errors {
                warn!(kind = ?e.kind, "{}", e.message);
            }
        }

        info!(
            people = people.len(),
            iterations = self.config.num_iterations,
            facilitators = self.config.facilitator_ids.len(),
            "cohort scheduling started"
        );

        let ctx = RosterContext::new(people, &self.config);
        let (incumbent, iterations_run) = self.search(&ctx, rng);

        let (mut groups, best_iteration) = match incumbent {
            Some(best) => (best.groups, Some(best.iteration)),
            None => (Vec::new(), None),
        };

        let balance_moves = if self.config.balance {
            balance_groups(&ctx, &mut groups)
        } else {
            0
        };

        let mut result = finalize(&ctx, &groups);
        result.stats.iterations_run = iterations_run;
        result.stats.best_iteration = best_iteration;
        result.stats.balance_moves = balance_moves;

        info!(
            groups = result.groups.len(),
            matched = result.stats.matched_people,
            unassigned = result.unassigned.len(),
            quality = result.stats.quality_score,
            iterations = iterations_run,
            "cohort scheduling finished"
        );
        Ok(result)
    }

    fn search<R: Rng>(
        &self,
        ctx: &RosterContext<'_>,
        rng: &mut R,
    ) -> (Option<Incumbent>, usize) {
        let started = Instant::now();
        let deadline = self.config.time_limit_ms.map(Duration::from_millis);
        let total = self.config.num_iterations;
        let mut best: Option<Incumbent> = None;
        let mut iterations_run = 0;

        for iteration in 0..total {
            if self.stop_requested() {
                debug!(iteration, "trial search stopped by signal");
                break;
            }
            if deadline.is_some_and(|limit| started.elapsed() >= limit) {
                debug!(iteration, "trial search hit time limit");
                break;
            }

            let groups = greedy_trial(ctx, &self.config, rng);
            let score = TrialScore::evaluate(ctx, &groups);
            iterations_run += 1;

            let improved = best
                .as_ref()
                .map_or(true, |b| score.quality > b.score.quality);
            if improved {
                debug!(
                    iteration,
                    quality = score.quality,
                    matched = score.matched,
                    if_needed = score.if_needed,
                    "new best trial"
                );
                best = Some(Incumbent {
                    groups,
                    score,
                    iteration,
                });
            }

            if let Some(callback) = &self.progress {
                if iteration % PROGRESS_INTERVAL == 0 {
                    callback(&Progress {
                        iteration,
                        total,
                        best_quality: best.as_ref().map_or(0.0, |b| b.score.quality),
                        total_people: ctx.len(),
                    });
                }
            }

            if improved && score.is_perfect(ctx.len()) {
                debug!(iteration, "perfect grouping found, stopping early");
                break;
            }
        }

        (best, iterations_run)
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl fmt::Debug for CohortScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CohortScheduler")
            .field("config", &self.config)
            .field("progress", &self.progress.is_some())
            .field("stop", &self.stop)
            .finish()
    }
}

/// Schedules a roster with the given configuration.
///
/// Shorthand for `CohortScheduler::new(config.clone()).schedule(people)`.
pub fn schedule(
    people: &[Person],
    config: &SchedulerConfig,
) -> Result<SchedulingResult, ConfigError> {
    CohortScheduler::new(config.clone()).schedule(people)
}

/// Turns index groups into finalized [`Group`]s with selected meeting times.
///
/// People are counted once in the statistics even when they lead several
/// groups.
fn finalize(ctx: &RosterContext<'_>, groups: &[Vec<usize>]) -> SchedulingResult {
    let people = ctx.people();
    let mut stats = SchedulingStats {
        total_people: people.len(),
        ..Default::default()
    };
    let mut placed = vec![false; people.len()];
    let mut matched = vec![false; people.len()];
    let mut relying = vec![false; people.len()];
    let mut finalized = Vec::with_capacity(groups.len());

    for (i, members) in groups.iter().enumerate() {
        let mut group =
            Group::new(format!("group-{}", i + 1)).with_name(format!("Group {}", i + 1));
        for &m in members {
            group.members.push(people[m].id.clone());
            placed[m] = true;
        }
        group.facilitator = members
            .iter()
            .find(|&&m| ctx.is_facilitator(m))
            .map(|&m| people[m].id.clone());

        match ctx.best_slot(members) {
            Some(slot) => {
                group.selected_time = Some(slot.time());
                group.quality = slot.score;
                for &m in members {
                    matched[m] = true;
                    if ctx.relies_on_if_needed(m, &slot) {
                        relying[m] = true;
                        group.if_needed_members.push(people[m].id.clone());
                    }
                }
                stats.quality_score += slot.score;
            }
            None => {
                warn!(
                    group = %group.id,
                    members = members.len(),
                    "group has no feasible meeting time"
                );
            }
        }

        finalized.push(group);
    }

    stats.matched_people = matched.iter().filter(|&&b| b).count();
    stats.if_needed_people = relying.iter().filter(|&&b| b).count();

    let unassigned = people
        .iter()
        .zip(&placed)
        .filter(|&(_, &is_placed)| !is_placed)
        .map(|(p, _)| p.id.clone())
        .collect();

    SchedulingResult {
        groups: finalized,
        unassigned,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    fn free_monday(n: usize) -> Vec<Person> {
        (0..n)
            .map(|i| Person::new(format!("p{i}")).with_availability("M09:00 M17:00"))
            .collect()
    }

    #[test]
    fn test_eight_people_one_group() {
        let people = free_monday(8);
        let config = SchedulerConfig::default()
            .with_meeting_length(60)
            .with_group_size(4, 8)
            .with_iterations(50)
            .with_seed(3);

        let result = schedule(&people, &config).unwrap();
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].size(), 8);
        assert_eq!(result.stats.quality_score, 8.0);
        assert_eq!(result.stats.matched_people, 8);
        assert_eq!(result.stats.if_needed_people, 0);
        assert!(result.unassigned.is_empty());
        // Perfect on the first trial
        assert_eq!(result.stats.iterations_run, 1);
        assert_eq!(result.stats.best_iteration, Some(0));
        assert_eq!(result.groups[0].selected_time.unwrap().start, 540);
    }

    #[test]
    fn test_disjoint_people_unassigned() {
        let people: Vec<Person> = ["M", "T", "W", "R", "F"]
            .iter()
            .map(|d| {
                Person::new(format!("p{d}")).with_availability(&format!("{d}09:00 {d}10:00"))
            })
            .collect();
        let config = SchedulerConfig::default().with_iterations(30).with_seed(5);

        let result = schedule(&people, &config).unwrap();
        assert!(result.groups.is_empty());
        assert_eq!(result.unassigned.len(), 5);
        assert_eq!(result.stats.quality_score, 0.0);
        assert_eq!(result.stats.matched_people, 0);
        assert_eq!(result.stats.iterations_run, 30);
        assert_eq!(result.stats.best_iteration, Some(0));
    }

    #[test]
    fn test_facilitator_scenario() {
        let mut people = free_monday(6);
        people.push(Person::new("loner").with_availability("F20:00 F22:00"));
        let config = SchedulerConfig::default()
            .with_facilitator_capacity("p0", 1)
            .with_iterations(40)
            .with_seed(11);

        let result = schedule(&people, &config).unwrap();
        assert_eq!(result.groups.len(), 1);
        let group = &result.groups[0];
        assert_eq!(group.facilitator.as_deref(), Some("p0"));
        assert_eq!(group.size(), 6);
        assert!(group.contains("p0"));
        assert_eq!(result.unassigned, vec!["loner".to_string()]);
    }

    #[test]
    fn test_multi_group_facilitator_counted_once() {
        let mut people = vec![Person::new("f").with_availability("M09:00 M17:00")];
        people.extend(free_monday(5));
        let config = SchedulerConfig::default()
            .with_facilitator_capacity("f", 2)
            .with_group_size(3, 3)
            .with_iterations(20)
            .with_seed(6);

        let result = schedule(&people, &config).unwrap();
        assert_eq!(result.groups.len(), 2);
        assert!(result.groups.iter().all(|g| g.facilitator.as_deref() == Some("f")));
        assert_eq!(result.unassigned.len(), 1);
        assert_eq!(result.stats.matched_people, 5);
        assert_eq!(
            result.stats.matched_people + result.unassigned.len(),
            result.stats.total_people
        );
        // Someone is left out, so no trial ends the search early
        assert_eq!(result.stats.iterations_run, 20);
        assert_eq!(result.stats.quality_score, 6.0);
    }

    #[test]
    fn test_deserialized_wrapped_availability() {
        let people: Vec<Person> = (0..4)
            .map(|i| {
                let record = serde_json::json!({
                    "id": format!("p{i}"),
                    "name": "",
                    "regular": [{ "start": 600, "end": 540 }],
                    "if_needed": [],
                });
                serde_json::from_value(record).unwrap()
            })
            .collect();
        let config = SchedulerConfig::default().with_iterations(10).with_seed(1);

        let result = schedule(&people, &config).unwrap();
        assert_eq!(result.groups.len(), 1);
        assert!(result.unassigned.is_empty());
        assert_eq!(result.groups[0].selected_time.unwrap().start, 600);
        assert_eq!(result.stats.quality_score, 4.0);
    }

    #[test]
    fn test_facilitator_invariant() {
        let mut people = free_monday(14);
        people.extend((0..6).map(|i| {
            Person::new(format!("t{i}")).with_availability("T09:00 T12:00")
        }));
        let config = SchedulerConfig::default()
            .with_facilitator("p0")
            .with_facilitator("p1")
            .with_facilitator("t0")
            .with_group_size(3, 5)
            .with_iterations(100)
            .with_seed(2);

        let result = schedule(&people, &config).unwrap();
        assert!(!result.groups.is_empty());
        for group in &result.groups {
            let count = group
                .members
                .iter()
                .filter(|m| config.facilitator_ids.contains(*m))
                .count();
            assert_eq!(count, 1, "group {} has {count} facilitators", group.id);
            assert!(group.size() >= 3 && group.size() <= 5);
        }
    }

    #[test]
    fn test_empty_roster() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let scheduler = CohortScheduler::new(SchedulerConfig::default())
            .with_progress(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            });

        let result = scheduler.schedule(&[]).unwrap();
        assert!(result.groups.is_empty());
        assert!(result.unassigned.is_empty());
        assert_eq!(result.stats, SchedulingStats::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SchedulerConfig::default().with_time_increment(0);
        let err = schedule(&free_monday(4), &config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "time_increment", .. }));
    }

    #[test]
    fn test_deterministic_without_randomness() {
        let mut people = free_monday(9);
        people.extend((0..7).map(|i| {
            Person::new(format!("x{i}"))
                .with_availability("M12:00 M14:00, W09:00 W11:00")
                .with_if_needed("T09:00 T10:00")
        }));
        let config = SchedulerConfig::default()
            .with_randomness(0.0)
            .with_group_size(3, 5)
            .with_iterations(25);

        let a = schedule(&people, &config.clone().with_seed(1)).unwrap();
        let b = schedule(&people, &config.with_seed(999)).unwrap();
        let members = |r: &SchedulingResult| -> Vec<Vec<String>> {
            r.groups.iter().map(|g| g.members.clone()).collect()
        };
        assert_eq!(members(&a), members(&b));
        assert_eq!(a.unassigned, b.unassigned);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let people = free_monday(20);
        let config = SchedulerConfig::default()
            .with_group_size(4, 6)
            .with_iterations(30)
            .with_seed(77);

        let a = schedule(&people, &config).unwrap();
        let b = schedule(&people, &config).unwrap();
        let ids = |r: &SchedulingResult| -> Vec<Vec<String>> {
            r.groups.iter().map(|g| g.members.clone()).collect()
        };
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_balancing_runs_on_winner() {
        // 13 people, max 8: greedy fills 8 + 5, balancing evens to 7 + 6
        let people = free_monday(13);
        let config = SchedulerConfig::default()
            .with_randomness(0.0)
            .with_iterations(5);

        let result = schedule(&people, &config).unwrap();
        let mut sizes: Vec<usize> = result.groups.iter().map(Group::size).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![6, 7]);
        assert_eq!(result.stats.balance_moves, 1);

        let unbalanced = schedule(&people, &config.with_balance(false)).unwrap();
        let sizes: Vec<usize> = unbalanced.groups.iter().map(Group::size).collect();
        assert_eq!(sizes, vec![8, 5]);
        assert_eq!(unbalanced.stats.balance_moves, 0);
    }

    #[test]
    fn test_if_needed_statistics() {
        let mut people = free_monday(3);
        people.push(Person::new("late").with_if_needed("M09:00 M17:00"));
        let config = SchedulerConfig::default()
            .with_group_size(4, 8)
            .with_randomness(0.0)
            .with_iterations(10);

        let result = schedule(&people, &config).unwrap();
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.stats.if_needed_people, 1);
        assert_eq!(result.groups[0].if_needed_members, vec!["late".to_string()]);
        assert!((result.stats.quality_score - 3.9).abs() < 1e-9);
        // Never perfect, so every trial runs
        assert_eq!(result.stats.iterations_run, 10);

        let strict = schedule(&people, &config.with_if_needed(false)).unwrap();
        assert!(strict.groups.is_empty());
        assert_eq!(strict.unassigned.len(), 4);
    }

    #[test]
    fn test_progress_reports() {
        let mut people = free_monday(4);
        people.push(Person::new("odd").with_if_needed("M09:00 M17:00"));
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let config = SchedulerConfig::default()
            .with_group_size(5, 5)
            .with_iterations(250)
            .with_seed(4);

        CohortScheduler::new(config)
            .with_progress(move |p| sink.lock().unwrap().push(*p))
            .schedule(&people)
            .unwrap();

        let reports = reports.lock().unwrap();
        let iterations: Vec<usize> = reports.iter().map(|p| p.iteration).collect();
        assert_eq!(iterations, vec![0, 100, 200]);
        assert!(reports.iter().all(|p| p.total == 250 && p.total_people == 5));
        assert!((reports[2].best_quality - 4.9).abs() < 1e-9);
    }

    #[test]
    fn test_stop_signal() {
        let people = free_monday(5);
        let stop = Arc::new(AtomicBool::new(true));
        let result = CohortScheduler::new(SchedulerConfig::default().with_seed(1))
            .with_stop_signal(stop)
            .schedule(&people)
            .unwrap();

        assert_eq!(result.stats.iterations_run, 0);
        assert_eq!(result.stats.best_iteration, None);
        assert!(result.groups.is_empty());
        assert_eq!(result.unassigned.len(), 5);
    }

    #[test]
    fn test_time_limit() {
        let mut people = free_monday(30);
        people.push(Person::new("odd").with_if_needed("M09:00 M10:00"));
        let config = SchedulerConfig::default()
            .with_iterations(usize::MAX)
            .with_time_limit_ms(0)
            .with_seed(1);

        let result = schedule(&people, &config).unwrap();
        assert_eq!(result.stats.iterations_run, 0);
    }

    #[test]
    fn test_zero_iterations() {
        let people = free_monday(4);
        let config = SchedulerConfig::default().with_iterations(0);
        let result = schedule(&people, &config).unwrap();
        assert!(result.groups.is_empty());
        assert_eq!(result.unassigned.len(), 4);
        assert_eq!(result.stats.total_people, 4);
    }

    #[test]
    fn test_selected_times_feasible() {
        use crate::meeting::is_group_valid;

        let mut people = free_monday(10);
        people.extend((0..6).map(|i| {
            Person::new(format!("e{i}"))
                .with_availability("R18:00 R20:00")
                .with_if_needed("M16:00 M18:00")
        }));
        let config = SchedulerConfig::default()
            .with_group_size(3, 6)
            .with_iterations(60)
            .with_seed(8);

        let result = schedule(&people, &config).unwrap();
        assert!(result.groups_without_time().is_empty());
        for group in &result.groups {
            let time = group.selected_time.unwrap();
            let members: Vec<&Person> = people
                .iter()
                .filter(|p| group.contains(&p.id))
                .collect();
            for person in &members {
                assert!(is_group_valid(&[*person], 60, 30, true, None));
                assert!(person.coverage_at(time.start, true).is_available());
                assert!(person.coverage_at(time.start + 30, true).is_available());
            }
            assert!(group.size() >= 3 && group.size() <= 6);
        }

        // Nobody appears twice
        let mut all: Vec<&String> = result
            .groups
            .iter()
            .flat_map(|g| &g.members)
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len() + result.unassigned.len(), people.len());
    }
}
