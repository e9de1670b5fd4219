//! Cohort scheduling engine.
//!
//! Partitions a roster into groups that share a weekly meeting time.
//!
//! # Algorithm
//!
//! Randomized multi-start greedy search: many independent greedy trials,
//! each ordering people by scarcity of availability (with jitter), keeping
//! the trial with the highest aggregate quality. The winner is optionally
//! balanced by single-member moves, then every group gets its best slot.
//!
//! # Modules
//!
//! - `context`: per-run sampled availability and feasibility queries
//! - `greedy`: one randomized greedy trial
//! - `kpi`: trial scoring
//! - `balance`: post-hoc size balancing
//! - `search`: trial loop, cancellation, finalization
//!
//! # References
//!
//! - Resende & Ribeiro (2016), "Optimization by GRASP"
//! - Marti et al. (2013), "Multi-start methods for combinatorial optimization"

mod balance;
mod context;
mod greedy;
mod kpi;
mod search;

pub use balance::{balance_groups, MAX_BALANCE_PASSES};
pub use context::RosterContext;
pub use greedy::{greedy_trial, placement_order};
pub use kpi::TrialScore;
pub use search::{schedule, CohortScheduler, Progress, PROGRESS_INTERVAL};
