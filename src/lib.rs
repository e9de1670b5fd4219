//! Cohort scheduling for the U-Engine ecosystem.
//!
//! Splits a roster of people with weekly availability into groups of
//! bounded size, each able to meet at a common recurring time.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Interval`, `Person`, `Group`,
//!   `MeetingTime`, `SchedulingResult`
//! - **`meeting`**: Availability sampling, group feasibility, slot scoring
//! - **`scheduler`**: Multi-start greedy search, balancing, finalization
//! - **`config`**: `SchedulerConfig` with TOML loading
//! - **`validation`**: Roster integrity checks (duplicate IDs, facilitator refs)
//!
//! # Example
//!
//! ```
//! use u_cohort::config::SchedulerConfig;
//! use u_cohort::models::Person;
//! use u_cohort::scheduler::schedule;
//!
//! let people: Vec<Person> = (0..8)
//!     .map(|i| Person::new(format!("p{i}")).with_availability("M09:00 M17:00"))
//!     .collect();
//! let config = SchedulerConfig::default().with_seed(42);
//!
//! let result = schedule(&people, &config).unwrap();
//! assert_eq!(result.groups.len(), 1);
//! assert_eq!(result.stats.quality_score, 8.0);
//! ```
//!
//! # Logging
//!
//! Emits `tracing` events: run summaries at `info`, incumbent changes and
//! balancing moves at `debug`, roster problems at `warn`. Install any
//! subscriber to see them.

pub mod config;
pub mod meeting;
pub mod models;
pub mod scheduler;
pub mod validation;
