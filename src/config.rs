//! Scheduler configuration.
//!
//! All options have defaults, so an empty TOML document (or
//! `SchedulerConfig::default()`) is a valid configuration:
//!
//! ```
//! use u_cohort::config::SchedulerConfig;
//!
//! let config = SchedulerConfig::from_toml_str(r#"
//!     meeting_length = 90
//!     max_people = 6
//!     facilitator_ids = ["alice"]
//! "#).unwrap();
//! assert_eq!(config.meeting_length, 90);
//! assert_eq!(config.min_people, 4);
//! assert_eq!(config.facilitator_capacity("alice"), 1);
//! ```
//!
//! The progress callback and the stop signal are runtime hooks, not
//! configuration data; they are attached to
//! [`CohortScheduler`](crate::scheduler::CohortScheduler).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An option holds a value the engine cannot run with.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: &'static str, message: String },

    /// The TOML document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("Failed to load configuration from {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            message: message.into(),
        }
    }
}

/// Options recognized by the cohort scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Meeting length (minutes).
    #[serde(default = "default_meeting_length")]
    pub meeting_length: u32,
    /// Smallest group kept at the end of a trial.
    #[serde(default = "default_min_people")]
    pub min_people: usize,
    /// Largest group size.
    #[serde(default = "default_max_people")]
    pub max_people: usize,
    /// Cap on the number of groups. `None` = unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_groups: Option<usize>,
    /// Number of randomized trials.
    #[serde(default = "default_num_iterations")]
    pub num_iterations: usize,
    /// Step between candidate start times and sampled offsets (minutes).
    #[serde(default = "default_time_increment")]
    pub time_increment: u32,
    /// Perturbation strength in `[0, 1]`. `0.0` makes trials deterministic.
    #[serde(default = "default_randomness")]
    pub randomness: f64,
    /// Whether if-needed availability may be used.
    #[serde(default = "default_true")]
    pub use_if_needed: bool,
    /// Whether to run the size balancer on the winning trial.
    #[serde(default = "default_true")]
    pub balance: bool,
    /// Facilitator person IDs. Empty = no facilitator constraint.
    #[serde(default)]
    pub facilitator_ids: BTreeSet<String>,
    /// Per-facilitator cohort capacity (default 1 when absent).
    #[serde(default)]
    pub facilitator_max_cohorts: BTreeMap<String, usize>,
    /// RNG seed. `None` seeds from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Wall-clock budget for the trial loop (ms).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_ms: Option<u64>,
}

fn default_meeting_length() -> u32 {
    60
}

fn default_min_people() -> usize {
    4
}

fn default_max_people() -> usize {
    8
}

fn default_num_iterations() -> usize {
    10_000
}

fn default_time_increment() -> u32 {
    30
}

fn default_randomness() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            meeting_length: default_meeting_length(),
            min_people: default_min_people(),
            max_people: default_max_people(),
            max_groups: None,
            num_iterations: default_num_iterations(),
            time_increment: default_time_increment(),
            randomness: default_randomness(),
            use_if_needed: true,
            balance: true,
            facilitator_ids: BTreeSet::new(),
            facilitator_max_cohorts: BTreeMap::new(),
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Sets the meeting length (minutes).
    pub fn with_meeting_length(mut self, minutes: u32) -> Self {
        self.meeting_length = minutes;
        self
    }

    /// Sets the group size bounds.
    pub fn with_group_size(mut self, min_people: usize, max_people: usize) -> Self {
        self.min_people = min_people;
        self.max_people = max_people;
        self
    }

    /// Caps the number of groups.
    pub fn with_max_groups(mut self, max_groups: usize) -> Self {
        self.max_groups = Some(max_groups);
        self
    }

    /// Sets the number of trials.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.num_iterations = iterations;
        self
    }

    /// Sets the lattice increment (minutes).
    pub fn with_time_increment(mut self, minutes: u32) -> Self {
        self.time_increment = minutes;
        self
    }

    /// Sets the randomness.
    pub fn with_randomness(mut self, randomness: f64) -> Self {
        self.randomness = randomness;
        self
    }

    /// Enables or disables if-needed availability.
    pub fn with_if_needed(mut self, use_if_needed: bool) -> Self {
        self.use_if_needed = use_if_needed;
        self
    }

    /// Enables or disables balancing.
    pub fn with_balance(mut self, balance: bool) -> Self {
        self.balance = balance;
        self
    }

    /// Marks a person as facilitator.
    pub fn with_facilitator(mut self, person_id: impl Into<String>) -> Self {
        self.facilitator_ids.insert(person_id.into());
        self
    }

    /// Marks a person as facilitator for up to `max_cohorts` groups.
    pub fn with_facilitator_capacity(
        mut self,
        person_id: impl Into<String>,
        max_cohorts: usize,
    ) -> Self {
        let person_id = person_id.into();
        self.facilitator_max_cohorts
            .insert(person_id.clone(), max_cohorts);
        self.facilitator_ids.insert(person_id);
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock budget for the trial loop (ms).
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Whether the facilitator constraint is active.
    pub fn has_facilitators(&self) -> bool {
        !self.facilitator_ids.is_empty()
    }

    /// How many groups a facilitator may lead.
    pub fn facilitator_capacity(&self, person_id: &str) -> usize {
        self.facilitator_max_cohorts
            .get(person_id)
            .copied()
            .unwrap_or(1)
    }

    /// Effective group cap.
    pub fn group_limit(&self) -> usize {
        self.max_groups.unwrap_or(usize::MAX)
    }

    /// Rejects configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.meeting_length == 0 {
            return Err(ConfigError::invalid("meeting_length", "must be positive"));
        }
        if self.time_increment == 0 {
            return Err(ConfigError::invalid("time_increment", "must be positive"));
        }
        if self.min_people == 0 {
            return Err(ConfigError::invalid("min_people", "must be at least 1"));
        }
        if self.min_people > self.max_people {
            return Err(ConfigError::invalid(
                "min_people",
                format!(
                    "{} exceeds max_people {}",
                    self.min_people, self.max_people
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.randomness) {
            return Err(ConfigError::invalid(
                "randomness",
                format!("{} is outside [0, 1]", self.randomness),
            ));
        }
        Ok(())
    }
}
