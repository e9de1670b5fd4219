//! Roster integrity checks.
//!
//! Detects input problems the engine tolerates but that usually signal a
//! mistake upstream:
//! - Duplicate person IDs
//! - Facilitator IDs missing from the roster
//! - Capacity entries for people who are not facilitators
//! - People with no availability at all
//!
//! The scheduler logs these and carries on; callers wanting strict input
//! can reject on `Err`.

use std::collections::HashSet;

use crate::config::SchedulerConfig;
use crate::models::Person;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two people share the same ID.
    DuplicateId,
    /// A facilitator ID does not match anyone in the roster.
    UnknownFacilitator,
    /// A capacity entry names someone who is not a facilitator.
    CapacityWithoutFacilitator,
    /// A person has neither regular nor if-needed availability.
    NoAvailability,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster against a configuration.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with every detected issue.
pub fn validate_roster(people: &[Person], config: &SchedulerConfig) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for person in people {
        if !ids.insert(person.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate person ID: {}", person.id),
            ));
        }
        if !person.has_availability() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoAvailability,
                format!("Person '{}' has no availability", person.id),
            ));
        }
    }

    for id in &config.facilitator_ids {
        if !ids.contains(id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownFacilitator,
                format!("Facilitator '{id}' is not in the roster"),
            ));
        }
    }

    for id in config.facilitator_max_cohorts.keys() {
        if !config.facilitator_ids.contains(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::CapacityWithoutFacilitator,
                format!("Capacity set for '{id}', who is not a facilitator"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
