//! Input validation for squad generation.
//!
//! Checks structural integrity of the roster and divide pairs before
//! generation. Detects:
//! - Duplicate member IDs
//! - Zero priorities (priorities are positive)
//! - Divide pairs naming the same member twice
//!
//! Divide pairs that reference members absent from the roster are not
//! errors: such a pair can never be violated.

use crate::config::SquadConfig;
use crate::models::Member;
use std::collections::HashSet;

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
    /// Two members share the same ID.
    DuplicateId,
    /// A member has priority 0.
    ZeroPriority,
    /// A divide pair names one member on both sides.
    SelfPair,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a roster against the generation settings.
///
/// Checks:
/// 1. No duplicate member IDs
/// 2. Every priority is positive
/// 3. No divide pair names the same member twice
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(members: &[Member], config: &SquadConfig) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for m in members {
        if !ids.insert(m.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate member ID: {}", m.id),
            ));
        }
        if m.priority == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroPriority,
                format!("Member {} ('{}') has priority 0", m.id, m.name),
            ));
        }
    }

    for pair in &config.divide_pairs {
        if pair.first == pair.second {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfPair,
                format!("Divide pair names member {} twice", pair.first),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
