//! Input validation for user-entered workout data.
//!
//! # Responsibility
//! - Turn raw text from the presentation layer into typed, in-range values.
//!
//! # Invariants
//! - Functions here are pure: no storage access, no logging, no side effects.
//! - Callers validate before any store mutation; the store does not repeat
//!   these checks except for the non-empty draft rule.

use crate::model::set::WeightUnit;
use chrono::{Local, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum exercise name length, in characters, after trimming.
pub const MAX_EXERCISE_NAME_CHARS: usize = 150;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    NameTooLong { length: usize, max: usize },
    /// Input is not a number of the expected kind.
    InvalidNumeric { field: &'static str, input: String },
    /// Number parsed but is outside the allowed range.
    InvalidRange { field: &'static str, message: String },
    InvalidDate { input: String },
    InvalidUnit { input: String },
    /// A session draft was saved with no sets.
    EmptySession,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "exercise name cannot be empty"),
            Self::NameTooLong { length, max } => {
                write!(f, "exercise name too long ({length} characters, max {max})")
            }
            Self::InvalidNumeric { field, input } => {
                write!(f, "{field} must be a number, got `{input}`")
            }
            Self::InvalidRange { field, message } => write!(f, "invalid {field}: {message}"),
            Self::InvalidDate { input } => {
                write!(f, "date must be YYYY-MM-DD, got `{input}`")
            }
            Self::InvalidUnit { input } => {
                write!(f, "unit must be `lbs` or `kg`, got `{input}`")
            }
            Self::EmptySession => write!(f, "add at least one set before saving"),
        }
    }
}

impl Error for ValidationError {}

/// Validates an exercise name and returns it trimmed.
pub fn validate_exercise_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let length = trimmed.chars().count();
    if length > MAX_EXERCISE_NAME_CHARS {
        return Err(ValidationError::NameTooLong {
            length,
            max: MAX_EXERCISE_NAME_CHARS,
        });
    }

    Ok(trimmed.to_string())
}

/// Parses weight and rep inputs.
///
/// Weight must be a finite number `>= 0`; reps must be an integer `>= 1`.
pub fn validate_weight_reps(
    weight_input: &str,
    reps_input: &str,
) -> Result<(f64, u32), ValidationError> {
    let weight = weight_input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumeric {
            field: "weight",
            input: weight_input.to_string(),
        })?;
    let reps = reps_input
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumeric {
            field: "reps",
            input: reps_input.to_string(),
        })?;

    if weight < 0.0 {
        return Err(ValidationError::InvalidRange {
            field: "weight",
            message: format!("{weight} is negative"),
        });
    }
    let reps = u32::try_from(reps)
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ValidationError::InvalidRange {
            field: "reps",
            message: format!("{reps} is not a positive rep count"),
        })?;

    Ok((weight, reps))
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// The returned date's `Display` is the canonical ISO string stored in
/// `sessions.date`.
pub fn validate_date(date_input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(date_input.trim(), ISO_DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            input: date_input.to_string(),
        }
    })
}

/// Parses an optional reps-in-reserve input. Blank means "not recorded".
pub fn parse_rir(rir_input: &str) -> Result<Option<u32>, ValidationError> {
    let trimmed = rir_input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = trimmed
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumeric {
            field: "rir",
            input: rir_input.to_string(),
        })?;
    u32::try_from(value)
        .map(Some)
        .map_err(|_| ValidationError::InvalidRange {
            field: "rir",
            message: format!("{value} is negative"),
        })
}

/// Parses a weight unit; blank selects the default (`lbs`).
pub fn parse_unit(unit_input: &str) -> Result<WeightUnit, ValidationError> {
    if unit_input.trim().is_empty() {
        return Ok(WeightUnit::default());
    }
    WeightUnit::parse(unit_input).ok_or_else(|| ValidationError::InvalidUnit {
        input: unit_input.to_string(),
    })
}

/// Today's local calendar date, the default date of a new session.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats a date the way it is stored.
pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}
