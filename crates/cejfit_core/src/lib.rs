//! Core of the CejFIT workout log.
//! This crate is the single source of truth for the workout data invariants:
//! exercises own dated sessions, sessions own ordered sets, and every write
//! is validated and atomic.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod validate;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, init_logging_from, logging_status, LoggingError};
pub use model::exercise::{Exercise, ExerciseFields, ExerciseId};
pub use model::session::{Session, SessionDraft, SessionId, SessionSummary, SetEntry};
pub use model::set::{LastSet, SetId, WeightUnit, WorkoutSet};
pub use repo::exercise_repo::{ExerciseRepository, SqliteExerciseRepository};
pub use repo::session_repo::{SessionRepository, SqliteSessionRepository};
pub use repo::{RepoError, RepoResult};
pub use store::WorkoutStore;
pub use validate::{
    parse_rir, parse_unit, today, validate_date, validate_exercise_name, validate_weight_reps,
    ValidationError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
