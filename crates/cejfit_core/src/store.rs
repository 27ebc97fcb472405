//! Persistence store facade for the presentation layer.
//!
//! # Responsibility
//! - Own the process-wide SQLite connection from startup to shutdown.
//! - Expose the full exercise/session/set operation set in one place.
//! - Emit metadata-only diagnostics for every mutation.
//!
//! # Invariants
//! - The store is created once ([`WorkoutStore::initialize`]) and released
//!   once ([`WorkoutStore::close`]); `close` consumes the store.
//! - There is no change notification: callers re-query after each mutation.
//! - No write partially applies.

use crate::db::{open_db, open_db_in_memory, seed_starter_exercises};
use crate::model::exercise::{Exercise, ExerciseFields, ExerciseId};
use crate::model::session::{Session, SessionDraft, SessionId, SessionSummary, SetEntry};
use crate::model::set::{LastSet, SetId, WeightUnit, WorkoutSet};
use crate::repo::exercise_repo::{ExerciseRepository, SqliteExerciseRepository};
use crate::repo::session_repo::{SessionRepository, SqliteSessionRepository};
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use rusqlite::Connection;
use std::path::Path;

/// Workout log backed by one SQLite connection.
pub struct WorkoutStore {
    conn: Connection,
}

impl WorkoutStore {
    /// Opens (or creates) the database file, migrates it and seeds the
    /// starter exercises on first run.
    pub fn initialize(path: impl AsRef<Path>) -> RepoResult<Self> {
        let conn = open_db(path)?;
        Self::from_connection(conn)
    }

    /// Same as [`WorkoutStore::initialize`] but backed by a throwaway
    /// in-memory database.
    pub fn initialize_in_memory() -> RepoResult<Self> {
        let conn = open_db_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> RepoResult<Self> {
        let seeded = seed_starter_exercises(&mut conn)?;
        info!("event=store_init module=store status=ok seeded={seeded}");
        Ok(Self { conn })
    }

    /// Releases the connection.
    pub fn close(self) -> RepoResult<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=store_close module=store status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                error!("event=store_close module=store status=error error={err}");
                Err(err.into())
            }
        }
    }

    pub fn add_exercise(&self, fields: &ExerciseFields) -> RepoResult<ExerciseId> {
        let result = self.exercises()?.create_exercise(fields);
        log_write("exercise_add", &result);
        result
    }

    /// All exercises ordered by body part, then name (both case-insensitive).
    pub fn list_exercises(&self) -> RepoResult<Vec<Exercise>> {
        self.exercises()?.list_exercises()
    }

    /// Master-list filter; a blank query returns every exercise.
    pub fn search_exercises(&self, query: &str) -> RepoResult<Vec<Exercise>> {
        let mut exercises = self.list_exercises()?;
        exercises.retain(|exercise| exercise.matches_search(query));
        Ok(exercises)
    }

    pub fn get_exercise(&self, id: ExerciseId) -> RepoResult<Option<Exercise>> {
        self.exercises()?.get_exercise(id)
    }

    /// Replaces all mutable fields of an exercise; unknown ids are ignored.
    pub fn update_exercise(&self, id: ExerciseId, fields: &ExerciseFields) -> RepoResult<()> {
        let result = self.exercises()?.update_exercise(id, fields);
        log_write("exercise_update", &result);
        result
    }

    /// Deletes an exercise together with all its sessions and sets.
    pub fn delete_exercise(&self, id: ExerciseId) -> RepoResult<()> {
        let result = self.exercises()?.delete_exercise(id);
        log_write("exercise_delete", &result);
        result
    }

    pub fn add_session(
        &self,
        exercise_id: ExerciseId,
        date: NaiveDate,
        notes: &str,
    ) -> RepoResult<SessionId> {
        let result = self.sessions()?.add_session(exercise_id, date, Some(notes));
        log_write("session_add", &result);
        result
    }

    pub fn add_set(
        &self,
        session_id: SessionId,
        set_index: u32,
        weight: f64,
        reps: u32,
        rir: Option<u32>,
        unit: WeightUnit,
    ) -> RepoResult<SetId> {
        let entry = SetEntry {
            set_index,
            weight,
            reps,
            rir,
            unit,
        };
        let result = self.sessions()?.add_set(session_id, &entry);
        log_write("set_add", &result);
        result
    }

    /// Saves a composed session and all of its sets atomically.
    ///
    /// Rejects an empty draft with `ValidationError::EmptySession`. The draft
    /// is borrowed, so on any error it is still intact for a retry.
    pub fn save_session(
        &self,
        exercise_id: ExerciseId,
        draft: &SessionDraft,
    ) -> RepoResult<SessionId> {
        let result = self.sessions()?.save_draft(exercise_id, draft);
        log_write("session_save", &result);
        result
    }

    pub fn get_session(&self, id: SessionId) -> RepoResult<Option<Session>> {
        self.sessions()?.get_session(id)
    }

    /// Sessions of an exercise, newest first.
    pub fn list_sessions(&self, exercise_id: ExerciseId) -> RepoResult<Vec<Session>> {
        self.sessions()?.list_sessions(exercise_id)
    }

    /// Sets of a session in index order.
    pub fn list_sets(&self, session_id: SessionId) -> RepoResult<Vec<WorkoutSet>> {
        self.sessions()?.list_sets(session_id)
    }

    pub fn session_history(&self, exercise_id: ExerciseId) -> RepoResult<Vec<SessionSummary>> {
        self.sessions()?.session_history(exercise_id)
    }

    pub fn delete_session(&self, id: SessionId) -> RepoResult<()> {
        let result = self.sessions()?.delete_session(id);
        log_write("session_delete", &result);
        result
    }

    /// Previous-performance hint for an exercise, `None` before any set.
    pub fn last_set_for(&self, exercise_id: ExerciseId) -> RepoResult<Option<LastSet>> {
        self.sessions()?.last_set_for(exercise_id)
    }

    fn exercises(&self) -> RepoResult<SqliteExerciseRepository<'_>> {
        SqliteExerciseRepository::try_new(&self.conn)
    }

    fn sessions(&self) -> RepoResult<SqliteSessionRepository<'_>> {
        SqliteSessionRepository::try_new(&self.conn)
    }
}

fn log_write<T>(event: &str, result: &RepoResult<T>) {
    match result {
        Ok(_) => debug!("event={event} module=store status=ok"),
        Err(RepoError::DuplicateName(_)) => {
            warn!("event={event} module=store status=rejected error_code=duplicate_name")
        }
        Err(RepoError::Validation(err)) => {
            warn!("event={event} module=store status=rejected error_code=validation error={err}")
        }
        Err(err) => error!("event={event} module=store status=error error={err}"),
    }
}
