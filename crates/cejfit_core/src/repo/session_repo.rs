//! Session/set repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist sessions and their sets, and read back history views.
//! - Save a [`SessionDraft`] atomically: the session row and every set row
//!   are written in one transaction or not at all.
//!
//! # Invariants
//! - Sessions list by `date DESC, id DESC`; sets list by `set_index ASC`.
//! - A missing `unit` (pre-unit rows) reads as the default `lbs`.
//! - A negative stored `rir` reads as `None`.
//! - Deleting a session relies on `ON DELETE CASCADE` for its sets.

use crate::model::exercise::{normalize_optional, ExerciseId};
use crate::model::session::{Session, SessionDraft, SessionId, SessionSummary, SetEntry};
use crate::model::set::{LastSet, SetId, WeightUnit, WorkoutSet};
use crate::repo::{ensure_connection_ready, parse_stored_date, to_u32, RepoError, RepoResult};
use crate::validate::{format_date, ValidationError};
use chrono::NaiveDate;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const SET_SELECT_SQL: &str = "SELECT
    id,
    session_id,
    set_index,
    weight,
    reps,
    rir,
    unit
FROM sets";

/// Repository interface for session and set operations.
pub trait SessionRepository {
    /// Inserts a bare session row. The exercise must exist.
    fn add_session(
        &self,
        exercise_id: ExerciseId,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> RepoResult<SessionId>;
    /// Inserts one set row under an existing session.
    fn add_set(&self, session_id: SessionId, entry: &SetEntry) -> RepoResult<SetId>;
    /// Writes a draft's session and all its sets in one transaction.
    fn save_draft(&self, exercise_id: ExerciseId, draft: &SessionDraft) -> RepoResult<SessionId>;
    fn get_session(&self, id: SessionId) -> RepoResult<Option<Session>>;
    fn list_sessions(&self, exercise_id: ExerciseId) -> RepoResult<Vec<Session>>;
    fn list_sets(&self, session_id: SessionId) -> RepoResult<Vec<WorkoutSet>>;
    /// Sessions (newest first) with their first set and set count.
    fn session_history(&self, exercise_id: ExerciseId) -> RepoResult<Vec<SessionSummary>>;
    /// Deletes the session and, by cascade, its sets.
    fn delete_session(&self, id: SessionId) -> RepoResult<()>;
    /// Latest set of the exercise: newest session date, then highest index.
    fn last_set_for(&self, exercise_id: ExerciseId) -> RepoResult<Option<LastSet>>;
}

/// SQLite-backed session/set repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn add_session(
        &self,
        exercise_id: ExerciseId,
        date: NaiveDate,
        notes: Option<&str>,
    ) -> RepoResult<SessionId> {
        insert_session(self.conn, exercise_id, date, notes)
    }

    fn add_set(&self, session_id: SessionId, entry: &SetEntry) -> RepoResult<SetId> {
        insert_set(self.conn, session_id, entry)
    }

    fn save_draft(&self, exercise_id: ExerciseId, draft: &SessionDraft) -> RepoResult<SessionId> {
        if draft.is_empty() {
            return Err(ValidationError::EmptySession.into());
        }

        // Immediate: take the write lock up front so the set inserts cannot
        // fail with SQLITE_BUSY halfway through.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let session_id = insert_session(&tx, exercise_id, draft.date, Some(draft.notes.as_str()))?;
        for entry in draft.sets() {
            insert_set(&tx, session_id, entry)?;
        }
        tx.commit()?;

        debug!(
            "event=session_save module=repo status=ok session_id={} set_count={}",
            session_id,
            draft.len()
        );
        Ok(session_id)
    }

    fn get_session(&self, id: SessionId) -> RepoResult<Option<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, exercise_id, date, notes
             FROM sessions
             WHERE id = ?1;",
        )?;
        stmt.query_row([id.0], |row| Ok(parse_session_row(row)))
            .optional()?
            .transpose()
    }

    fn list_sessions(&self, exercise_id: ExerciseId) -> RepoResult<Vec<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, exercise_id, date, notes
             FROM sessions
             WHERE exercise_id = ?1
             ORDER BY date DESC, id DESC;",
        )?;
        let mut rows = stmt.query([exercise_id.0])?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            sessions.push(parse_session_row(row)?);
        }
        Ok(sessions)
    }

    fn list_sets(&self, session_id: SessionId) -> RepoResult<Vec<WorkoutSet>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SET_SELECT_SQL}
             WHERE session_id = ?1
             ORDER BY set_index ASC;"
        ))?;
        let mut rows = stmt.query([session_id.0])?;
        let mut sets = Vec::new();
        while let Some(row) = rows.next()? {
            sets.push(parse_set_row(row)?);
        }
        Ok(sets)
    }

    fn session_history(&self, exercise_id: ExerciseId) -> RepoResult<Vec<SessionSummary>> {
        let mut first_set_stmt = self.conn.prepare(&format!(
            "{SET_SELECT_SQL}
             WHERE session_id = ?1
             ORDER BY set_index ASC
             LIMIT 1;"
        ))?;
        let mut count_stmt = self
            .conn
            .prepare("SELECT COUNT(*) FROM sets WHERE session_id = ?1;")?;

        let mut summaries = Vec::new();
        for session in self.list_sessions(exercise_id)? {
            let first_set = first_set_stmt
                .query_row([session.id.0], |row| Ok(parse_set_row(row)))
                .optional()?
                .transpose()?;
            let set_count: i64 = count_stmt.query_row([session.id.0], |row| row.get(0))?;
            summaries.push(SessionSummary {
                session,
                first_set,
                set_count: to_u32(set_count, "COUNT(sets)")?,
            });
        }
        Ok(summaries)
    }

    fn delete_session(&self, id: SessionId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE id = ?1;", [id.0])?;
        Ok(())
    }

    fn last_set_for(&self, exercise_id: ExerciseId) -> RepoResult<Option<LastSet>> {
        let mut stmt = self.conn.prepare(
            "SELECT sets.weight AS weight, sets.reps AS reps, sets.rir AS rir, sets.unit AS unit
             FROM sets
             INNER JOIN sessions ON sets.session_id = sessions.id
             WHERE sessions.exercise_id = ?1
             ORDER BY sessions.date DESC, sets.set_index DESC, sessions.id DESC
             LIMIT 1;",
        )?;
        let mut rows = stmt.query([exercise_id.0])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(LastSet {
                weight: row.get("weight")?,
                reps: to_u32(row.get("reps")?, "sets.reps")?,
                rir: parse_rir(row)?,
                unit: parse_unit(row)?,
            }));
        }
        Ok(None)
    }
}

fn insert_session(
    conn: &Connection,
    exercise_id: ExerciseId,
    date: NaiveDate,
    notes: Option<&str>,
) -> RepoResult<SessionId> {
    conn.execute(
        "INSERT INTO sessions (exercise_id, date, notes) VALUES (?1, ?2, ?3);",
        params![exercise_id.0, format_date(date), normalize_optional(notes)],
    )?;
    Ok(SessionId(conn.last_insert_rowid()))
}

fn insert_set(conn: &Connection, session_id: SessionId, entry: &SetEntry) -> RepoResult<SetId> {
    conn.execute(
        "INSERT INTO sets (session_id, set_index, weight, reps, rir, unit)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            session_id.0,
            entry.set_index,
            entry.weight,
            entry.reps,
            entry.rir,
            entry.unit.as_str(),
        ],
    )?;
    Ok(SetId(conn.last_insert_rowid()))
}

fn parse_session_row(row: &Row<'_>) -> RepoResult<Session> {
    let date_text: String = row.get("date")?;
    let notes: Option<String> = row.get("notes")?;
    Ok(Session {
        id: SessionId(row.get("id")?),
        exercise_id: ExerciseId(row.get("exercise_id")?),
        date: parse_stored_date(&date_text, "sessions.date")?,
        notes: normalize_optional(notes.as_deref()),
    })
}

fn parse_set_row(row: &Row<'_>) -> RepoResult<WorkoutSet> {
    Ok(WorkoutSet {
        id: SetId(row.get("id")?),
        session_id: SessionId(row.get("session_id")?),
        set_index: to_u32(row.get("set_index")?, "sets.set_index")?,
        weight: row.get("weight")?,
        reps: to_u32(row.get("reps")?, "sets.reps")?,
        rir: parse_rir(row)?,
        unit: parse_unit(row)?,
    })
}

/// Older databases accepted any integer as RIR; a negative one reads as
/// not recorded.
fn parse_rir(row: &Row<'_>) -> RepoResult<Option<u32>> {
    Ok(row
        .get::<_, Option<i64>>("rir")?
        .and_then(|value| u32::try_from(value).ok()))
}

fn parse_unit(row: &Row<'_>) -> RepoResult<WeightUnit> {
    match row.get::<_, Option<String>>("unit")? {
        None => Ok(WeightUnit::default()),
        Some(value) => WeightUnit::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid unit `{value}` in sets.unit"))
        }),
    }
}
