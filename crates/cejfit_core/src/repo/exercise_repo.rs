//! Exercise repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over the `exercises` table, including the derived last-session date.
//!
//! # Invariants
//! - Text fields are trimmed (blank optionals become `NULL`) before writes.
//! - Listing order is `body_part COLLATE NOCASE, name COLLATE NOCASE, id`.
//! - Deleting an exercise relies on `ON DELETE CASCADE` for sessions/sets.

use crate::db::is_unique_violation;
use crate::model::exercise::{normalize_optional, Exercise, ExerciseFields, ExerciseId};
use crate::repo::{ensure_connection_ready, parse_stored_date, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const EXERCISE_SELECT_SQL: &str = "SELECT
    e.id AS id,
    e.name AS name,
    e.body_part AS body_part,
    e.equipment AS equipment,
    e.notes AS notes,
    e.subgroup AS subgroup,
    (SELECT MAX(s.date) FROM sessions s WHERE s.exercise_id = e.id) AS last_session
FROM exercises e";

/// Repository interface for exercise operations.
pub trait ExerciseRepository {
    /// Inserts an exercise; `DuplicateName` when the trimmed name exists.
    fn create_exercise(&self, fields: &ExerciseFields) -> RepoResult<ExerciseId>;
    fn get_exercise(&self, id: ExerciseId) -> RepoResult<Option<Exercise>>;
    /// All exercises in master-list order.
    fn list_exercises(&self) -> RepoResult<Vec<Exercise>>;
    /// Replaces all mutable fields. Unknown ids are a silent no-op.
    fn update_exercise(&self, id: ExerciseId, fields: &ExerciseFields) -> RepoResult<()>;
    /// Deletes the exercise and, by cascade, its sessions and sets.
    fn delete_exercise(&self, id: ExerciseId) -> RepoResult<()>;
}

/// SQLite-backed exercise repository.
pub struct SqliteExerciseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteExerciseRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ExerciseRepository for SqliteExerciseRepository<'_> {
    fn create_exercise(&self, fields: &ExerciseFields) -> RepoResult<ExerciseId> {
        let fields = fields.normalized();

        self.conn
            .execute(
                "INSERT INTO exercises (name, body_part, equipment, notes, subgroup)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    fields.name.as_str(),
                    fields.body_part.as_deref(),
                    fields.equipment.as_deref(),
                    fields.notes.as_deref(),
                    fields.subgroup.as_deref(),
                ],
            )
            .map_err(|err| classify_write_error(err, &fields.name))?;

        Ok(ExerciseId(self.conn.last_insert_rowid()))
    }

    fn get_exercise(&self, id: ExerciseId) -> RepoResult<Option<Exercise>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EXERCISE_SELECT_SQL} WHERE e.id = ?1;"))?;
        let mut rows = stmt.query([id.0])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_exercise_row(row)?));
        }
        Ok(None)
    }

    fn list_exercises(&self) -> RepoResult<Vec<Exercise>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EXERCISE_SELECT_SQL}
             ORDER BY e.body_part COLLATE NOCASE ASC, e.name COLLATE NOCASE ASC, e.id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut exercises = Vec::new();
        while let Some(row) = rows.next()? {
            exercises.push(parse_exercise_row(row)?);
        }
        Ok(exercises)
    }

    fn update_exercise(&self, id: ExerciseId, fields: &ExerciseFields) -> RepoResult<()> {
        let fields = fields.normalized();

        self.conn
            .execute(
                "UPDATE exercises
                 SET
                    name = ?1,
                    body_part = ?2,
                    equipment = ?3,
                    notes = ?4,
                    subgroup = ?5
                 WHERE id = ?6;",
                params![
                    fields.name.as_str(),
                    fields.body_part.as_deref(),
                    fields.equipment.as_deref(),
                    fields.notes.as_deref(),
                    fields.subgroup.as_deref(),
                    id.0,
                ],
            )
            .map_err(|err| classify_write_error(err, &fields.name))?;

        Ok(())
    }

    fn delete_exercise(&self, id: ExerciseId) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM exercises WHERE id = ?1;", [id.0])?;
        Ok(())
    }
}

fn classify_write_error(err: rusqlite::Error, name: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::DuplicateName(name.to_string())
    } else {
        err.into()
    }
}

fn parse_exercise_row(row: &Row<'_>) -> RepoResult<Exercise> {
    let last_session = match row.get::<_, Option<String>>("last_session")? {
        Some(value) => Some(parse_stored_date(&value, "sessions.date")?),
        None => None,
    };

    Ok(Exercise {
        id: ExerciseId(row.get("id")?),
        name: row.get("name")?,
        body_part: optional_text(row, "body_part")?,
        equipment: optional_text(row, "equipment")?,
        notes: optional_text(row, "notes")?,
        subgroup: optional_text(row, "subgroup")?,
        last_session,
    })
}

// Older databases stored blank optional fields as '' rather than NULL.
fn optional_text(row: &Row<'_>, column: &str) -> RepoResult<Option<String>> {
    let value: Option<String> = row.get(column)?;
    Ok(normalize_optional(value.as_deref()))
}
