//! First-run starter exercises.
//!
//! # Invariants
//! - Seeding only happens while the `exercises` table is empty.
//! - Name collisions during seeding are skipped silently; user-initiated
//!   duplicates go through the repository and are reported instead.

use super::{is_unique_violation, DbResult};
use log::{debug, info};
use rusqlite::{params, Connection};

/// One starter row: name, body part, equipment, progression note, subgroup.
pub type StarterExercise = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

pub const STARTER_EXERCISES: &[StarterExercise] = &[
    ("Squat", "Back", "Barbell", "Add Elevation", "Lower Back"),
    (
        "Pull Ups",
        "Back",
        "Bodyweight",
        "Slow and Controlled",
        "Vertical Mower",
    ),
    (
        "Hammer Curls",
        "Biceps",
        "Dumbbells",
        "Add Back Pulling",
        "Brachioradialis",
    ),
];

/// Inserts [`STARTER_EXERCISES`] when no exercise exists yet.
///
/// Returns the number of rows inserted (zero when the table already had data).
pub fn seed_starter_exercises(conn: &mut Connection) -> DbResult<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM exercises;", [], |row| row.get(0))?;
    if existing > 0 {
        debug!("event=db_seed module=seed status=skipped existing={existing}");
        return Ok(0);
    }

    let tx = conn.transaction()?;
    let mut inserted = 0;
    for (name, body_part, equipment, notes, subgroup) in STARTER_EXERCISES {
        let result = tx.execute(
            "INSERT INTO exercises (name, body_part, equipment, notes, subgroup)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![name, body_part, equipment, notes, subgroup],
        );
        match result {
            Ok(_) => inserted += 1,
            Err(err) if is_unique_violation(&err) => continue,
            Err(err) => return Err(err.into()),
        }
    }
    tx.commit()?;

    info!("event=db_seed module=seed status=ok inserted={inserted}");
    Ok(inserted)
}
