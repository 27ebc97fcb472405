//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//! - Upgrade databases written before versioning existed (`user_version = 0`
//!   with tables already present) without losing rows.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Every step is safe to run against a schema that already contains its
//!   effect: tables use `IF NOT EXISTS`, column additions consult
//!   `PRAGMA table_info` first.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
enum MigrationStep {
    Sql(&'static str),
    AddColumn {
        table: &'static str,
        column: &'static str,
        definition: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    steps: &'static [MigrationStep],
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        steps: &[MigrationStep::Sql(include_str!("0001_init.sql"))],
    },
    Migration {
        version: 2,
        steps: &[MigrationStep::AddColumn {
            table: "sets",
            column: "rir",
            definition: "INTEGER",
        }],
    },
    Migration {
        version: 3,
        steps: &[MigrationStep::AddColumn {
            table: "sets",
            column: "unit",
            definition: "TEXT DEFAULT 'lbs'",
        }],
    },
    Migration {
        version: 4,
        steps: &[MigrationStep::Sql(include_str!("0004_history_indexes.sql"))],
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        for step in migration.steps {
            apply_step(&tx, step)?;
        }
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        current_version, latest
    );
    Ok(())
}

fn apply_step(conn: &Connection, step: &MigrationStep) -> DbResult<()> {
    match *step {
        MigrationStep::Sql(sql) => conn.execute_batch(sql)?,
        MigrationStep::AddColumn {
            table,
            column,
            definition,
        } => {
            if !table_has_column(conn, table, column)? {
                conn.execute_batch(&format!(
                    "ALTER TABLE {table} ADD COLUMN {column} {definition};"
                ))?;
            }
        }
    }
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Returns whether `table` currently has a column named `column`.
pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
