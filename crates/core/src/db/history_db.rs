use std::path::Path;

use rusqlite::{params, Connection};
use thiserror::Error;

use crate::db::{CheckRunRecord, RunCommand, RunOutcome};

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Error type for run-history database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The database was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

/// Convenience result type for DB operations.
pub type DbResult<T> = Result<T, DbError>;

/// SQLite-backed run history.
///
/// Thin wrapper around `rusqlite::Connection` that opens the file, applies
/// migrations, and offers small insert/list helpers.
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open (or create) a history database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, mostly for tests.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    pub fn schema_version(&self) -> DbResult<i32> {
        current_schema_version(&self.conn)
    }

    /// Insert a run record and return its row id.
    pub fn insert_check_run(&self, record: &CheckRunRecord) -> DbResult<i64> {
        self.conn.execute(
            r#"
            INSERT INTO check_runs (command, input_hash, files, total, errors, warnings, outcome, started_at, finished_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                record.command.as_str(),
                record.input_hash,
                record.files as i64,
                record.total as i64,
                record.errors as i64,
                record.warnings as i64,
                record.outcome.as_str(),
                record.started_at,
                record.finished_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List runs oldest first, optionally filtered by command.
    pub fn list_check_runs(&self, command: Option<RunCommand>) -> DbResult<Vec<CheckRunRecord>> {
        fn map_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<CheckRunRecord> {
            let command: String = row.get(0)?;
            let outcome: String = row.get(6)?;
            Ok(CheckRunRecord {
                command: command.parse().map_err(|_| rusqlite::Error::InvalidQuery)?,
                input_hash: row.get(1)?,
                files: row.get::<_, i64>(2)? as usize,
                total: row.get::<_, i64>(3)? as usize,
                errors: row.get::<_, i64>(4)? as usize,
                warnings: row.get::<_, i64>(5)? as usize,
                outcome: if outcome == RunOutcome::Passed.as_str() {
                    RunOutcome::Passed
                } else {
                    RunOutcome::Failed
                },
                started_at: row.get(7)?,
                finished_at: row.get(8)?,
            })
        }

        let mut stmt = if command.is_some() {
            self.conn.prepare(
                r#"
                SELECT command, input_hash, files, total, errors, warnings, outcome, started_at, finished_at
                FROM check_runs
                WHERE command = ?1
                ORDER BY id
                "#,
            )?
        } else {
            self.conn.prepare(
                r#"
                SELECT command, input_hash, files, total, errors, warnings, outcome, started_at, finished_at
                FROM check_runs
                ORDER BY id
                "#,
            )?
        };

        let rows = if let Some(cmd) = command {
            stmt.query_map(params![cmd.as_str()], map_run)?
        } else {
            stmt.query_map([], map_run)?
        };

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Most recent run of `command`, if any.
    pub fn latest_check_run(&self, command: RunCommand) -> DbResult<Option<CheckRunRecord>> {
        Ok(self.list_check_runs(Some(command))?.pop())
    }
}

/// Apply schema migrations to bring the database to the latest version.
///
/// We use `PRAGMA user_version` as the schema version indicator.
///
/// Version map:
/// - 0: no schema
/// - 1: check_runs table
/// - 2: add files and outcome columns to check_runs
fn apply_migrations(conn: &Connection) -> DbResult<()> {
    let current_version = current_schema_version(conn)?;

    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS check_runs (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                command     TEXT NOT NULL,
                input_hash  TEXT NOT NULL,
                total       INTEGER NOT NULL,
                errors      INTEGER NOT NULL,
                warnings    INTEGER NOT NULL,
                started_at  TEXT NOT NULL,
                finished_at TEXT NOT NULL
            );
            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
    }

    if current_version < 2 {
        if !column_exists(conn, "check_runs", "files")? {
            conn.execute("ALTER TABLE check_runs ADD COLUMN files INTEGER NOT NULL DEFAULT 0;", [])?;
        }
        if !column_exists(conn, "check_runs", "outcome")? {
            conn.execute(
                "ALTER TABLE check_runs ADD COLUMN outcome TEXT NOT NULL DEFAULT 'passed';",
                [],
            )?;
            conn.execute("UPDATE check_runs SET outcome = 'failed' WHERE errors > 0;", [])?;
        }
        conn.execute_batch("PRAGMA user_version = 2;")?;
    }

    Ok(())
}

/// Read the SQLite schema version from `PRAGMA user_version`.
fn current_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let pragma = format!("PRAGMA table_info({table});");
    let mut stmt = conn.prepare(&pragma)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in rows {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}
