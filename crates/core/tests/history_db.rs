use contract_core::db::{
    CheckRunRecord, DbError, HistoryDb, RunCommand, RunOutcome, CURRENT_SCHEMA_VERSION,
};
use rusqlite::Connection;
use tempfile::tempdir;

fn record(command: RunCommand, errors: usize, started_at: &str) -> CheckRunRecord {
    CheckRunRecord {
        command,
        input_hash: format!("hash-{started_at}"),
        files: 4,
        total: errors + 1,
        errors,
        warnings: 1,
        outcome: RunOutcome::from_passed(errors == 0),
        started_at: started_at.to_string(),
        finished_at: started_at.to_string(),
    }
}

#[test]
fn fresh_database_is_at_current_schema() {
    let db = HistoryDb::open_in_memory().expect("open db");
    assert_eq!(db.schema_version().expect("schema version"), CURRENT_SCHEMA_VERSION);
    assert!(db.list_check_runs(None).expect("list runs").is_empty());
}

#[test]
fn runs_round_trip_and_filter_by_command() {
    let db = HistoryDb::open_in_memory().expect("open db");
    let first = record(RunCommand::Check, 0, "2026-01-01T00:00:00Z");
    let second = record(RunCommand::Todos, 2, "2026-01-01T00:01:00Z");
    let third = record(RunCommand::Check, 1, "2026-01-01T00:02:00Z");
    for r in [&first, &second, &third] {
        db.insert_check_run(r).expect("insert run");
    }

    let all = db.list_check_runs(None).expect("list runs");
    assert_eq!(all, vec![first.clone(), second.clone(), third.clone()]);

    let checks = db.list_check_runs(Some(RunCommand::Check)).expect("list checks");
    assert_eq!(checks, vec![first, third.clone()]);

    let latest = db.latest_check_run(RunCommand::Check).expect("latest").expect("some run");
    assert_eq!(latest, third);
    assert_eq!(latest.outcome, RunOutcome::Failed);
    assert!(db.latest_check_run(RunCommand::Wiring).expect("latest wiring").is_none());
}

#[test]
fn reopening_keeps_history() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("history.db");
    {
        let db = HistoryDb::open(&path).expect("open db");
        db.insert_check_run(&record(RunCommand::Wiring, 0, "2026-01-01T00:00:00Z"))
            .expect("insert run");
    }
    let db = HistoryDb::open(&path).expect("reopen db");
    assert_eq!(db.list_check_runs(None).expect("list runs").len(), 1);
}

#[test]
fn version_one_database_is_migrated() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("history.db");
    {
        let conn = Connection::open(&path).expect("open raw db");
        conn.execute_batch(
            r#"
            CREATE TABLE check_runs (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                command     TEXT NOT NULL,
                input_hash  TEXT NOT NULL,
                total       INTEGER NOT NULL,
                errors      INTEGER NOT NULL,
                warnings    INTEGER NOT NULL,
                started_at  TEXT NOT NULL,
                finished_at TEXT NOT NULL
            );
            INSERT INTO check_runs (command, input_hash, total, errors, warnings, started_at, finished_at)
            VALUES ('check', 'abc', 3, 2, 1, 't0', 't1'),
                   ('todos', 'def', 0, 0, 0, 't2', 't3');
            PRAGMA user_version = 1;
            "#,
        )
        .expect("seed v1 schema");
    }

    let db = HistoryDb::open(&path).expect("migrate db");
    assert_eq!(db.schema_version().expect("schema version"), CURRENT_SCHEMA_VERSION);

    let runs = db.list_check_runs(None).expect("list runs");
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].outcome, RunOutcome::Failed);
    assert_eq!(runs[0].files, 0);
    assert_eq!(runs[1].outcome, RunOutcome::Passed);
}

#[test]
fn newer_schema_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("history.db");
    {
        let conn = Connection::open(&path).expect("open raw db");
        conn.execute_batch("PRAGMA user_version = 99;").expect("bump version");
    }

    match HistoryDb::open(&path) {
        Err(DbError::UnsupportedSchemaVersion { found, max_supported, .. }) => {
            assert_eq!(found, 99);
            assert_eq!(max_supported, CURRENT_SCHEMA_VERSION);
        }
        other => panic!("expected unsupported schema error, got {other:?}"),
    }
}

#[test]
fn run_command_parses_case_insensitively() {
    assert_eq!("Check".parse::<RunCommand>(), Ok(RunCommand::Check));
    assert_eq!("wiring".parse::<RunCommand>(), Ok(RunCommand::Wiring));
    assert!("deploy".parse::<RunCommand>().is_err());
}
