//! Run-history storage.
//!
//! A small SQLite database at `.contracts/history.db` recording each
//! `check`, `todos` and `wiring` run with its input fingerprint and issue totals.

pub mod history_db;
pub mod models;

pub use history_db::{DbError, DbResult, HistoryDb, CURRENT_SCHEMA_VERSION};
pub use models::{CheckRunRecord, RunCommand, RunOutcome};
