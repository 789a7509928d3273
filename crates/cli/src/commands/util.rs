use std::path::Path;

use anyhow::{Context, Result};
use contract_core::db::{CheckRunRecord, HistoryDb, RunCommand, RunOutcome};
use contract_core::model::CheckReport;
use contract_core::project::{ProjectContext, ProjectLayout};
use contract_core::report::{render_text, RenderOptions};

use crate::{canonicalize_or_current, fingerprint_inputs, now_rfc3339};

/// Options shared by the commands that produce a `CheckReport`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub root: String,
    pub config: Option<String>,
    pub json: bool,
    pub no_history: bool,
}

impl RunOptions {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into(), ..Self::default() }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn without_history(mut self) -> Self {
        self.no_history = true;
        self
    }

    /// Resolve the root and load the effective configuration.
    pub fn context(&self) -> Result<ProjectContext> {
        let root = canonicalize_or_current(&self.root)?;
        ProjectContext::from_root(&root, self.config.as_deref().map(Path::new))
    }
}

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}

/// Print a report as JSON (`{issues, stats}`) or as rendered text.
pub fn emit_report(report: &CheckReport, title: &str, json: bool) -> Result<()> {
    if json {
        let serialized = serde_json::to_string_pretty(report)?;
        println!("{serialized}");
    } else {
        print!("{}", render_text(report, title, &RenderOptions::default()));
    }
    Ok(())
}

/// Bookkeeping for one run, filled in as the command progresses.
#[derive(Debug, Clone)]
pub struct RunTracker {
    command: RunCommand,
    started_at: String,
}

impl RunTracker {
    pub fn start(command: RunCommand) -> Self {
        Self { command, started_at: now_rfc3339() }
    }

    /// Append the finished run to the history DB.
    ///
    /// Only initialized projects keep history; elsewhere this is a no-op.
    pub fn finish(
        self,
        layout: &ProjectLayout,
        inputs: &[String],
        report: &CheckReport,
        passed: bool,
        no_history: bool,
    ) -> Result<()> {
        if no_history || !layout.is_initialized() {
            return Ok(());
        }
        let record = CheckRunRecord {
            command: self.command,
            input_hash: fingerprint_inputs(&layout.root, inputs),
            files: inputs.len(),
            total: report.stats.total,
            errors: report.stats.errors,
            warnings: report.stats.warnings,
            outcome: RunOutcome::from_passed(passed),
            started_at: self.started_at,
            finished_at: now_rfc3339(),
        };
        let db = HistoryDb::open(&layout.history_db_path).with_context(|| {
            format!("Failed to open history database at {}", layout.history_db_path.display())
        })?;
        db.insert_check_run(&record).context("Failed to record run history")?;
        tracing::debug!(command = record.command.as_str(), hash = %record.input_hash, "recorded run");
        Ok(())
    }
}
