use anyhow::{anyhow, bail, Context, Result};
use contract_core::db::{HistoryDb, RunCommand};
use contract_core::project::ProjectLayout;

use crate::canonicalize_or_current;

/// `history`: list recorded runs, optionally only those of one command.
pub fn history_command(root: &str, command: Option<&str>, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);
    if !layout.history_db_path.is_file() {
        bail!(
            "No run history at {}; run `contract-lint init` first",
            layout.history_db_path.display()
        );
    }

    let filter = command.map(|c| c.parse::<RunCommand>().map_err(|e| anyhow!(e))).transpose()?;
    let db = HistoryDb::open(&layout.history_db_path).with_context(|| {
        format!("Failed to open history database at {}", layout.history_db_path.display())
    })?;
    let runs = db.list_check_runs(filter).context("Failed to list recorded runs")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
        return Ok(());
    }

    if runs.is_empty() {
        println!("No runs recorded.");
        return Ok(());
    }
    println!("Recorded runs ({}):", runs.len());
    for run in runs {
        let short_hash = run.input_hash.get(..12).unwrap_or(run.input_hash.as_str());
        println!(
            "- {} {} [{}] files={} issues={} (errors={}, warnings={}) input={}",
            run.started_at,
            run.command.as_str(),
            run.outcome.as_str(),
            run.files,
            run.total,
            run.errors,
            run.warnings,
            short_hash
        );
    }
    Ok(())
}
