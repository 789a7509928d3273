use std::path::Path;

use anyhow::{Context, Result};
use contract_core::checks::{CheckRunner, CheckerSelection};
use contract_core::db::RunCommand;
use contract_core::model::CheckReport;
use contract_core::project::{discover_source_files, ProjectLayout};

use crate::commands::{emit_report, RunOptions, RunTracker};

/// Turn user-supplied file arguments into root-relative paths.
fn normalize_inputs(layout: &ProjectLayout, files: &[String]) -> Vec<String> {
    files
        .iter()
        .map(|file| {
            let path = Path::new(file);
            if path.is_absolute() {
                layout.relative_string(path)
            } else {
                file.trim_start_matches("./").replace('\\', "/")
            }
        })
        .collect()
}

/// Run the contract checkers and return the combined report.
pub fn run_checks(
    layout: &ProjectLayout,
    config: &contract_core::project::ProjectConfig,
    selection: &[CheckerSelection],
    files: &[String],
) -> Result<CheckReport> {
    let selection: Vec<CheckerSelection> =
        if selection.is_empty() { CheckerSelection::ALL.to_vec() } else { selection.to_vec() };
    let runner = CheckRunner::for_selection(config, &selection)
        .context("Failed to build contract checkers")?;
    Ok(runner.check_files(layout, files))
}

/// `check`: run the selected contract checkers. Returns whether the run passed.
pub fn check_command(
    options: &RunOptions,
    selection: &[CheckerSelection],
    files: &[String],
) -> Result<bool> {
    let tracker = RunTracker::start(RunCommand::Check);
    let ctx = options.context()?;

    let inputs = if files.is_empty() {
        discover_source_files(&ctx.layout, &ctx.config.scan)?
    } else {
        normalize_inputs(&ctx.layout, files)
    };
    tracing::debug!(files = inputs.len(), "checking files");

    let report = run_checks(&ctx.layout, &ctx.config, selection, &inputs)?;
    emit_report(&report, "Contract check", options.json)?;

    let passed = !report.has_errors();
    tracker.finish(&ctx.layout, &inputs, &report, passed, options.no_history)?;
    Ok(passed)
}
