use anyhow::Result;
use contract_core::db::RunCommand;
use contract_core::project::discover_source_files;
use contract_core::todos::validate_todos;

use crate::commands::{emit_report, RunOptions, RunTracker};

/// `todos`: cross-reference code `@todo` anchors with the backlog.
///
/// Path mismatches are warnings, so only anchor errors fail the run.
pub fn todos_command(options: &RunOptions, backlog: Option<&str>) -> Result<bool> {
    let tracker = RunTracker::start(RunCommand::Todos);
    let mut ctx = options.context()?;
    if let Some(backlog) = backlog {
        ctx.config.todos.backlog = backlog.to_string();
    }

    let files = discover_source_files(&ctx.layout, &ctx.config.scan)?;
    let report = validate_todos(&ctx.layout, &files, &ctx.config.todos);
    emit_report(&report, "Todo cross-reference", options.json)?;

    let passed = !report.has_errors();
    let mut inputs = files;
    inputs.push(ctx.config.todos.backlog.clone());
    tracker.finish(&ctx.layout, &inputs, &report, passed, options.no_history)?;
    Ok(passed)
}
