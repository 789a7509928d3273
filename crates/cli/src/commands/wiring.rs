use anyhow::{Context, Result};
use contract_core::db::RunCommand;
use contract_core::wiring::{validate_wiring, WiringReport};

use crate::commands::{emit_report, RunOptions, RunTracker};

fn print_bindings(report: &WiringReport) {
    if report.bindings.is_empty() {
        return;
    }
    println!("Generators:");
    for binding in &report.bindings {
        println!(
            "- {} [registered: {}, on disk: {}] output: {}",
            binding.script_name,
            if binding.registered_in_config { "yes" } else { "no" },
            if binding.exists_on_disk { "yes" } else { "no" },
            binding.output_path.as_deref().unwrap_or("(none found)")
        );
    }
    println!();
}

/// `wiring`: compare generator scripts on disk with their build-config registration.
///
/// Passes only when both sets match and every generator shows output evidence.
pub fn wiring_command(options: &RunOptions) -> Result<bool> {
    let tracker = RunTracker::start(RunCommand::Wiring);
    let ctx = options.context()?;
    let wiring = &ctx.config.wiring;

    let result = validate_wiring(&ctx.layout, wiring).context("Failed to validate wiring")?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_bindings(&result);
        emit_report(&result.report, "Generator wiring", false)?;
    }

    let passed = result.is_consistent();
    let dir = wiring.generator_dir.trim_end_matches('/');
    let mut inputs = vec![wiring.build_config.clone()];
    inputs.extend(
        result
            .bindings
            .iter()
            .filter(|b| b.exists_on_disk)
            .map(|b| format!("{dir}/{}", b.script_name)),
    );
    tracker.finish(&ctx.layout, &inputs, &result.report, passed, options.no_history)?;
    Ok(passed)
}
