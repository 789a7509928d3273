use std::fs;

use anyhow::{bail, Context, Result};
use contract_core::db::HistoryDb;
use contract_core::project::{load_project_config, ProjectConfig, ProjectLayout};
use serde::Serialize;

use crate::canonicalize_or_current;
use crate::commands::print_dir_status;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfoSnapshot {
    pub root: String,
    pub initialized: bool,
    pub config_file: Option<String>,
    pub history_db: String,
    pub recorded_runs: usize,
    pub config: ProjectConfig,
}

/// Initialize contract checking at `root`: metadata dir, default config, history DB.
///
/// An existing config is kept unless `force` is set.
pub fn init_command(root: &str, force: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);

    if let Some(existing) = layout.existing_config_path() {
        if !force {
            bail!(
                "Project already initialized ({} exists); pass --force to overwrite",
                existing.display()
            );
        }
    }

    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;

    let config = ProjectConfig::default();
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&layout.config_path, json).with_context(|| {
        format!("Failed to write project config: {}", layout.config_path.display())
    })?;

    // Create the history database up front so later runs only append.
    HistoryDb::open(&layout.history_db_path).with_context(|| {
        format!("Failed to initialize history database at {}", layout.history_db_path.display())
    })?;

    println!("Initialized contract checking:");
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.config_path.display());
    println!("  History DB: {}", layout.history_db_path.display());
    println!("  Backlog: {}", config.todos.backlog);

    Ok(())
}

/// Show the layout and effective configuration for `root`.
pub fn info_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);
    let config = load_project_config(&layout)?;

    let recorded_runs = if layout.history_db_path.is_file() {
        let db = HistoryDb::open(&layout.history_db_path).with_context(|| {
            format!("Failed to open history database at {}", layout.history_db_path.display())
        })?;
        db.list_check_runs(None).context("Failed to list recorded runs")?.len()
    } else {
        0
    };

    if json {
        let snapshot = ProjectInfoSnapshot {
            root: layout.root.display().to_string(),
            initialized: layout.is_initialized(),
            config_file: layout.existing_config_path().map(|p| p.display().to_string()),
            history_db: layout.history_db_path.display().to_string(),
            recorded_runs,
            config,
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("Contract Lint Project Info");
    println!("==========================");
    println!("Root: {}", layout.root.display());
    match layout.existing_config_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }
    println!("Config version: {}", config.config_version);
    println!(
        "Severities: errors={} returns={} mutations={}",
        config.error_contract_severity, config.return_type_severity, config.mutation_severity
    );
    println!(
        "Scan windows: lookahead={} lookback={} mode={:?}",
        config.scan.body_lookahead, config.scan.annotation_lookback, config.scan.boundary_mode
    );
    println!("Mutation threshold: {}", config.scan.mutation_threshold);
    println!("Extensions: {}", config.scan.extensions.join(", "));
    println!("State setter fields: {}", config.state_setters.fields().count());
    println!("Backlog: {}", config.todos.backlog);
    println!(
        "Generators: {}/{}*  registered in {} `{}`",
        config.wiring.generator_dir,
        config.wiring.generator_prefix,
        config.wiring.build_config,
        config.wiring.script
    );
    println!();

    println!("Paths:");
    print_dir_status("Meta dir (.contracts)", &layout.meta_dir);
    println!("Recorded runs: {recorded_runs}");

    Ok(())
}
