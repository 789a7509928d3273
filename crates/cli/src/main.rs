use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use contract_core::checks::CheckerSelection;
use contract_lint::commands::*;
use contract_lint::init_tracing;

/// Documentation-contract checker for JavaScript/TypeScript sources.
///
/// This CLI is a thin wrapper around `contract-core` (exposed in code as
/// `contract_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "contract-lint",
    version,
    about = "Check that doc annotations match what functions actually do",
    long_about = None
)]
struct Cli {
    /// Log debug output to stderr (overridden by CONTRACT_LINT_LOG).
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize contract checking at the given root.
    ///
    /// This will:
    /// - Create a `.contracts` metadata directory.
    /// - Write `.contracts/config.json` with default settings.
    /// - Create the run-history database.
    Init {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Overwrite an existing config.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Show the layout and effective configuration.
    Info {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Run the error, return and mutation contract checkers.
    ///
    /// Without FILES, every source file under the root is checked.
    Check {
        #[command(flatten)]
        run: RunArgs,

        /// Only run the named checkers (repeatable).
        #[arg(long, value_enum)]
        only: Vec<OnlyChecker>,

        /// Files to check, relative to the root.
        files: Vec<String>,
    },

    /// Cross-reference `@todo` anchors with the backlog document.
    Todos {
        #[command(flatten)]
        run: RunArgs,

        /// Backlog document, relative to the root. Overrides the config.
        #[arg(long)]
        backlog: Option<String>,
    },

    /// Compare generator scripts on disk with their build-config registration.
    Wiring {
        #[command(flatten)]
        run: RunArgs,
    },

    /// List recorded runs.
    History {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Only show runs of this command (check, todos, wiring).
        #[arg(long)]
        command: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Project root directory. Defaults to the current working directory.
    #[arg(long, default_value = ".")]
    root: String,

    /// Config file to use instead of `.contracts/config.json`.
    #[arg(long)]
    config: Option<String>,

    /// Emit `{issues, stats}` JSON instead of the text report.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Do not record this run in the history database.
    #[arg(long, default_value_t = false)]
    no_history: bool,
}

impl From<RunArgs> for RunOptions {
    fn from(args: RunArgs) -> Self {
        RunOptions { root: args.root, config: args.config, json: args.json, no_history: args.no_history }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OnlyChecker {
    Errors,
    Returns,
    Mutations,
}

impl From<OnlyChecker> for CheckerSelection {
    fn from(value: OnlyChecker) -> Self {
        match value {
            OnlyChecker::Errors => CheckerSelection::ErrorContracts,
            OnlyChecker::Returns => CheckerSelection::ReturnTypes,
            OnlyChecker::Mutations => CheckerSelection::Mutations,
        }
    }
}

fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match cli.command {
        Command::Init { root, force } => {
            init_command(&root, force)?;
            ExitCode::SUCCESS
        }
        Command::Info { root, json } => {
            info_command(&root, json)?;
            ExitCode::SUCCESS
        }
        Command::Check { run, only, files } => {
            let selection: Vec<CheckerSelection> = only.into_iter().map(Into::into).collect();
            exit_code(check_command(&run.into(), &selection, &files)?)
        }
        Command::Todos { run, backlog } => {
            exit_code(todos_command(&run.into(), backlog.as_deref())?)
        }
        Command::Wiring { run } => exit_code(wiring_command(&run.into())?),
        Command::History { root, command, json } => {
            history_command(&root, command.as_deref(), json)?;
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
