use serde::{Deserialize, Serialize};

/// Which command produced a recorded run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunCommand {
    Check,
    Todos,
    Wiring,
}

impl RunCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunCommand::Check => "check",
            RunCommand::Todos => "todos",
            RunCommand::Wiring => "wiring",
        }
    }
}

impl std::str::FromStr for RunCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "check" => Ok(RunCommand::Check),
            "todos" => Ok(RunCommand::Todos),
            "wiring" => Ok(RunCommand::Wiring),
            other => Err(format!("unknown command `{other}`")),
        }
    }
}

/// Overall result of a recorded run, as seen by the exit code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Passed,
    Failed,
}

impl RunOutcome {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            RunOutcome::Passed
        } else {
            RunOutcome::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Passed => "passed",
            RunOutcome::Failed => "failed",
        }
    }
}

/// One recorded check/todos/wiring run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckRunRecord {
    pub command: RunCommand,
    /// SHA-256 over the inputs the run read, hex encoded.
    pub input_hash: String,
    pub files: usize,
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub outcome: RunOutcome,
    pub started_at: String,
    pub finished_at: String,
}
