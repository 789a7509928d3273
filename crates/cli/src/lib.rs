use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

pub mod commands;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "CONTRACT_LINT_LOG";

/// Canonicalize the root path if possible, falling back to the given string
/// relative to the current working directory.
pub fn canonicalize_or_current(root: &str) -> Result<PathBuf> {
    let path = Path::new(root);
    if path == Path::new(".") {
        Ok(env::current_dir().context("Failed to get current directory")?)
    } else {
        // Paths that do not exist yet cannot be canonicalized.
        match path.canonicalize() {
            Ok(p) => Ok(p),
            Err(_) => {
                let cwd = env::current_dir().context("Failed to get current directory")?;
                Ok(cwd.join(path))
            }
        }
    }
}

/// Install the stderr log subscriber.
///
/// `CONTRACT_LINT_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Fingerprint a set of input files: SHA-256 over each path and its content,
/// in the given order. Unreadable files contribute their path only.
pub fn fingerprint_inputs(root: &Path, files: &[String]) -> String {
    let mut hasher = Sha256::new();
    for file in files {
        hasher.update(file.as_bytes());
        hasher.update([0u8]);
        if let Ok(body) = std::fs::read(root.join(file)) {
            hasher.update(&body);
        }
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

/// Current UTC time in RFC 3339 form, for run records.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
