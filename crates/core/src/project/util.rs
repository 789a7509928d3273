use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::project::{ProjectConfig, ProjectLayout, ScanConfig};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse JSON config at {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("Failed to parse YAML config at {path}: {source}")]
    Yaml { path: PathBuf, source: serde_yaml::Error },

    /// Only `.json`, `.yaml`, and `.yml` are understood.
    #[error("Unsupported config format for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

/// Parse a config file, choosing JSON or YAML by extension.
pub fn read_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let body = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    match ext {
        "json" => serde_json::from_str(&body)
            .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source }),
        "yaml" | "yml" => serde_yaml::from_str(&body)
            .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source }),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load the project config for a layout, falling back to defaults when none exists.
pub fn load_project_config(layout: &ProjectLayout) -> Result<ProjectConfig> {
    match layout.existing_config_path() {
        Some(path) => Ok(read_config_file(path)?),
        None => {
            tracing::debug!(root = %layout.root.display(), "no config file; using defaults");
            Ok(ProjectConfig::default())
        }
    }
}

/// Load config from an explicit override path, or from the layout when none is given.
pub fn resolve_project_config(
    layout: &ProjectLayout,
    override_path: Option<&Path>,
) -> Result<ProjectConfig> {
    match override_path {
        Some(path) => {
            let path = layout.resolve(path);
            read_config_file(&path)
                .with_context(|| format!("Failed to load config override {}", path.display()))
        }
        None => load_project_config(layout),
    }
}

fn is_excluded(entry: &DirEntry, scan: &ScanConfig) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| scan.exclude_dirs.iter().any(|d| d == name))
}

/// Discover source files under the project root, as sorted root-relative paths.
pub fn discover_source_files(layout: &ProjectLayout, scan: &ScanConfig) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(&layout.root).into_iter().filter_entry(|e| !is_excluded(e, scan));
    for entry in walker {
        let entry = entry
            .with_context(|| format!("Failed to walk source tree at {}", layout.root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry.path().extension().and_then(|e| e.to_str()).unwrap_or_default();
        if scan.extensions.iter().any(|e| e == ext) {
            files.push(layout.relative_string(entry.path()));
        }
    }
    files.sort();
    tracing::debug!(count = files.len(), "discovered source files");
    Ok(files)
}
