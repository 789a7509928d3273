use std::path::{Path, PathBuf};

/// Logical layout of a checked project on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
/// The CLI or other frontends are responsible for actually creating directories
/// and files based on this layout.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Root directory of the project. Scanned file paths are relative to it.
    pub root: PathBuf,
    /// Directory for checker metadata (.contracts).
    pub meta_dir: PathBuf,
    /// Path to the JSON config file.
    pub config_path: PathBuf,
    /// Alternative YAML config file, used when the JSON one is absent.
    pub yaml_config_path: PathBuf,
    /// Path to the run-history database.
    pub history_db_path: PathBuf,
}

impl ProjectLayout {
    /// Compute the default layout for a project rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".contracts");
        let config_path = meta_dir.join("config.json");
        let yaml_config_path = meta_dir.join("config.yaml");
        let history_db_path = meta_dir.join("history.db");

        Self { root, meta_dir, config_path, yaml_config_path, history_db_path }
    }

    /// Whether `init` has been run for this root.
    pub fn is_initialized(&self) -> bool {
        self.meta_dir.is_dir()
    }

    /// The config file that would be loaded, if any exists.
    pub fn existing_config_path(&self) -> Option<&Path> {
        [&self.config_path, &self.yaml_config_path]
            .into_iter()
            .find(|p| p.is_file())
            .map(|p| p.as_path())
    }

    /// Resolve a project-relative path (absolute paths are returned untouched).
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        let relative = relative.as_ref();
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            self.root.join(relative)
        }
    }

    /// Express `path` relative to the root with forward slashes, when possible.
    pub fn relative_string(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.to_string_lossy().replace('\\', "/")
    }
}
