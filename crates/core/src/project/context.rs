use std::path::Path;

use anyhow::Result;

use crate::project::{resolve_project_config, ProjectConfig, ProjectLayout};

/// Convenience wrapper bundling the layout and the effective configuration.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub layout: ProjectLayout,
    pub config: ProjectConfig,
}

impl ProjectContext {
    /// Compute the layout for `root` and load its config, or `config_override` when given.
    pub fn from_root(root: impl AsRef<Path>, config_override: Option<&Path>) -> Result<Self> {
        let layout = ProjectLayout::new(root);
        let config = resolve_project_config(&layout, config_override)?;
        Ok(Self { layout, config })
    }
}
