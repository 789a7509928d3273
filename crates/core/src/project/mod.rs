//! Project layout, configuration, and source discovery.
//!
//! - `ProjectLayout`: computed paths for the `.contracts` metadata directory.
//! - `ProjectConfig`: serializable checker options (severities, scan windows,
//!   tag vocabulary, setter registry, validator settings).
//! - Helpers to load configuration and enumerate source files.

pub mod config;
pub mod context;
pub mod layout;
pub mod util;

pub use config::{
    BoundaryMode, ProjectConfig, ScanConfig, SetterRegistry, TagVocabulary, TodoConfig,
    WiringConfig,
};
pub use context::ProjectContext;
pub use layout::ProjectLayout;
pub use util::{
    discover_source_files, load_project_config, read_config_file, resolve_project_config,
    ConfigError,
};
