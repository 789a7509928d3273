use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnnotationTag, Severity};

/// How the boundary tracer counts block delimiters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryMode {
    /// Count braces on the literal-masked code view.
    #[default]
    Lexical,
    /// Count braces on raw lines; braces inside strings and comments are miscounted.
    LineCount,
}

/// Scan windows and file selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    /// Maximum number of lines the boundary tracer looks ahead.
    pub body_lookahead: usize,
    /// Maximum number of lines the associator looks back above a definition.
    pub annotation_lookback: usize,
    pub boundary_mode: BoundaryMode,
    /// Distinct mutations needed before a `@mutates` tag is required.
    pub mutation_threshold: usize,
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            body_lookahead: 200,
            annotation_lookback: 12,
            boundary_mode: BoundaryMode::Lexical,
            mutation_threshold: 2,
            extensions: ["js", "jsx", "mjs", "cjs", "ts", "tsx"].map(String::from).to_vec(),
            exclude_dirs: ["node_modules", ".git", "dist", "build", "coverage"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Tag keywords recognized for each annotation kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TagVocabulary {
    pub throws: Vec<String>,
    pub returns: Vec<String>,
    pub mutates: Vec<String>,
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self {
            throws: ["@throws", "@throw", "@exception"].map(String::from).to_vec(),
            returns: ["@returns", "@return"].map(String::from).to_vec(),
            mutates: ["@mutates", "@modifies", "@side-effects"].map(String::from).to_vec(),
        }
    }
}

impl TagVocabulary {
    /// Iterate `(tag, keyword)` pairs across all kinds.
    pub fn keywords(&self) -> impl Iterator<Item = (AnnotationTag, &str)> {
        let throws = self.throws.iter().map(|k| (AnnotationTag::Throws, k.as_str()));
        let returns = self.returns.iter().map(|k| (AnnotationTag::Returns, k.as_str()));
        let mutates = self.mutates.iter().map(|k| (AnnotationTag::Mutates, k.as_str()));
        throws.chain(returns).chain(mutates)
    }

    /// Preferred keyword for a tag, used in suggestions.
    pub fn preferred(&self, tag: AnnotationTag) -> &str {
        let list = match tag {
            AnnotationTag::Throws => &self.throws,
            AnnotationTag::Returns => &self.returns,
            AnnotationTag::Mutates => &self.mutates,
        };
        list.first().map(String::as_str).unwrap_or_else(|| match tag {
            AnnotationTag::Throws => "@throws",
            AnnotationTag::Returns => "@returns",
            AnnotationTag::Mutates => "@mutates",
        })
    }
}

/// Registry of state-setter functions, keyed by the logical state field they own.
///
/// This is the single source of truth shared by the state detector and the
/// mutation checker's setter exemption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetterRegistry {
    fields: BTreeMap<String, Vec<String>>,
}

impl SetterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration of one field and its setters.
    pub fn with_field<I, S>(mut self, field: impl Into<String>, setters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(field, setters);
        self
    }

    pub fn insert<I, S>(&mut self, field: impl Into<String>, setters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.fields.entry(field.into()).or_default();
        for setter in setters {
            let setter = setter.into();
            if !entry.contains(&setter) {
                entry.push(setter);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Vec::is_empty)
    }

    /// Logical field mutated by `setter`, if registered.
    pub fn field_for(&self, setter: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, setters)| setters.iter().any(|s| s == setter))
            .map(|(field, _)| field.as_str())
    }

    /// Registered logical field names.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_setter(&self, name: &str) -> bool {
        self.field_for(name).is_some()
    }

    /// All setter names, sorted and deduplicated.
    pub fn setter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> =
            self.fields.values().flat_map(|s| s.iter().map(String::as_str)).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

/// Cross-reference validator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TodoConfig {
    /// Backlog document, relative to the project root.
    pub backlog: String,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self { backlog: "docs/TODO.md".to_string() }
    }
}

/// Wiring validator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WiringConfig {
    /// Build configuration file holding the script entry (JSON).
    pub build_config: String,
    /// Key under `scripts` whose value chains the generator invocations.
    pub script: String,
    pub generator_dir: String,
    pub generator_prefix: String,
    pub generator_extensions: Vec<String>,
    /// Path fragments a generator must mention to count as writing output.
    pub output_conventions: Vec<String>,
}

impl Default for WiringConfig {
    fn default() -> Self {
        Self {
            build_config: "package.json".to_string(),
            script: "generate:docs".to_string(),
            generator_dir: "scripts".to_string(),
            generator_prefix: "generate-".to_string(),
            generator_extensions: ["js", "mjs", "cjs", "ts"].map(String::from).to_vec(),
            output_conventions: ["docs/generated/", "docs/reference/"].map(String::from).to_vec(),
        }
    }
}

/// Serializable configuration for a checked project.
///
/// This lives at `.contracts/config.json` (or `.contracts/config.yaml`) in the
/// project root. Every field has a default, so an empty object is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// Schema/config version. This is about the config format, not the tool version.
    pub config_version: String,
    pub error_contract_severity: Severity,
    pub return_type_severity: Severity,
    pub mutation_severity: Severity,
    pub scan: ScanConfig,
    pub tags: TagVocabulary,
    pub state_setters: SetterRegistry,
    pub todos: TodoConfig,
    pub wiring: WiringConfig,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            config_version: "0.1.0".to_string(),
            error_contract_severity: Severity::Warning,
            return_type_severity: Severity::Warning,
            mutation_severity: Severity::Warning,
            scan: ScanConfig::default(),
            tags: TagVocabulary::default(),
            state_setters: SetterRegistry::default(),
            todos: TodoConfig::default(),
            wiring: WiringConfig::default(),
        }
    }
}

impl ProjectConfig {
    /// Builder-style helper to swap in a setter registry.
    pub fn with_state_setters(mut self, registry: SetterRegistry) -> Self {
        self.state_setters = registry;
        self
    }

    /// Set all three checker severities at once.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.error_contract_severity = severity;
        self.return_type_severity = severity;
        self.mutation_severity = severity;
        self
    }
}
