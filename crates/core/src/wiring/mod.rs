//! Generator wiring validation.
//!
//! Two sets are enumerated independently: generator scripts on disk (by file
//! naming convention) and generator scripts named in one build-config script
//! string. Each name missing from either side is an error. Generators that
//! exist but never mention an output path convention get a warning.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CheckReport, GeneratorBinding, Issue, IssueKind, Severity};
use crate::project::{ProjectLayout, WiringConfig};

#[derive(Debug, Error)]
pub enum WiringError {
    #[error("Invalid generator naming pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Outcome of a wiring run: the joined bindings plus the issues they produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiringReport {
    pub bindings: Vec<GeneratorBinding>,
    #[serde(flatten)]
    pub report: CheckReport,
}

impl WiringReport {
    /// True when both sets are equal and every generator shows output evidence.
    pub fn is_consistent(&self) -> bool {
        self.report.issues.is_empty()
    }
}

/// Regex matching generator script names built from the naming convention.
pub fn generator_pattern(config: &WiringConfig) -> Result<Regex, WiringError> {
    let extensions = config
        .generator_extensions
        .iter()
        .map(|ext| regex::escape(ext.trim_start_matches('.')))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(
        r"(?:^|[^\w\-])(?P<name>{}[\w.\-]*?\.(?:{}))(?:$|[^\w.\-])",
        regex::escape(&config.generator_prefix),
        extensions
    );
    Ok(Regex::new(&pattern)?)
}

/// Generator names referenced by a build-config script string.
pub fn registered_generators(script: &str, pattern: &Regex) -> BTreeSet<String> {
    // One reference per token, matched on its basename.
    script
        .split(|c: char| c.is_whitespace() || c == ';' || c == '&' || c == '|')
        .filter_map(|token| {
            let base = token.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(token);
            pattern.captures(base).map(|caps| caps["name"].to_string())
        })
        .collect()
}

/// Read the configured script string out of the build configuration.
///
/// Missing or unparsable configuration reads as an empty registration list.
fn read_script_entry(layout: &ProjectLayout, config: &WiringConfig) -> (String, usize) {
    let path = layout.resolve(&config.build_config);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(build_config = %path.display(), error = %err, "build config unreadable");
            return (String::new(), 1);
        }
    };
    let parsed: serde_json::Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(build_config = %path.display(), error = %err, "build config is not valid JSON");
            return (String::new(), 1);
        }
    };
    let script = parsed
        .get("scripts")
        .and_then(|scripts| scripts.get(&config.script))
        .and_then(|value| value.as_str())
        .unwrap_or_default()
        .to_string();
    if script.is_empty() {
        tracing::warn!(script = %config.script, "build config has no generator script entry");
    }
    let key = format!("\"{}\"", config.script);
    let line = text.lines().position(|l| l.contains(&key)).map_or(1, |idx| idx + 1);
    (script, line)
}

/// Generator scripts present on disk under the configured directory.
pub fn generators_on_disk(
    layout: &ProjectLayout,
    config: &WiringConfig,
    pattern: &Regex,
) -> BTreeSet<String> {
    let dir = layout.resolve(&config.generator_dir);
    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "generator directory unreadable");
            return BTreeSet::new();
        }
    };
    entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| {
            pattern.captures(name).is_some_and(|caps| caps["name"].len() == name.len())
        })
        .collect()
}

fn string_literal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""(?P<d>[^"\n]*)"|'(?P<s>[^'\n]*)'|`(?P<t>[^`]*)`"#)
            .expect("string literal pattern is valid")
    })
}

/// Find evidence that a generator writes under one of the output conventions.
///
/// A string literal mentioning a convention is preferred, since it is usually
/// the actual output path; a bare mention is accepted as weaker evidence.
pub fn find_output_evidence(source: &str, conventions: &[String]) -> Option<String> {
    let literal = string_literal_pattern().captures_iter(source).find_map(|caps| {
        let text = caps.name("d").or(caps.name("s")).or(caps.name("t"))?.as_str();
        conventions.iter().any(|c| text.contains(c.as_str())).then(|| text.to_string())
    });
    literal.or_else(|| conventions.iter().find(|c| source.contains(c.as_str())).cloned())
}

/// Join the two name sets into one binding per generator, sorted by name.
pub fn join_bindings(
    on_disk: &BTreeSet<String>,
    registered: &BTreeSet<String>,
) -> Vec<GeneratorBinding> {
    let mut joined: BTreeMap<&str, GeneratorBinding> = BTreeMap::new();
    for name in on_disk.iter().chain(registered) {
        joined.entry(name.as_str()).or_insert_with(|| GeneratorBinding {
            script_name: name.clone(),
            registered_in_config: registered.contains(name),
            exists_on_disk: on_disk.contains(name),
            output_path: None,
        });
    }
    joined.into_values().collect()
}

/// Run the wiring validation for a project.
pub fn validate_wiring(
    layout: &ProjectLayout,
    config: &WiringConfig,
) -> Result<WiringReport, WiringError> {
    let pattern = generator_pattern(config)?;
    let (script, script_line) = read_script_entry(layout, config);
    let registered = registered_generators(&script, &pattern);
    let on_disk = generators_on_disk(layout, config, &pattern);
    let mut bindings = join_bindings(&on_disk, &registered);

    let dir = config.generator_dir.trim_end_matches('/');
    let mut issues = Vec::new();
    for binding in &mut bindings {
        let name = binding.script_name.clone();
        let generator_path = format!("{dir}/{name}");

        if !binding.exists_on_disk {
            issues.push(
                Issue::new(
                    &config.build_config,
                    script_line,
                    &name,
                    IssueKind::MissingGeneratorFile,
                    Severity::Error,
                )
                .with_message(format!(
                    "`{}` registers `{name}` but {generator_path} does not exist",
                    config.script
                ))
                .with_suggestion(format!(
                    "Create {generator_path} or remove it from `scripts.{}`.",
                    config.script
                )),
            );
            continue;
        }

        if !binding.registered_in_config {
            issues.push(
                Issue::new(
                    &generator_path,
                    1,
                    &name,
                    IssueKind::UnregisteredGenerator,
                    Severity::Error,
                )
                .with_message(format!(
                    "{generator_path} is not invoked by `scripts.{}` in {}",
                    config.script, config.build_config
                ))
                .with_suggestion(format!(
                    "Append `&& node {generator_path}` to `scripts.{}`.",
                    config.script
                )),
            );
        }

        match std::fs::read_to_string(layout.resolve(&generator_path)) {
            Ok(source) => binding.output_path = find_output_evidence(&source, &config.output_conventions),
            Err(err) => {
                tracing::debug!(file = %generator_path, error = %err, "skipping unreadable generator");
            }
        }
        if binding.output_path.is_none() {
            issues.push(
                Issue::new(
                    &generator_path,
                    1,
                    &name,
                    IssueKind::GeneratorOutputUnverified,
                    Severity::Warning,
                )
                .with_message(format!(
                    "{generator_path} shows no sign of writing under {}",
                    config.output_conventions.join(" or ")
                ))
                .with_suggestion(
                    "Write generated output under one of the configured output directories."
                        .to_string(),
                ),
            );
        }
    }

    let report = CheckReport::new(issues);
    tracing::info!(
        generators = bindings.len(),
        errors = report.stats.errors,
        warnings = report.stats.warnings,
        "wiring check finished"
    );
    Ok(WiringReport { bindings, report })
}
