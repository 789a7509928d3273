//! Cross-reference validation between `@todo` anchors in code and the backlog.
//!
//! Two indexes are built independently: deferred-work annotations found in
//! source (`@todo: docs/TODO.md#anchor`), and headed backlog entries
//! (`#### Title {#anchor}`). Both directions are checked. A recorded file path
//! that disagrees with where the annotation actually lives is only a warning.

pub mod backlog;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use rayon::prelude::*;
use regex::Regex;

use crate::model::{CheckReport, Issue, IssueKind, Severity, TodoAnnotation, TodoEntry};
use crate::project::{ProjectLayout, TodoConfig};
use crate::scan::scan_source;

pub use backlog::parse_backlog;

/// How far below an annotation the owning definition may start.
const OWNER_LOOKAHEAD: usize = 12;

fn todo_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"@todo:?\s*(?P<doc>[^\s#]+)#(?P<anchor>[A-Za-z0-9][\w.\-]*)")
            .expect("todo pattern is valid")
    })
}

/// Extract every `@todo: <doc>#<anchor>` annotation from one file.
pub fn extract_todo_annotations(path: &str, text: &str) -> Vec<TodoAnnotation> {
    let functions = scan_source(path, text);
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        for caps in todo_pattern().captures_iter(line) {
            let (Some(doc), Some(anchor)) = (caps.name("doc"), caps.name("anchor")) else {
                continue;
            };
            let owner = functions
                .iter()
                .find(|f| f.start_line >= line_no && f.start_line - line_no <= OWNER_LOOKAHEAD)
                .or_else(|| functions.iter().rev().find(|f| f.start_line < line_no))
                .map(|f| f.name.clone());
            out.push(TodoAnnotation {
                file: path.to_string(),
                line: line_no,
                document: doc.as_str().to_string(),
                anchor: anchor.as_str().to_string(),
                function: owner,
            });
        }
    }
    out
}

fn normalize_path(path: &str) -> String {
    path.trim().trim_start_matches("./").replace('\\', "/")
}

/// Whether a backlog-recorded path refers to the file an annotation was found in.
fn same_file(recorded: &str, actual: &str) -> bool {
    let recorded = normalize_path(recorded);
    let actual = normalize_path(actual);
    recorded == actual
        || actual.ends_with(&format!("/{recorded}"))
        || recorded.ends_with(&format!("/{actual}"))
}

/// Compare code annotations against backlog entries.
///
/// `backlog_file` is used as the location of issues that point into the backlog.
pub fn cross_reference(
    annotations: &[TodoAnnotation],
    entries: &[TodoEntry],
    backlog_file: &str,
) -> CheckReport {
    let mut issues = Vec::new();

    let mut index: BTreeMap<&str, &TodoEntry> = BTreeMap::new();
    let mut kept: Vec<&TodoEntry> = Vec::new();
    let mut duplicates: Vec<&TodoEntry> = Vec::new();
    for entry in entries {
        if index.contains_key(entry.anchor.as_str()) {
            duplicates.push(entry);
        } else {
            index.insert(entry.anchor.as_str(), entry);
            kept.push(entry);
        }
    }

    for annotation in annotations {
        if index.contains_key(annotation.anchor.as_str()) {
            continue;
        }
        let function = annotation.function.clone().unwrap_or_default();
        issues.push(
            Issue::new(
                &annotation.file,
                annotation.line,
                function,
                IssueKind::MissingTodoEntry,
                Severity::Error,
            )
            .with_message(format!(
                "@todo anchor `#{}` has no matching entry in {}",
                annotation.anchor, backlog_file
            ))
            .with_suggestion(format!(
                "Add a heading `#### <title> {{#{}}}` to {} or fix the anchor.",
                annotation.anchor, backlog_file
            )),
        );
    }

    for entry in duplicates {
        issues.push(
            Issue::new(
                backlog_file,
                entry.line,
                entry.function.clone().unwrap_or_default(),
                IssueKind::DuplicateTodoAnchor,
                Severity::Error,
            )
            .with_message(format!(
                "Anchor `#{}` is declared more than once; only the first entry is used",
                entry.anchor
            ))
            .with_suggestion("Give each backlog entry a unique anchor.".to_string()),
        );
    }

    let code_anchors: BTreeSet<&str> = annotations.iter().map(|a| a.anchor.as_str()).collect();
    for entry in kept.iter().filter(|e| e.function.is_some()) {
        if code_anchors.contains(entry.anchor.as_str()) {
            continue;
        }
        let function = entry.function.clone().unwrap_or_default();
        issues.push(
            Issue::new(
                backlog_file,
                entry.line,
                &function,
                IssueKind::MissingCodeAnnotation,
                Severity::Error,
            )
            .with_message(format!(
                "Backlog entry `#{}` declares function `{function}` but no code annotation references it",
                entry.anchor
            ))
            .with_suggestion(format!(
                "Add `// @todo: {backlog_file}#{}` above `{function}`, or remove the entry.",
                entry.anchor
            )),
        );
    }

    for entry in &kept {
        let Some(recorded) = entry.file.as_deref() else {
            continue;
        };
        let found: Vec<&TodoAnnotation> =
            annotations.iter().filter(|a| a.anchor == entry.anchor).collect();
        if found.is_empty() || found.iter().any(|a| same_file(recorded, &a.file)) {
            continue;
        }
        let actual = found[0];
        issues.push(
            Issue::new(
                &actual.file,
                actual.line,
                entry.function.clone().unwrap_or_default(),
                IssueKind::TodoFileMismatch,
                Severity::Warning,
            )
            .with_message(format!(
                "Backlog entry `#{}` records file `{recorded}` but the annotation is in `{}`",
                entry.anchor, actual.file
            ))
            .with_suggestion(format!(
                "Update the **File:** line of `#{}` to `{}`.",
                entry.anchor, actual.file
            )),
        );
    }

    CheckReport::new(issues)
}

/// Run the cross-reference validation over `files` and the configured backlog.
///
/// An unreadable backlog is treated as empty, so every code anchor is reported.
pub fn validate_todos(layout: &ProjectLayout, files: &[String], config: &TodoConfig) -> CheckReport {
    let annotations: Vec<TodoAnnotation> = files
        .par_iter()
        .map(|path| match std::fs::read_to_string(layout.resolve(path)) {
            Ok(text) => extract_todo_annotations(path, &text),
            Err(err) => {
                tracing::debug!(file = %path, error = %err, "skipping unreadable file");
                Vec::new()
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    let backlog_path = layout.resolve(&config.backlog);
    let entries = match std::fs::read_to_string(&backlog_path) {
        Ok(text) => parse_backlog(&text),
        Err(err) => {
            tracing::warn!(backlog = %backlog_path.display(), error = %err, "backlog unreadable");
            Vec::new()
        }
    };

    let report = cross_reference(&annotations, &entries, &config.backlog);
    tracing::info!(
        annotations = annotations.len(),
        entries = entries.len(),
        errors = report.stats.errors,
        "todo cross-reference finished"
    );
    report
}
