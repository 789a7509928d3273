//! Human-readable rendering of a `CheckReport`.

use std::fmt::Write as _;

use crate::model::{CheckReport, Issue};

pub const DEFAULT_HINT: &str =
    "Hint: copy the suggested annotation blocks above into the flagged doc comments, or rerun with --json for the full list.";

/// Truncation limits and closing hint for the text report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub max_issues_per_file: usize,
    pub max_files: usize,
    pub hint: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { max_issues_per_file: 5, max_files: 10, hint: DEFAULT_HINT.to_string() }
    }
}

/// Group issues by file, keeping first-appearance order of files and of
/// issues within a file.
pub fn group_by_file(issues: &[Issue]) -> Vec<(&str, Vec<&Issue>)> {
    let mut groups: Vec<(&str, Vec<&Issue>)> = Vec::new();
    for issue in issues {
        match groups.iter_mut().find(|(file, _)| *file == issue.file) {
            Some((_, list)) => list.push(issue),
            None => groups.push((issue.file.as_str(), vec![issue])),
        }
    }
    groups
}

fn write_issue(out: &mut String, issue: &Issue) {
    let _ = writeln!(
        out,
        "  {}:{} [{}] {}: {}",
        issue.file, issue.line, issue.severity, issue.kind, issue.message
    );
    for line in issue.suggestion.lines() {
        let _ = writeln!(out, "      {line}");
    }
}

/// Render `report` as text under `title`.
pub fn render_text(report: &CheckReport, title: &str, options: &RenderOptions) -> String {
    let mut out = String::new();
    let stats = &report.stats;
    let _ = writeln!(
        out,
        "{title}: {} issue(s) ({} error(s), {} warning(s))",
        stats.total, stats.errors, stats.warnings
    );

    if report.issues.is_empty() {
        out.push_str("No issues found.\n");
    }

    let groups = group_by_file(&report.issues);
    for (file, issues) in groups.iter().take(options.max_files) {
        let _ = writeln!(out, "\n{file}");
        for issue in issues.iter().take(options.max_issues_per_file) {
            write_issue(&mut out, issue);
        }
        if issues.len() > options.max_issues_per_file {
            let _ = writeln!(
                out,
                "  …and {} more in this file",
                issues.len() - options.max_issues_per_file
            );
        }
    }
    if groups.len() > options.max_files {
        let hidden: usize = groups.iter().skip(options.max_files).map(|(_, list)| list.len()).sum();
        let _ = writeln!(
            out,
            "\n…and {} more file(s) with {hidden} issue(s)",
            groups.len() - options.max_files
        );
    }

    let _ = writeln!(out, "\n{}", options.hint);
    out
}
