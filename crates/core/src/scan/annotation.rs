//! Association of documentation blocks with definitions.
//!
//! Walks upward from the line above a definition, within the caller's lookback
//! window. Blank lines and decorators are skipped until the first comment line;
//! from there the block extends upward while lines remain comments. Any code
//! line reached first means the definition has no annotation. Only tag
//! keywords are detected; payloads and tag ordering are not validated.

use crate::model::{AnnotationBlock, AnnotationTag};
use crate::project::TagVocabulary;
use crate::scan::SourceFile;

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
        || trimmed.ends_with("*/")
}

fn is_decorator_line(trimmed: &str) -> bool {
    trimmed.starts_with('@')
}

/// Whether `keyword` occurs in `line` as a whole tag (not a prefix of a longer one).
fn contains_tag(line: &str, keyword: &str) -> bool {
    line.match_indices(keyword).any(|(idx, _)| {
        let after = line[idx + keyword.len()..].chars().next();
        !after.is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '-')
    })
}

/// Detect which recognized tags appear in a set of comment lines.
pub fn detect_tags<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    vocabulary: &TagVocabulary,
) -> Vec<AnnotationTag> {
    let mut found = Vec::new();
    for line in lines {
        for (tag, keyword) in vocabulary.keywords() {
            if !found.contains(&tag) && contains_tag(line, keyword) {
                found.push(tag);
            }
        }
    }
    found
}

/// Find the documentation block for a definition on `start_line` (1-based),
/// looking back at most `lookback` lines.
pub fn associate_annotation(
    file: &SourceFile,
    start_line: usize,
    lookback: usize,
    vocabulary: &TagVocabulary,
) -> Option<AnnotationBlock> {
    let lowest = start_line.saturating_sub(lookback).max(1);
    let mut block_lines: Vec<&str> = Vec::new();
    let mut block_start = 0;

    for line in (lowest..start_line).rev() {
        let raw = file.raw(line)?;
        let trimmed = raw.trim();

        if block_lines.is_empty() {
            if trimmed.is_empty() || is_decorator_line(trimmed) {
                continue;
            }
            if !is_comment_line(trimmed) {
                return None;
            }
        } else if !is_comment_line(trimmed) {
            break;
        }
        block_lines.push(raw);
        block_start = line;
    }

    if block_lines.is_empty() {
        return None;
    }
    block_lines.reverse();

    let tags = detect_tags(block_lines.iter().copied(), vocabulary);
    Some(AnnotationBlock {
        tags: tags.into_iter().collect(),
        raw_lines: block_lines.into_iter().map(str::to_string).collect(),
        start_line: block_start,
    })
}
