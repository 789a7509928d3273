//! Body extent tracing by balanced-delimiter counting.
//!
//! Counting is line-oriented: each line contributes its opens minus closes.
//! The trace ends on the first line where the body has been entered and the
//! running count is back to zero. The caller supplies the lookahead window;
//! when it runs out first, the partial extent is returned with `truncated` set.

use crate::model::BodyExtent;
use crate::project::BoundaryMode;
use crate::scan::SourceFile;

/// Position just past a top-level `=>` that introduces an expression body.
///
/// Only the definition line is inspected: the arrow must sit at paren depth 0
/// and come before any depth-0 `{`.
pub(crate) fn concise_arrow_tail(code_line: &str) -> Option<usize> {
    let bytes = code_line.as_bytes();
    let mut depth: i32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b'{' if depth == 0 => return None,
            b'=' if depth == 0 && bytes.get(i + 1) == Some(&b'>') => return Some(i + 2),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Whether the definition on `start_line` has an expression (brace-less) arrow body.
pub fn has_expression_body(file: &SourceFile, start_line: usize) -> bool {
    let Some(code) = file.code(start_line) else {
        return false;
    };
    let Some(tail) = concise_arrow_tail(code) else {
        return false;
    };
    let rest = code[tail..].trim_start();
    if !rest.is_empty() {
        return !rest.starts_with('{');
    }
    // Arrow at end of line: look at the first non-blank line after it.
    (start_line + 1..=file.line_count())
        .filter_map(|l| file.code(l))
        .map(str::trim)
        .find(|l| !l.is_empty())
        .is_some_and(|l| !l.starts_with('{'))
}

fn delimiter_delta(line: &str, open: &[char], close: &[char]) -> (usize, usize) {
    let opens = line.chars().filter(|c| open.contains(c)).count();
    let closes = line.chars().filter(|c| close.contains(c)).count();
    (opens, closes)
}

const TRAILING_CONTINUATIONS: &[&str] =
    &["=>", "(", "[", "{", ",", "?", ":", "+", "-", "*", "/", "&&", "||", "??", "=", "."];
const LEADING_CONTINUATIONS: &[&str] =
    &[".", "?", ":", "+", "-", "*", "/", "&&", "||", "??", ")", "]"];

fn expression_continues(current: &str, next: Option<&str>) -> bool {
    let current = current.trim_end();
    if current.ends_with(';') {
        return false;
    }
    if TRAILING_CONTINUATIONS.iter().any(|t| current.ends_with(t)) {
        return true;
    }
    next.is_some_and(|n| LEADING_CONTINUATIONS.iter().any(|t| n.starts_with(t)))
}

/// Text the delimiter counter sees for `line` under `mode`.
fn counted_text(file: &SourceFile, line: usize, mode: BoundaryMode) -> &str {
    match mode {
        BoundaryMode::Lexical => file.code(line).unwrap_or_default(),
        BoundaryMode::LineCount => file.raw(line).unwrap_or_default(),
    }
}

fn build_extent(file: &SourceFile, start: usize, end: usize, truncated: bool) -> BodyExtent {
    let lo = start.saturating_sub(1).min(file.line_count());
    let hi = end.min(file.line_count()).max(lo);
    let slice = lo..hi;
    BodyExtent {
        start_line: start,
        end_line: end,
        text: file.lines[slice.clone()].join("\n"),
        code: file.code_lines[slice].join("\n"),
        truncated,
    }
}

/// Trace the body that starts on `start_line` (1-based), scanning at most
/// `lookahead` lines including the start line.
pub fn trace_body(
    file: &SourceFile,
    start_line: usize,
    lookahead: usize,
    mode: BoundaryMode,
) -> BodyExtent {
    let start_line = start_line.max(1);
    let last_allowed = (start_line + lookahead.max(1) - 1).min(file.line_count());
    if start_line > last_allowed {
        return build_extent(file, start_line, start_line, true);
    }

    if has_expression_body(file, start_line) {
        let mut depth: i64 = 0;
        for line in start_line..=last_allowed {
            let text = counted_text(file, line, mode);
            let (opens, closes) = delimiter_delta(text, &['(', '[', '{'], &[')', ']', '}']);
            depth += opens as i64 - closes as i64;
            if depth <= 0 {
                let next = (line + 1..=file.line_count())
                    .filter_map(|l| file.code(l))
                    .map(str::trim)
                    .find(|l| !l.is_empty());
                if !expression_continues(file.code(line).unwrap_or_default(), next) {
                    return build_extent(file, start_line, line, false);
                }
            }
        }
    } else {
        let mut depth: i64 = 0;
        let mut entered = false;
        for line in start_line..=last_allowed {
            let (opens, closes) = delimiter_delta(counted_text(file, line, mode), &['{'], &['}']);
            if opens > 0 {
                entered = true;
            }
            depth += opens as i64 - closes as i64;
            if entered && depth <= 0 {
                return build_extent(file, start_line, line, false);
            }
        }
    }

    tracing::debug!(
        file = %file.path,
        start_line,
        lookahead,
        "lookahead window exhausted before body balanced"
    );
    build_extent(file, start_line, last_allowed, true)
}
