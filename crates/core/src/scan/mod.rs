//! Lexical structure analysis without a full parser.
//!
//! - `lexer`: masks comments and literal contents into a code view.
//! - Scanner (this module): finds function-like definitions line by line.
//! - `boundary`: traces a body's extent by balancing block delimiters.
//! - `annotation`: associates the nearest documentation block above a definition.

pub mod annotation;
pub mod boundary;
pub mod lexer;

use std::sync::OnceLock;

use regex::Regex;

use crate::model::FunctionRecord;

pub use annotation::associate_annotation;
pub use boundary::trace_body;
pub use lexer::mask_lines;

/// Source text split into raw lines plus the masked code view of each line.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub lines: Vec<String>,
    pub code_lines: Vec<String>,
}

impl SourceFile {
    pub fn parse(path: impl Into<String>, text: &str) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let code_lines = mask_lines(text);
        Self { path: path.into(), lines, code_lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Raw text of a 1-based line.
    pub fn raw(&self, line: usize) -> Option<&str> {
        line.checked_sub(1).and_then(|i| self.lines.get(i)).map(String::as_str)
    }

    /// Masked code view of a 1-based line.
    pub fn code(&self, line: usize) -> Option<&str> {
        line.checked_sub(1).and_then(|i| self.code_lines.get(i)).map(String::as_str)
    }
}

/// Syntactic flavor of a definition. Only the scanner cares; records are uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefinitionShape {
    Visible,
    Plain,
    Bound,
    Method,
}

struct ShapePattern {
    shape: DefinitionShape,
    regex: Regex,
}

/// Words that look like `name(...) {` but are control flow, not definitions.
const NON_DEFINITION_NAMES: &[&str] = &[
    "if", "for", "while", "switch", "catch", "with", "function", "return", "else", "do", "try",
    "typeof", "new", "await", "yield",
];

/// Definition shapes in priority order; the first match on a line wins.
fn shape_patterns() -> &'static [ShapePattern] {
    static PATTERNS: OnceLock<Vec<ShapePattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let table = [
            (
                DefinitionShape::Visible,
                r"^\s*export\s+(?:default\s+)?(?P<async>async\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*[<(]",
            ),
            (
                DefinitionShape::Plain,
                r"^\s*(?P<async>async\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*[<(]",
            ),
            (
                DefinitionShape::Bound,
                r"^\s*(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*(?P<async>async\s+)?(?:function\b|\([^)]*\)\s*(?::[^=]+)?=>|(?P<open>\(\s*$)|[A-Za-z_$][\w$]*\s*=>)",
            ),
            (
                DefinitionShape::Method,
                r"^\s*(?:(?:static|public|private|protected|override)\s+)*(?P<async>async\s+)?\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*\([^()]*\)\s*(?::\s*[^{;=]+)?\{",
            ),
        ];
        table
            .into_iter()
            .map(|(shape, pattern)| ShapePattern {
                shape,
                regex: Regex::new(pattern).expect("definition pattern is valid"),
            })
            .collect()
    })
}

/// A definition candidate on one line.
struct Candidate {
    name: String,
    is_async: bool,
    /// `const f = (` with the parameter list continuing on later lines.
    open_params: bool,
}

/// Test a single code line against every shape.
fn match_definition(code_line: &str) -> Option<Candidate> {
    for pattern in shape_patterns() {
        let Some(caps) = pattern.regex.captures(code_line) else {
            continue;
        };
        let name = caps.name("name").map(|m| m.as_str()).unwrap_or_default();
        if pattern.shape == DefinitionShape::Method && NON_DEFINITION_NAMES.contains(&name) {
            continue;
        }
        return Some(Candidate {
            name: name.to_string(),
            is_async: caps.name("async").is_some(),
            open_params: caps.name("open").is_some(),
        });
    }
    None
}

/// How many lines a multi-line parameter list may span.
const PARAMETER_LOOKAHEAD: usize = 20;

fn arrow_after_params() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?::[^=;]+)?=>").expect("arrow pattern is valid")
    })
}

/// Whether the group opened at the end of `line` (1-based) closes into `=>`.
///
/// Distinguishes `const f = (\n a,\n b\n) => {` from a parenthesised
/// multi-line expression such as `const total = (\n a * b\n);`.
fn params_close_into_arrow(file: &SourceFile, line: usize) -> bool {
    let mut depth = 1usize;
    let last = (line + PARAMETER_LOOKAHEAD).min(file.line_count());
    for next in line + 1..=last {
        let Some(code) = file.code(next) else {
            return false;
        };
        for (idx, ch) in code.char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        let mut rest = code[idx + 1..].trim().to_string();
                        if rest.is_empty() {
                            rest = file.code(next + 1).unwrap_or_default().trim().to_string();
                        }
                        return arrow_after_params().is_match(&rest);
                    }
                }
                _ => {}
            }
        }
    }
    false
}

/// Find every function-like definition in a source file, in line order.
pub fn scan_functions(file: &SourceFile) -> Vec<FunctionRecord> {
    let records: Vec<FunctionRecord> = file
        .code_lines
        .iter()
        .enumerate()
        .filter_map(|(idx, code)| {
            let candidate = match_definition(code)?;
            if candidate.open_params && !params_close_into_arrow(file, idx + 1) {
                return None;
            }
            Some(
                FunctionRecord::new(candidate.name, file.path.clone(), idx + 1)
                    .with_async(candidate.is_async),
            )
        })
        .collect();
    tracing::debug!(file = %file.path, functions = records.len(), "scanned definitions");
    records
}

/// Convenience wrapper: parse `text` and scan it in one step.
pub fn scan_source(path: &str, text: &str) -> Vec<FunctionRecord> {
    scan_functions(&SourceFile::parse(path, text))
}
