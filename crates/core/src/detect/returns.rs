use std::sync::OnceLock;

use regex::Regex;

use crate::detect::SignalDetector;
use crate::model::{BodyExtent, Signal, SignalKind};
use crate::scan::boundary::concise_arrow_tail;

const MAX_DETAIL_CHARS: usize = 40;

fn return_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // `[ \t]*` rather than `\s*`: a bare `return` followed by a newline yields undefined.
    PATTERN.get_or_init(|| {
        Regex::new(r"\breturn\b[ \t]*(?P<expr>[^;\s})\]][^;\n]*)")
            .expect("return pattern is valid")
    })
}

fn snippet(expr: &str) -> String {
    let expr = expr.trim().trim_end_matches(';').trim_end();
    if expr.chars().count() <= MAX_DETAIL_CHARS {
        expr.to_string()
    } else {
        let cut: String = expr.chars().take(MAX_DETAIL_CHARS).collect();
        format!("{cut}…")
    }
}

/// Expression of an arrow function whose body is not a block.
fn implicit_arrow_value(body: &BodyExtent) -> Option<String> {
    let mut lines = body.code.lines();
    let first = lines.next()?;
    let tail = concise_arrow_tail(first)?;
    let rest = first[tail..].trim();
    let expr = if rest.is_empty() { lines.map(str::trim).find(|l| !l.is_empty())? } else { rest };
    (!expr.starts_with('{')).then(|| snippet(expr))
}

/// Finds explicit return-with-value statements, plus the implicit value of an
/// expression-bodied arrow function.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnDetector;

impl SignalDetector for ReturnDetector {
    fn detect(&self, body: &BodyExtent) -> Vec<Signal> {
        let mut signals = Vec::new();
        if let Some(expr) = implicit_arrow_value(body) {
            signals.push(Signal::new(SignalKind::Returns, expr, body.start_line));
        }
        for caps in return_pattern().captures_iter(&body.code) {
            if let Some(expr) = caps.name("expr") {
                signals.push(Signal::new(
                    SignalKind::Returns,
                    snippet(expr.as_str()),
                    body.line_of_offset(expr.start()),
                ));
            }
        }
        signals
    }

    fn name(&self) -> &'static str {
        "returns"
    }
}
