use std::sync::OnceLock;

use regex::Regex;

use crate::detect::SignalDetector;
use crate::model::{BodyExtent, Signal, SignalKind};

fn throw_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // throw new Kind(...)
            r"\bthrow\s+new\s+(?P<kind>[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*)",
            // throw Kind(...), a capitalised error factory
            r"\bthrow\s+(?P<kind>[A-Z][\w$]*)\s*\(",
            // Promise.reject(new Kind(...))
            r"\bPromise\.reject\(\s*new\s+(?P<kind>[A-Za-z_$][\w$]*)",
        ]
        .into_iter()
        .map(|p| Regex::new(p).expect("throw pattern is valid"))
        .collect()
    })
}

/// Finds explicit error-raising sites and reports one signal per distinct
/// error kind, in order of first appearance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrowDetector;

impl SignalDetector for ThrowDetector {
    fn detect(&self, body: &BodyExtent) -> Vec<Signal> {
        let mut sites: Vec<(usize, &str)> = throw_patterns()
            .iter()
            .flat_map(|re| re.captures_iter(&body.code))
            .filter_map(|caps| caps.name("kind").map(|m| (m.start(), m.as_str())))
            .collect();
        sites.sort_by_key(|(offset, _)| *offset);

        let mut signals: Vec<Signal> = Vec::new();
        for (offset, kind) in sites {
            if signals.iter().any(|s| s.detail == kind) {
                continue;
            }
            signals.push(Signal::new(SignalKind::Throws, kind, body.line_of_offset(offset)));
        }
        signals
    }

    fn name(&self) -> &'static str {
        "throws"
    }
}
