use regex::Regex;

use crate::detect::SignalDetector;
use crate::model::{BodyExtent, Signal, SignalKind};
use crate::project::SetterRegistry;

/// Rejects `$`-prefixed identifiers and `function setX(` definitions.
fn is_call_site(code: &str, start: usize) -> bool {
    let before = &code[..start];
    !before.ends_with('$') && !before.trim_end().ends_with("function")
}

/// Matches calls to registered state setters and attributes each to the
/// logical state field that owns it.
#[derive(Debug, Clone)]
pub struct StateSetterDetector {
    registry: SetterRegistry,
    /// `None` when the registry is empty.
    pattern: Option<Regex>,
}

impl StateSetterDetector {
    pub fn new(registry: &SetterRegistry) -> Result<Self, regex::Error> {
        let names = registry.setter_names();
        let pattern = if names.is_empty() {
            None
        } else {
            let alternation =
                names.iter().map(|n| regex::escape(n)).collect::<Vec<_>>().join("|");
            Some(Regex::new(&format!(r"\b(?P<name>{alternation})\s*\("))?)
        };
        Ok(Self { registry: registry.clone(), pattern })
    }
}

impl SignalDetector for StateSetterDetector {
    fn detect(&self, body: &BodyExtent) -> Vec<Signal> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        pattern
            .captures_iter(&body.code)
            .filter_map(|caps| caps.name("name"))
            .filter(|m| is_call_site(&body.code, m.start()))
            .filter_map(|m| {
                self.registry.field_for(m.as_str()).map(|field| {
                    Signal::new(SignalKind::StateMutation, m.as_str(), body.line_of_offset(m.start()))
                        .with_field(field)
                })
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "state-setters"
    }
}
