use crate::checks::{suggestion_block, ContractChecker, FunctionUnit};
use crate::model::{AnnotationTag, Issue, IssueKind, Severity, SignalKind};
use crate::project::ProjectConfig;

/// Flags value-returning (or async) functions without a return contract.
///
/// A synchronous function with no return-with-value statement is void and
/// exempt. Async functions are never exempt: they always produce a promise.
#[derive(Debug, Clone)]
pub struct ReturnTypeChecker {
    severity: Severity,
    tag: String,
}

impl ReturnTypeChecker {
    pub fn new(severity: Severity, tag: impl Into<String>) -> Self {
        Self { severity, tag: tag.into() }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(config.return_type_severity, config.tags.preferred(AnnotationTag::Returns))
    }
}

impl ContractChecker for ReturnTypeChecker {
    fn check(&self, unit: &FunctionUnit<'_>) -> Option<Issue> {
        let first_return = unit.signals_of(SignalKind::Returns).next();
        let is_async = unit.record.is_async;
        if (first_return.is_none() && !is_async) || unit.has_tag(AnnotationTag::Returns) {
            return None;
        }

        let name = &unit.record.name;
        let (message, line) = match (is_async, first_return) {
            (true, _) => (
                format!(
                    "`{name}` is async and resolves a promise but has no {} annotation",
                    self.tag
                ),
                format!("{} {{Promise<*>}} Describe the resolved value.", self.tag),
            ),
            (false, Some(signal)) => (
                format!(
                    "`{name}` returns a value (`{}`) but has no {} annotation",
                    signal.detail, self.tag
                ),
                format!("{} {{*}} Describe the returned value.", self.tag),
            ),
            (false, None) => return None,
        };

        Some(
            Issue::new(
                &unit.record.file,
                unit.record.start_line,
                name,
                IssueKind::MissingReturns,
                self.severity,
            )
            .with_message(message)
            .with_suggestion(suggestion_block(name, &[line])),
        )
    }

    fn name(&self) -> &'static str {
        "return-types"
    }
}
