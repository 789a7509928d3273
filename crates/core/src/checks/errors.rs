use crate::checks::{suggestion_block, ContractChecker, FunctionUnit};
use crate::model::{AnnotationTag, Issue, IssueKind, Severity, SignalKind};
use crate::project::ProjectConfig;

/// Flags functions that raise errors without documenting them.
#[derive(Debug, Clone)]
pub struct ErrorContractChecker {
    severity: Severity,
    tag: String,
}

impl ErrorContractChecker {
    pub fn new(severity: Severity, tag: impl Into<String>) -> Self {
        Self { severity, tag: tag.into() }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(config.error_contract_severity, config.tags.preferred(AnnotationTag::Throws))
    }
}

impl ContractChecker for ErrorContractChecker {
    fn check(&self, unit: &FunctionUnit<'_>) -> Option<Issue> {
        let error_types: Vec<String> =
            unit.signals_of(SignalKind::Throws).map(|s| s.detail.clone()).collect();
        if error_types.is_empty() || unit.has_tag(AnnotationTag::Throws) {
            return None;
        }

        let name = &unit.record.name;
        let message = format!(
            "`{name}` throws {} but has no {} annotation",
            error_types.join(", "),
            self.tag
        );
        let lines: Vec<String> = error_types
            .iter()
            .map(|kind| format!("{} {{{kind}}} Describe when this is thrown.", self.tag))
            .collect();

        Some(
            Issue::new(
                &unit.record.file,
                unit.record.start_line,
                name,
                IssueKind::MissingThrows,
                self.severity,
            )
            .with_message(message)
            .with_suggestion(suggestion_block(name, &lines))
            .with_error_types(error_types),
        )
    }

    fn name(&self) -> &'static str {
        "error-contracts"
    }
}
