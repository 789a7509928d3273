use crate::checks::{suggestion_block, ContractChecker, FunctionUnit};
use crate::model::{AnnotationTag, Issue, IssueKind, MutationDetail, Severity, SignalKind};
use crate::project::{ProjectConfig, SetterRegistry};

/// Flags functions with several distinct mutations and no `@mutates` tag.
///
/// State, interface, and persistence signals are pooled and counted as distinct
/// `(kind, call)` pairs, so `setUser(1); setUser(2)` is one mutation and stays
/// below the default threshold of two. Functions registered as setters are
/// exempt: they are the mutation, not a caller of it.
#[derive(Debug, Clone)]
pub struct MutationChecker {
    severity: Severity,
    threshold: usize,
    registry: SetterRegistry,
    tag: String,
}

impl MutationChecker {
    pub fn new(
        severity: Severity,
        threshold: usize,
        registry: SetterRegistry,
        tag: impl Into<String>,
    ) -> Self {
        Self { severity, threshold: threshold.max(1), registry, tag: tag.into() }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(
            config.mutation_severity,
            config.scan.mutation_threshold,
            config.state_setters.clone(),
            config.tags.preferred(AnnotationTag::Mutates),
        )
    }
}

/// Human label for a mutation target, e.g. `state.user`, `dom`, `storage`.
fn target_label(detail: &MutationDetail) -> String {
    match detail.kind {
        SignalKind::StateMutation => {
            format!("state.{}", detail.field.as_deref().unwrap_or(detail.call.as_str()))
        }
        SignalKind::PersistenceWrite => "storage".to_string(),
        _ => "dom".to_string(),
    }
}

impl ContractChecker for MutationChecker {
    fn check(&self, unit: &FunctionUnit<'_>) -> Option<Issue> {
        let name = &unit.record.name;
        if self.registry.is_setter(name) {
            return None;
        }

        let mut mutations: Vec<MutationDetail> = Vec::new();
        for signal in unit.signals.iter().filter(|s| s.kind.is_mutation()) {
            let seen = mutations.iter().any(|m| m.kind == signal.kind && m.call == signal.detail);
            if !seen {
                mutations.push(MutationDetail {
                    kind: signal.kind,
                    call: signal.detail.clone(),
                    field: signal.field.clone(),
                });
            }
        }
        if mutations.len() < self.threshold || unit.has_tag(AnnotationTag::Mutates) {
            return None;
        }

        let calls: Vec<String> = mutations
            .iter()
            .map(|m| match &m.field {
                Some(field) => format!("{} → {field}", m.call),
                None => format!("{} ({})", m.call, m.kind.as_str()),
            })
            .collect();
        let message = format!(
            "`{name}` performs {} mutations [{}] but has no {} annotation",
            mutations.len(),
            calls.join(", "),
            self.tag
        );

        let mut targets: Vec<String> = Vec::new();
        for label in mutations.iter().map(target_label) {
            if !targets.contains(&label) {
                targets.push(label);
            }
        }
        let line = format!("{} {}", self.tag, targets.join(", "));

        Some(
            Issue::new(
                &unit.record.file,
                unit.record.start_line,
                name,
                IssueKind::MissingMutatesState,
                self.severity,
            )
            .with_message(message)
            .with_suggestion(suggestion_block(name, &[line]))
            .with_mutations(mutations),
        )
    }

    fn name(&self) -> &'static str {
        "mutations"
    }
}
