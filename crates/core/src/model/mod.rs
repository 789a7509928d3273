//! Core data model shared by every analysis stage.
//!
//! Records flow one way: the scanner produces `FunctionRecord`s, the boundary
//! tracer derives a `BodyExtent` from each, the associator finds an optional
//! `AnnotationBlock`, detectors emit `Signal`s, and checkers/validators turn all
//! of that into `Issue`s. Nothing here is mutated after construction.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A function-like definition found by the lexical scanner.
///
/// Identity is `(file, start_line)`. `start_line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionRecord {
    pub name: String,
    pub file: String,
    pub start_line: usize,
    /// Declared with `async`; such functions always owe a return contract.
    #[serde(default)]
    pub is_async: bool,
}

impl FunctionRecord {
    pub fn new(name: impl Into<String>, file: impl Into<String>, start_line: usize) -> Self {
        Self { name: name.into(), file: file.into(), start_line, is_async: false }
    }

    /// Builder-style helper used by the scanner once the `async` marker is known.
    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }
}

/// Textual extent of a function body.
///
/// `text` is the raw source; `code` is the same lines with comments and literal
/// contents blanked, which is what detectors read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyExtent {
    pub start_line: usize,
    pub end_line: usize,
    pub text: String,
    pub code: String,
    /// The lookahead window ran out before the delimiters balanced.
    pub truncated: bool,
}

impl BodyExtent {
    /// Number of lines covered by this extent (inclusive).
    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Map a byte offset inside `code` back to a 1-based source line.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        let upto = &self.code[..offset.min(self.code.len())];
        self.start_line + upto.matches('\n').count()
    }
}

/// Recognized documentation tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnnotationTag {
    Throws,
    Returns,
    Mutates,
}

impl AnnotationTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationTag::Throws => "throws",
            AnnotationTag::Returns => "returns",
            AnnotationTag::Mutates => "mutates",
        }
    }
}

/// The nearest contiguous comment block above a definition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationBlock {
    pub tags: BTreeSet<AnnotationTag>,
    pub raw_lines: Vec<String>,
    /// 1-based line of the first comment line in the block.
    pub start_line: usize,
}

impl AnnotationBlock {
    pub fn has(&self, tag: AnnotationTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Behavioral fact categories a detector can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    Throws,
    Returns,
    StateMutation,
    InterfaceMutation,
    PersistenceWrite,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Throws => "throws",
            SignalKind::Returns => "returns",
            SignalKind::StateMutation => "state-mutation",
            SignalKind::InterfaceMutation => "interface-mutation",
            SignalKind::PersistenceWrite => "persistence-write",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            SignalKind::StateMutation | SignalKind::InterfaceMutation | SignalKind::PersistenceWrite
        )
    }
}

/// A detected behavioral fact about a function body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    /// Error kind, setter name, call shape, or returned expression.
    pub detail: String,
    pub line: usize,
    /// Logical state field for state mutations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl Signal {
    pub fn new(kind: SignalKind, detail: impl Into<String>, line: usize) -> Self {
        Self { kind, detail: detail.into(), line, field: None }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Issue severity. Chosen by configuration, never by a detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every kind of issue the checkers and validators can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    MissingThrows,
    MissingReturns,
    MissingMutatesState,
    MissingTodoEntry,
    MissingCodeAnnotation,
    TodoFileMismatch,
    DuplicateTodoAnchor,
    UnregisteredGenerator,
    MissingGeneratorFile,
    GeneratorOutputUnverified,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::MissingThrows => "missing-throws",
            IssueKind::MissingReturns => "missing-returns",
            IssueKind::MissingMutatesState => "missing-mutates-state",
            IssueKind::MissingTodoEntry => "missing-todo-entry",
            IssueKind::MissingCodeAnnotation => "missing-code-annotation",
            IssueKind::TodoFileMismatch => "todo-file-mismatch",
            IssueKind::DuplicateTodoAnchor => "duplicate-todo-anchor",
            IssueKind::UnregisteredGenerator => "unregistered-generator",
            IssueKind::MissingGeneratorFile => "missing-generator-file",
            IssueKind::GeneratorOutputUnverified => "generator-output-unverified",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a mutation breakdown attached to a `missing-mutates-state` issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationDetail {
    pub kind: SignalKind,
    pub call: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// The unit of output shared by checkers and validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub file: String,
    pub line: usize,
    /// Function name, or the generator/anchor subject for drift issues.
    pub function: String,
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mutations: Vec<MutationDetail>,
}

impl Issue {
    pub fn new(
        file: impl Into<String>,
        line: usize,
        function: impl Into<String>,
        kind: IssueKind,
        severity: Severity,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            function: function.into(),
            kind,
            severity,
            message: String::new(),
            suggestion: String::new(),
            error_types: Vec::new(),
            mutations: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    pub fn with_error_types(mut self, error_types: Vec<String>) -> Self {
        self.error_types = error_types;
        self
    }

    pub fn with_mutations(mut self, mutations: Vec<MutationDetail>) -> Self {
        self.mutations = mutations;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Aggregate counts over an issue list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStats {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl IssueStats {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let errors = issues.iter().filter(|i| i.is_error()).count();
        Self { total: issues.len(), errors, warnings: issues.len() - errors }
    }
}

/// `{issues, stats}` as produced by every checker and validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub issues: Vec<Issue>,
    pub stats: IssueStats,
}

impl CheckReport {
    pub fn new(issues: Vec<Issue>) -> Self {
        let stats = IssueStats::from_issues(&issues);
        Self { issues, stats }
    }

    pub fn has_errors(&self) -> bool {
        self.stats.errors > 0
    }

    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

/// A deferred-work annotation (`@todo: <doc>#<anchor>`) found in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoAnnotation {
    pub file: String,
    pub line: usize,
    pub document: String,
    pub anchor: String,
    /// Definition the annotation documents, when one is nearby.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

/// A headed backlog entry (`#### Title {#anchor}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoEntry {
    pub anchor: String,
    pub title: String,
    /// 1-based line of the heading inside the backlog document.
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_line: Option<usize>,
}

/// Join of on-disk generator scripts and build-config registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorBinding {
    pub script_name: String,
    pub registered_in_config: bool,
    pub exists_on_disk: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
}
