//! Contract checkers.
//!
//! Every checker follows the same shape: for each function found in each
//! input file, look at the relevant signals; when the condition holds and the
//! matching documentation tag is absent, emit an `Issue`. The per-file
//! pipeline (scanner, boundary tracer, associator, detectors) is shared by all
//! checkers and lives in `CheckRunner`.

pub mod errors;
pub mod mutations;
pub mod returns;

use rayon::prelude::*;
use thiserror::Error;

use crate::detect::{standard_detectors, DetectorSet};
use crate::model::{
    AnnotationBlock, AnnotationTag, BodyExtent, CheckReport, FunctionRecord, Issue, Signal,
    SignalKind,
};
use crate::project::{ProjectConfig, ProjectLayout, ScanConfig, TagVocabulary};
use crate::scan::{associate_annotation, scan_functions, trace_body, SourceFile};

pub use errors::ErrorContractChecker;
pub use mutations::MutationChecker;
pub use returns::ReturnTypeChecker;

#[derive(Debug, Error)]
pub enum CheckError {
    /// The setter registry could not be compiled into a matcher.
    #[error("Invalid state setter registry: {0}")]
    InvalidRegistry(#[from] regex::Error),
}

/// Everything known about one function when checkers run.
#[derive(Debug, Clone, Copy)]
pub struct FunctionUnit<'a> {
    pub record: &'a FunctionRecord,
    pub body: &'a BodyExtent,
    pub annotation: Option<&'a AnnotationBlock>,
    pub signals: &'a [Signal],
}

impl<'a> FunctionUnit<'a> {
    pub fn signals_of(&self, kind: SignalKind) -> impl Iterator<Item = &'a Signal> {
        self.signals.iter().filter(move |s| s.kind == kind)
    }

    pub fn has_tag(&self, tag: AnnotationTag) -> bool {
        self.annotation.is_some_and(|a| a.has(tag))
    }
}

/// Trait implemented by every contract checker.
pub trait ContractChecker: Send + Sync {
    fn check(&self, unit: &FunctionUnit<'_>) -> Option<Issue>;
    fn name(&self) -> &'static str;
}

/// Which checkers a run should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckerSelection {
    ErrorContracts,
    ReturnTypes,
    Mutations,
}

impl CheckerSelection {
    pub const ALL: [CheckerSelection; 3] =
        [CheckerSelection::ErrorContracts, CheckerSelection::ReturnTypes, CheckerSelection::Mutations];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckerSelection::ErrorContracts => "errors",
            CheckerSelection::ReturnTypes => "returns",
            CheckerSelection::Mutations => "mutations",
        }
    }
}

/// Render a suggested documentation block for `function`.
pub(crate) fn suggestion_block(function: &str, tag_lines: &[String]) -> String {
    let mut out = format!("Add to the doc comment above `{function}`:\n/**");
    for line in tag_lines {
        out.push_str("\n * ");
        out.push_str(line);
    }
    out.push_str("\n */");
    out
}

/// Shared per-file pipeline driving a set of checkers.
pub struct CheckRunner {
    scan: ScanConfig,
    tags: TagVocabulary,
    detectors: DetectorSet,
    checkers: Vec<Box<dyn ContractChecker>>,
}

impl CheckRunner {
    /// A runner with the standard detectors and no checkers yet.
    pub fn new(config: &ProjectConfig) -> Result<Self, CheckError> {
        Ok(Self {
            scan: config.scan.clone(),
            tags: config.tags.clone(),
            detectors: standard_detectors(&config.state_setters)?,
            checkers: Vec::new(),
        })
    }

    pub fn register<C: ContractChecker + 'static>(&mut self, checker: C) -> &mut Self {
        self.checkers.push(Box::new(checker));
        self
    }

    /// A runner with the selected checkers, configured from `config`.
    pub fn for_selection(
        config: &ProjectConfig,
        selection: &[CheckerSelection],
    ) -> Result<Self, CheckError> {
        let mut runner = Self::new(config)?;
        for choice in CheckerSelection::ALL {
            if !selection.contains(&choice) {
                continue;
            }
            match choice {
                CheckerSelection::ErrorContracts => {
                    runner.register(ErrorContractChecker::from_config(config));
                }
                CheckerSelection::ReturnTypes => {
                    runner.register(ReturnTypeChecker::from_config(config));
                }
                CheckerSelection::Mutations => {
                    runner.register(MutationChecker::from_config(config));
                }
            }
        }
        Ok(runner)
    }

    pub fn checker_names(&self) -> Vec<&'static str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    /// Check one file's text. Issues come out in function discovery order.
    pub fn check_source(&self, path: &str, text: &str) -> Vec<Issue> {
        let file = SourceFile::parse(path, text);
        let mut issues = Vec::new();
        for record in scan_functions(&file) {
            let body =
                trace_body(&file, record.start_line, self.scan.body_lookahead, self.scan.boundary_mode);
            let annotation = associate_annotation(
                &file,
                record.start_line,
                self.scan.annotation_lookback,
                &self.tags,
            );
            let signals = self.detectors.detect_all(&body);
            let unit = FunctionUnit {
                record: &record,
                body: &body,
                annotation: annotation.as_ref(),
                signals: &signals,
            };
            issues.extend(self.checkers.iter().filter_map(|c| c.check(&unit)));
        }
        issues
    }

    /// Check a list of root-relative files. Unreadable files are skipped.
    ///
    /// Files are analyzed in parallel; the result is grouped by file in input
    /// order, so output does not depend on completion order.
    pub fn check_files(&self, layout: &ProjectLayout, files: &[String]) -> CheckReport {
        let per_file: Vec<Vec<Issue>> = files
            .par_iter()
            .map(|path| match std::fs::read_to_string(layout.resolve(path)) {
                Ok(text) => self.check_source(path, &text),
                Err(err) => {
                    tracing::debug!(file = %path, error = %err, "skipping unreadable file");
                    Vec::new()
                }
            })
            .collect();
        let report = CheckReport::new(per_file.into_iter().flatten().collect());
        tracing::info!(
            files = files.len(),
            total = report.stats.total,
            errors = report.stats.errors,
            checkers = ?self.checker_names(),
            "contract check finished"
        );
        report
    }
}

/// Run only the error-contract checker.
pub fn check_error_contracts(
    layout: &ProjectLayout,
    files: &[String],
    config: &ProjectConfig,
) -> Result<CheckReport, CheckError> {
    let runner = CheckRunner::for_selection(config, &[CheckerSelection::ErrorContracts])?;
    Ok(runner.check_files(layout, files))
}

/// Run only the return-type checker.
pub fn check_return_types(
    layout: &ProjectLayout,
    files: &[String],
    config: &ProjectConfig,
) -> Result<CheckReport, CheckError> {
    let runner = CheckRunner::for_selection(config, &[CheckerSelection::ReturnTypes])?;
    Ok(runner.check_files(layout, files))
}

/// Run only the mutation checker.
pub fn check_mutations(
    layout: &ProjectLayout,
    files: &[String],
    config: &ProjectConfig,
) -> Result<CheckReport, CheckError> {
    let runner = CheckRunner::for_selection(config, &[CheckerSelection::Mutations])?;
    Ok(runner.check_files(layout, files))
}
