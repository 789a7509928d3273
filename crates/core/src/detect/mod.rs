//! Behavioral signal detectors.
//!
//! Each detector is a stateless strategy over a body's masked code view. They
//! are registered in a `DetectorSet` and run uniformly, so new signal kinds can
//! be added without touching the checkers.

pub mod interface;
pub mod persistence;
pub mod returns;
pub mod state;
pub mod throws;

use regex::Regex;

use crate::model::{BodyExtent, Signal};
use crate::project::SetterRegistry;

pub use interface::InterfaceMutationDetector;
pub use persistence::PersistenceWriteDetector;
pub use returns::ReturnDetector;
pub use state::StateSetterDetector;
pub use throws::ThrowDetector;

/// Trait implemented by every signal detector.
pub trait SignalDetector: Send + Sync {
    fn detect(&self, body: &BodyExtent) -> Vec<Signal>;
    fn name(&self) -> &'static str;
}

/// Ordered collection of detectors; callers run them all over a body.
#[derive(Default)]
pub struct DetectorSet {
    detectors: Vec<Box<dyn SignalDetector>>,
}

impl DetectorSet {
    pub fn new() -> Self {
        Self { detectors: Vec::new() }
    }

    pub fn register<D: SignalDetector + 'static>(&mut self, detector: D) -> &mut Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Registered detector names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run every detector over `body`, concatenating their signals.
    pub fn detect_all(&self, body: &BodyExtent) -> Vec<Signal> {
        self.detectors.iter().flat_map(|d| d.detect(body)).collect()
    }
}

/// Builder for the standard five detectors, sharing one setter registry.
pub fn standard_detectors(registry: &SetterRegistry) -> Result<DetectorSet, regex::Error> {
    let mut set = DetectorSet::new();
    set.register(ThrowDetector)
        .register(ReturnDetector)
        .register(StateSetterDetector::new(registry)?)
        .register(InterfaceMutationDetector)
        .register(PersistenceWriteDetector);
    Ok(set)
}

/// A labelled call-shape pattern in a fixed catalogue.
pub(crate) struct CallShape {
    pub label: &'static str,
    pub regex: Regex,
}

/// Compile a static catalogue of `(label, pattern)` pairs.
pub(crate) fn compile_catalogue(entries: &[(&'static str, &str)]) -> Vec<CallShape> {
    entries
        .iter()
        .map(|&(label, pattern)| CallShape {
            label,
            regex: Regex::new(pattern).expect("catalogue pattern is valid"),
        })
        .collect()
}

/// Match every catalogue entry against `body`, one signal per call site,
/// ordered by position in the body.
pub(crate) fn match_catalogue(
    catalogue: &[CallShape],
    body: &BodyExtent,
    kind: crate::model::SignalKind,
) -> Vec<Signal> {
    let mut hits: Vec<(usize, &'static str)> = catalogue
        .iter()
        .flat_map(|shape| shape.regex.find_iter(&body.code).map(move |m| (m.start(), shape.label)))
        .collect();
    hits.sort_by_key(|(offset, _)| *offset);
    hits.into_iter()
        .map(|(offset, label)| Signal::new(kind, label, body.line_of_offset(offset)))
        .collect()
}
