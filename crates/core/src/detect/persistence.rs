use std::sync::OnceLock;

use crate::detect::{compile_catalogue, match_catalogue, CallShape, SignalDetector};
use crate::model::{BodyExtent, Signal, SignalKind};

/// Durable-store write shapes: document create/update/delete and key-value set.
const PERSISTENCE_CATALOGUE: &[(&str, &str)] = &[
    ("addDoc", r"\baddDoc\s*\("),
    ("setDoc", r"\bsetDoc\s*\("),
    ("updateDoc", r"\bupdateDoc\s*\("),
    ("deleteDoc", r"\bdeleteDoc\s*\("),
    ("batch.commit", r"\.commit\s*\(\s*\)"),
    ("localStorage.setItem", r"\blocalStorage\.setItem\s*\("),
    ("localStorage.removeItem", r"\blocalStorage\.(?:removeItem|clear)\s*\("),
    ("sessionStorage.setItem", r"\bsessionStorage\.setItem\s*\("),
    ("sessionStorage.removeItem", r"\bsessionStorage\.(?:removeItem|clear)\s*\("),
];

fn catalogue() -> &'static [CallShape] {
    static SHAPES: OnceLock<Vec<CallShape>> = OnceLock::new();
    SHAPES.get_or_init(|| compile_catalogue(PERSISTENCE_CATALOGUE))
}

/// Detects persistent-storage writes against a fixed catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersistenceWriteDetector;

impl SignalDetector for PersistenceWriteDetector {
    fn detect(&self, body: &BodyExtent) -> Vec<Signal> {
        match_catalogue(catalogue(), body, SignalKind::PersistenceWrite)
    }

    fn name(&self) -> &'static str {
        "persistence-writes"
    }
}
