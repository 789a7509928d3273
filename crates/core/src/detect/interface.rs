use std::sync::OnceLock;

use crate::detect::{compile_catalogue, match_catalogue, CallShape, SignalDetector};
use crate::model::{BodyExtent, Signal, SignalKind};

/// Interface-mutating call shapes: content replacement, attribute assignment,
/// node insertion, removal, and creation.
const INTERFACE_CATALOGUE: &[(&str, &str)] = &[
    ("innerHTML", r"\.innerHTML\s*[+]?=[^=]"),
    ("outerHTML", r"\.outerHTML\s*=[^=]"),
    ("textContent", r"\.textContent\s*=[^=]"),
    ("innerText", r"\.innerText\s*=[^=]"),
    ("insertAdjacentHTML", r"\.insertAdjacentHTML\s*\("),
    ("setAttribute", r"\.setAttribute\s*\("),
    ("removeAttribute", r"\.removeAttribute\s*\("),
    ("classList", r"\.classList\.(?:add|remove|toggle|replace)\s*\("),
    ("style", r"\.style\.[A-Za-z]+\s*=[^=]"),
    ("appendChild", r"\.appendChild\s*\("),
    ("insertBefore", r"\.insertBefore\s*\("),
    ("replaceChild", r"\.replaceChild\s*\("),
    ("replaceChildren", r"\.replaceChildren\s*\("),
    ("append", r"\.(?:append|prepend)\s*\("),
    ("removeChild", r"\.removeChild\s*\("),
    ("remove", r"\.remove\s*\(\s*\)"),
    ("createElement", r"\bdocument\.create(?:Element|TextNode|DocumentFragment)\s*\("),
];

fn catalogue() -> &'static [CallShape] {
    static SHAPES: OnceLock<Vec<CallShape>> = OnceLock::new();
    SHAPES.get_or_init(|| compile_catalogue(INTERFACE_CATALOGUE))
}

/// Detects interface (DOM) mutations against a fixed catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceMutationDetector;

impl SignalDetector for InterfaceMutationDetector {
    fn detect(&self, body: &BodyExtent) -> Vec<Signal> {
        match_catalogue(catalogue(), body, SignalKind::InterfaceMutation)
    }

    fn name(&self) -> &'static str {
        "interface-mutations"
    }
}
