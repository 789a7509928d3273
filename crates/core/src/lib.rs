//! contract-core
//!
//! Core library for checking that JavaScript/TypeScript functions carry doc
//! annotations (`@throws`, `@returns`, `@mutates`) that match their behavior.
//! It also keeps two artifact pairs in sync: `@todo` anchors against the
//! backlog document, and generator scripts against their build-config
//! registration.
//!
//! All substantive logic lives here so it is fully testable and reusable from
//! multiple frontends; the `contract-lint` CLI is a thin wrapper.

pub mod model;
pub mod project;
pub mod scan;
pub mod detect;
pub mod checks;
pub mod todos;
pub mod wiring;
pub mod report;
pub mod db;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
