use std::fs;
use std::path::Path;

use contract_core::model::{IssueKind, Severity};
use contract_core::project::{ProjectLayout, WiringConfig};
use contract_core::wiring::{
    find_output_evidence, generator_pattern, registered_generators, validate_wiring,
};
use tempfile::tempdir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write file");
}

fn package_json(script: &str) -> String {
    format!(
        "{{\n  \"name\": \"demo\",\n  \"scripts\": {{\n    \"build\": \"vite build\",\n    \"generate:docs\": \"{script}\"\n  }}\n}}\n"
    )
}

const WRITES_REFERENCE: &str =
    "import fs from 'fs';\nfs.writeFileSync('docs/reference/api.md', render());\n";

#[test]
fn script_references_are_matched_by_basename() {
    let pattern = generator_pattern(&WiringConfig::default()).expect("pattern");
    let names = registered_generators(
        "node scripts/generate-api.js && node ./scripts/generate-routes.mjs; tsx generate-types.ts | cat",
        &pattern,
    );
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    assert_eq!(names, vec!["generate-api.js", "generate-routes.mjs", "generate-types.ts"]);
}

#[test]
fn unrelated_tokens_are_not_generators() {
    let pattern = generator_pattern(&WiringConfig::default()).expect("pattern");
    let names = registered_generators("node scripts/build.js && regenerate-all.sh", &pattern);
    assert!(names.is_empty());
}

#[test]
fn output_evidence_prefers_string_literals() {
    let conventions = WiringConfig::default().output_conventions;
    assert_eq!(
        find_output_evidence(WRITES_REFERENCE, &conventions).as_deref(),
        Some("docs/reference/api.md")
    );
    assert_eq!(
        find_output_evidence("// writes into docs/generated/ later\n", &conventions).as_deref(),
        Some("docs/generated/")
    );
    assert_eq!(find_output_evidence("console.log('hi');\n", &conventions), None);
}

#[test]
fn consistent_wiring_has_no_issues() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "package.json", &package_json("node scripts/generate-api.js"));
    write(root, "scripts/generate-api.js", WRITES_REFERENCE);
    write(root, "scripts/helpers.js", "export const x = 1;\n");

    let layout = ProjectLayout::new(root);
    let report = validate_wiring(&layout, &WiringConfig::default()).expect("wiring runs");

    assert!(report.is_consistent(), "unexpected issues: {:?}", report.report.issues);
    assert_eq!(report.bindings.len(), 1);
    let binding = &report.bindings[0];
    assert_eq!(binding.script_name, "generate-api.js");
    assert!(binding.registered_in_config && binding.exists_on_disk);
    assert_eq!(binding.output_path.as_deref(), Some("docs/reference/api.md"));
}

#[test]
fn both_set_differences_are_errors() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "package.json",
        &package_json("node scripts/generate-api.js && node scripts/generate-gone.js"),
    );
    write(root, "scripts/generate-api.js", WRITES_REFERENCE);
    write(root, "scripts/generate-extra.js", WRITES_REFERENCE);

    let layout = ProjectLayout::new(root);
    let wiring = validate_wiring(&layout, &WiringConfig::default()).expect("wiring runs");
    let report = &wiring.report;

    let missing: Vec<_> = report.of_kind(IssueKind::MissingGeneratorFile).collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].function, "generate-gone.js");
    assert_eq!(missing[0].file, "package.json");
    assert_eq!(missing[0].line, 5);

    let unregistered: Vec<_> = report.of_kind(IssueKind::UnregisteredGenerator).collect();
    assert_eq!(unregistered.len(), 1);
    assert_eq!(unregistered[0].file, "scripts/generate-extra.js");
    assert_eq!(unregistered[0].severity, Severity::Error);

    assert_eq!(report.stats.errors, 2);
    assert!(!wiring.is_consistent());

    let names: Vec<&str> = wiring.bindings.iter().map(|b| b.script_name.as_str()).collect();
    assert_eq!(names, vec!["generate-api.js", "generate-extra.js", "generate-gone.js"]);
}

#[test]
fn generator_without_output_evidence_is_a_warning() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "package.json", &package_json("node scripts/generate-api.js"));
    write(root, "scripts/generate-api.js", "console.log('nothing written');\n");

    let layout = ProjectLayout::new(root);
    let wiring = validate_wiring(&layout, &WiringConfig::default()).expect("wiring runs");

    assert_eq!(wiring.report.stats.total, 1);
    assert_eq!(wiring.report.stats.warnings, 1);
    assert_eq!(wiring.report.issues[0].kind, IssueKind::GeneratorOutputUnverified);
    assert!(!wiring.report.has_errors());
    assert!(!wiring.is_consistent());
}

#[test]
fn invalid_build_config_reads_as_no_registrations() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "package.json", "{ not json");
    write(root, "scripts/generate-api.js", WRITES_REFERENCE);

    let layout = ProjectLayout::new(root);
    let wiring = validate_wiring(&layout, &WiringConfig::default()).expect("wiring runs");
    assert_eq!(wiring.report.of_kind(IssueKind::UnregisteredGenerator).count(), 1);
}

#[test]
fn report_serializes_bindings_next_to_issues() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "package.json", &package_json("node scripts/generate-api.js"));
    write(root, "scripts/generate-api.js", WRITES_REFERENCE);

    let layout = ProjectLayout::new(root);
    let wiring = validate_wiring(&layout, &WiringConfig::default()).expect("wiring runs");
    let value = serde_json::to_value(&wiring).expect("serialize");

    assert_eq!(value["bindings"][0]["scriptName"], "generate-api.js");
    assert_eq!(value["bindings"][0]["registeredInConfig"], true);
    assert_eq!(value["stats"]["total"], 0);
    assert!(value["issues"].as_array().expect("issues array").is_empty());
}
