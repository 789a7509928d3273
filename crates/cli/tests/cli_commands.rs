use std::fs;
use std::path::Path;

use contract_core::db::{HistoryDb, RunCommand, RunOutcome};
use contract_core::project::ProjectLayout;
use predicates::prelude::*;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, contents).expect("write file");
}

fn lint() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("contract-lint")
}

const THROWING_SOURCE: &str = r#"export function parse(raw) {
  if (!raw) throw new ParseError("empty");
  return raw.trim();
}
"#;

const DOCUMENTED_SOURCE: &str = r#"/**
 * @throws {ParseError} when empty
 * @returns {string} trimmed input
 */
export function parse(raw) {
  if (!raw) throw new ParseError("empty");
  return raw.trim();
}
"#;

fn init(root: &Path) {
    lint().arg("init").arg("--root").arg(root).assert().success();
}

#[test]
fn init_creates_config_and_history() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();

    lint()
        .arg("init")
        .arg("--root")
        .arg(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized contract checking"));

    let layout = ProjectLayout::new(root);
    assert!(layout.config_path.is_file(), "config should exist");
    assert!(layout.history_db_path.is_file(), "history db should exist");
}

#[test]
fn init_twice_requires_force() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init(root);

    lint()
        .arg("init")
        .arg("--root")
        .arg(root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    lint().arg("init").arg("--root").arg(root).arg("--force").assert().success();
}

#[test]
fn init_uses_current_dir_when_root_is_omitted() {
    let dir = tempdir().expect("tempdir");
    lint().current_dir(dir.path()).arg("init").assert().success();
    assert!(ProjectLayout::new(dir.path()).config_path.is_file());
}

#[test]
fn info_reports_defaults_as_json() {
    let dir = tempdir().expect("tempdir");
    let output = lint()
        .arg("info")
        .arg("--root")
        .arg(dir.path())
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("info json");
    assert_eq!(value["initialized"], false);
    assert_eq!(value["recordedRuns"], 0);
    assert_eq!(value["config"]["scan"]["bodyLookahead"], 200);
}

#[test]
fn warnings_alone_do_not_fail_check() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "src/parse.js", THROWING_SOURCE);

    lint()
        .arg("check")
        .arg("--root")
        .arg(root)
        .assert()
        .success()
        .stdout(predicate::str::contains("missing-throws"))
        .stdout(predicate::str::contains("missing-returns"))
        .stdout(predicate::str::contains("Hint:"));
}

#[test]
fn error_severity_fails_check() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "src/parse.js", THROWING_SOURCE);
    write(root, "strict.json", r#"{ "errorContractSeverity": "error" }"#);

    lint()
        .arg("check")
        .arg("--root")
        .arg(root)
        .arg("--config")
        .arg("strict.json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[error] missing-throws"));
}

#[test]
fn check_json_lists_issues_and_stats() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "src/parse.js", THROWING_SOURCE);

    let output = lint()
        .arg("check")
        .arg("--root")
        .arg(root)
        .arg("--json")
        .arg("--only")
        .arg("errors")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("check json");
    assert_eq!(value["stats"]["total"], 1);
    let issue = &value["issues"][0];
    assert_eq!(issue["kind"], "missing-throws");
    assert_eq!(issue["file"], "src/parse.js");
    assert_eq!(issue["function"], "parse");
    assert_eq!(issue["errorTypes"][0], "ParseError");
}

#[test]
fn documented_source_is_clean() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "src/parse.js", DOCUMENTED_SOURCE);

    lint()
        .arg("check")
        .arg("--root")
        .arg(root)
        .arg("src/parse.js")
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found."));
}

#[test]
fn unknown_anchor_fails_todos() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "src/a.js", "// @todo: docs/TODO.md#nowhere\nfunction a() {}\n");
    write(root, "docs/TODO.md", "#### Something else {#elsewhere}\n");

    lint()
        .arg("todos")
        .arg("--root")
        .arg(root)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("missing-todo-entry"));
}

#[test]
fn backlog_flag_overrides_config() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "src/a.js", "// @todo: BACKLOG.md#retry\nfunction a() {}\n");
    write(root, "BACKLOG.md", "#### Retry {#retry}\n**Function:** `a`\n");

    lint()
        .arg("todos")
        .arg("--root")
        .arg(root)
        .arg("--backlog")
        .arg("BACKLOG.md")
        .assert()
        .success();
}

#[test]
fn wiring_reports_unregistered_generators() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "package.json",
        r#"{ "scripts": { "generate:docs": "node scripts/generate-api.js" } }"#,
    );
    write(root, "scripts/generate-api.js", "write('docs/generated/api.md');\n");
    write(root, "scripts/generate-routes.js", "write('docs/generated/routes.md');\n");

    lint()
        .arg("wiring")
        .arg("--root")
        .arg(root)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("generate-routes.js [registered: no, on disk: yes]"))
        .stdout(predicate::str::contains("unregistered-generator"));
}

#[test]
fn consistent_wiring_passes() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(
        root,
        "package.json",
        r#"{ "scripts": { "generate:docs": "node scripts/generate-api.js" } }"#,
    );
    write(root, "scripts/generate-api.js", "write('docs/generated/api.md');\n");

    lint().arg("wiring").arg("--root").arg(root).arg("--json").assert().success().stdout(
        predicate::str::contains("\"outputPath\": \"docs/generated/api.md\""),
    );
}

#[test]
fn runs_are_recorded_in_initialized_projects() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init(root);
    write(root, "src/parse.js", THROWING_SOURCE);

    lint().arg("check").arg("--root").arg(root).assert().success();
    lint().arg("check").arg("--root").arg(root).arg("--no-history").assert().success();
    lint().arg("todos").arg("--root").arg(root).assert().success();

    let db = HistoryDb::open(&ProjectLayout::new(root).history_db_path).expect("open history");
    let runs = db.list_check_runs(None).expect("list runs");
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].command, RunCommand::Check);
    assert_eq!(runs[0].files, 1);
    assert_eq!(runs[0].total, 2);
    assert_eq!(runs[0].outcome, RunOutcome::Passed);
    assert_eq!(runs[1].command, RunCommand::Todos);

    lint()
        .arg("history")
        .arg("--root")
        .arg(root)
        .arg("--command")
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded runs (1):"))
        .stdout(predicate::str::contains("check [passed] files=1 issues=2"));
}

#[test]
fn uninitialized_projects_keep_no_history() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    write(root, "src/parse.js", THROWING_SOURCE);

    lint().arg("check").arg("--root").arg(root).assert().success();
    assert!(!ProjectLayout::new(root).meta_dir.exists());

    lint().arg("history").arg("--root").arg(root).assert().failure();
}

#[test]
fn history_rejects_unknown_command_filter() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    init(root);

    lint()
        .arg("history")
        .arg("--root")
        .arg(root)
        .arg("--command")
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command"));
}
