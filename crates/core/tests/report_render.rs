use contract_core::model::{CheckReport, Issue, IssueKind, Severity};
use contract_core::report::{group_by_file, render_text, RenderOptions, DEFAULT_HINT};

fn issue(file: &str, line: usize, severity: Severity) -> Issue {
    Issue::new(file, line, "fn", IssueKind::MissingThrows, severity)
        .with_message("Function throws Error but has no @throws tag")
        .with_suggestion("/**\n * @throws {Error}\n */")
}

#[test]
fn empty_report_still_prints_header_and_hint() {
    let text = render_text(&CheckReport::default(), "Contract check", &RenderOptions::default());
    assert!(text.starts_with("Contract check: 0 issue(s) (0 error(s), 0 warning(s))"));
    assert!(text.contains("No issues found."));
    assert!(text.trim_end().ends_with(DEFAULT_HINT));
}

#[test]
fn issues_are_grouped_by_file_in_first_seen_order() {
    let issues = vec![
        issue("b.js", 3, Severity::Warning),
        issue("a.js", 1, Severity::Error),
        issue("b.js", 9, Severity::Warning),
    ];
    let groups = group_by_file(&issues);
    let files: Vec<&str> = groups.iter().map(|(f, _)| *f).collect();
    assert_eq!(files, vec!["b.js", "a.js"]);
    assert_eq!(groups[0].1.len(), 2);

    let text = render_text(&CheckReport::new(issues), "Contract check", &RenderOptions::default());
    assert!(text.contains("3 issue(s) (1 error(s), 2 warning(s))"));
    assert!(text.contains("  b.js:3 [warning] missing-throws: Function throws Error"));
    assert!(text.contains("      * @throws {Error}"));
    assert!(text.find("b.js:9").expect("b.js:9") < text.find("a.js:1").expect("a.js:1"));
}

#[test]
fn long_files_are_truncated() {
    let issues: Vec<Issue> = (1..=8).map(|line| issue("big.js", line, Severity::Warning)).collect();
    let text = render_text(&CheckReport::new(issues), "Contract check", &RenderOptions::default());
    assert!(text.contains("big.js:5 "));
    assert!(!text.contains("big.js:6 "));
    assert!(text.contains("…and 3 more in this file"));
}

#[test]
fn extra_files_are_summarized() {
    let issues: Vec<Issue> = (0..12)
        .flat_map(|n| {
            let file = format!("src/file{n:02}.js");
            vec![issue(&file, 1, Severity::Warning), issue(&file, 2, Severity::Warning)]
        })
        .collect();
    let text = render_text(&CheckReport::new(issues), "Contract check", &RenderOptions::default());
    assert!(text.contains("src/file09.js"));
    assert!(!text.contains("src/file10.js"));
    assert!(text.contains("…and 2 more file(s) with 4 issue(s)"));
}

#[test]
fn custom_hint_and_limits_are_respected() {
    let options = RenderOptions {
        max_issues_per_file: 1,
        max_files: 1,
        hint: "Hint: run contract-lint todos".to_string(),
    };
    let issues = vec![issue("a.js", 1, Severity::Error), issue("a.js", 2, Severity::Error)];
    let text = render_text(&CheckReport::new(issues), "Todo check", &options);
    assert!(text.starts_with("Todo check: 2 issue(s)"));
    assert!(text.contains("…and 1 more in this file"));
    assert!(text.trim_end().ends_with("Hint: run contract-lint todos"));
}
