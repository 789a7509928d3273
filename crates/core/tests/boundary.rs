use contract_core::project::BoundaryMode;
use contract_core::scan::boundary::has_expression_body;
use contract_core::scan::{trace_body, SourceFile};

#[test]
fn nested_blocks_balance_to_the_closing_line() {
    let src = r#"function outer() {
  if (a) {
    b();
  }
}
function next() {}
"#;
    let file = SourceFile::parse("outer.js", src);
    let body = trace_body(&file, 1, 200, BoundaryMode::Lexical);
    assert_eq!((body.start_line, body.end_line), (1, 5));
    assert!(!body.truncated);
    assert_eq!(body.line_count(), 5);
    assert!(body.text.ends_with('}'));
    assert!(!body.text.contains("next"));
}

#[test]
fn braces_in_string_literals_only_fool_line_count_mode() {
    let src = r#"function tricky() {
  const s = "}}}";
  return s;
}
"#;
    let file = SourceFile::parse("tricky.js", src);

    let lexical = trace_body(&file, 1, 200, BoundaryMode::Lexical);
    assert_eq!(lexical.end_line, 4);

    let raw = trace_body(&file, 1, 200, BoundaryMode::LineCount);
    assert_eq!(raw.end_line, 2, "raw counting closes the body early");
    assert!(!raw.truncated);
}

#[test]
fn unbalanced_body_returns_partial_range_at_lookahead() {
    let src = "function broken() {\n  a();\n  b();\n  c();\n";
    let file = SourceFile::parse("broken.js", src);
    let body = trace_body(&file, 1, 3, BoundaryMode::Lexical);
    assert!(body.truncated);
    assert_eq!((body.start_line, body.end_line), (1, 3));
    assert!(!body.text.contains("c();"));
}

#[test]
fn lookahead_is_clamped_to_end_of_file() {
    let src = "function open() {\n  work();\n";
    let file = SourceFile::parse("open.js", src);
    let body = trace_body(&file, 1, 500, BoundaryMode::Lexical);
    assert!(body.truncated);
    assert_eq!(body.end_line, 2);
}

#[test]
fn start_past_end_of_file_is_an_empty_truncated_extent() {
    let file = SourceFile::parse("tiny.js", "let a = 1;\n");
    let body = trace_body(&file, 9, 10, BoundaryMode::Lexical);
    assert!(body.truncated);
    assert!(body.text.is_empty());
}

#[test]
fn concise_arrow_bodies_end_with_their_expression() {
    let src = r#"const double = (x) => x * 2;
const sum = (a, b) =>
  a + b;
function after() {}
"#;
    let file = SourceFile::parse("arrows.js", src);

    assert!(has_expression_body(&file, 1));
    let one_line = trace_body(&file, 1, 200, BoundaryMode::Lexical);
    assert_eq!((one_line.start_line, one_line.end_line), (1, 1));

    assert!(has_expression_body(&file, 2));
    let wrapped = trace_body(&file, 2, 200, BoundaryMode::Lexical);
    assert_eq!((wrapped.start_line, wrapped.end_line), (2, 3));
    assert!(!wrapped.truncated);

    assert!(!has_expression_body(&file, 4));
}

#[test]
fn block_arrow_is_not_an_expression_body() {
    let src = "const run = async () => {\n  await go();\n};\n";
    let file = SourceFile::parse("run.js", src);
    assert!(!has_expression_body(&file, 1));
    let body = trace_body(&file, 1, 200, BoundaryMode::Lexical);
    assert_eq!(body.end_line, 3);
}
