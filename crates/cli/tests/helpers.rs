use std::fs;

use contract_lint::{canonicalize_or_current, fingerprint_inputs, now_rfc3339};
use tempfile::tempdir;

#[test]
fn canonicalize_or_current_returns_cwd_for_dot() {
    let original = std::env::current_dir().expect("cwd");
    let tmp = tempdir().expect("tempdir");
    std::env::set_current_dir(tmp.path()).expect("chdir tmp");

    let result = canonicalize_or_current(".").expect("canonicalize").canonicalize().expect("canon");
    let expected = tmp.path().canonicalize().expect("canon tmp");

    std::env::set_current_dir(original).expect("restore cwd");
    assert_eq!(result, expected);
}

#[test]
fn canonicalize_or_current_resolves_existing_path() {
    let tmp = tempdir().expect("tempdir");
    let subdir = tmp.path().join("nested");
    fs::create_dir_all(&subdir).expect("create nested");

    let result = canonicalize_or_current(subdir.to_str().expect("utf8 path"))
        .expect("canonicalize nested");
    assert_eq!(result, subdir.canonicalize().expect("canonicalize subdir"));
}

#[test]
fn fingerprint_changes_with_content_and_order() {
    let tmp = tempdir().expect("tempdir");
    fs::write(tmp.path().join("a.js"), "one").expect("write a");
    fs::write(tmp.path().join("b.js"), "two").expect("write b");
    let files = vec!["a.js".to_string(), "b.js".to_string()];

    let first = fingerprint_inputs(tmp.path(), &files);
    assert_eq!(first.len(), 64);
    assert_eq!(first, fingerprint_inputs(tmp.path(), &files));

    let reversed = vec!["b.js".to_string(), "a.js".to_string()];
    assert_ne!(first, fingerprint_inputs(tmp.path(), &reversed));

    fs::write(tmp.path().join("a.js"), "changed").expect("rewrite a");
    assert_ne!(first, fingerprint_inputs(tmp.path(), &files));
}

#[test]
fn fingerprint_tolerates_missing_files() {
    let tmp = tempdir().expect("tempdir");
    let files = vec!["gone.js".to_string()];
    assert_eq!(fingerprint_inputs(tmp.path(), &files).len(), 64);
}

#[test]
fn timestamps_are_rfc3339() {
    let now = now_rfc3339();
    assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok(), "bad timestamp {now}");
}

#[test]
fn fingerprint_of_no_inputs_is_the_empty_digest() {
    let tmp = tempdir().expect("tempdir");
    assert_eq!(
        fingerprint_inputs(tmp.path(), &[]),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}
