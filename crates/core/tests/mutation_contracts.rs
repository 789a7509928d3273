use contract_core::checks::{CheckRunner, CheckerSelection, ContractChecker, MutationChecker};
use contract_core::model::{IssueKind, Severity, SignalKind};
use contract_core::project::{ProjectConfig, SetterRegistry};

fn config() -> ProjectConfig {
    ProjectConfig::default().with_state_setters(
        SetterRegistry::new()
            .with_field("user", ["setUser"])
            .with_field("cart", ["setCart"])
            .with_field("theme", ["setTheme"]),
    )
}

fn check_with(config: &ProjectConfig, src: &str) -> Vec<contract_core::model::Issue> {
    CheckRunner::for_selection(config, &[CheckerSelection::Mutations])
        .expect("runner")
        .check_source("src/session.js", src)
}

#[test]
fn three_setters_are_listed_with_their_fields() {
    let src = r#"function resetSession() {
  setUser(null);
  setCart([]);
  setTheme("light");
}
"#;
    let issues = check_with(&config(), src);
    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.kind, IssueKind::MissingMutatesState);
    assert_eq!(issue.mutations.len(), 3);

    let breakdown: Vec<(&str, Option<&str>)> =
        issue.mutations.iter().map(|m| (m.call.as_str(), m.field.as_deref())).collect();
    assert_eq!(
        breakdown,
        vec![("setUser", Some("user")), ("setCart", Some("cart")), ("setTheme", Some("theme"))]
    );
    assert!(issue.mutations.iter().all(|m| m.kind == SignalKind::StateMutation));
    assert!(issue.message.contains("setUser → user"));
    assert!(issue.suggestion.contains("@mutates state.user, state.cart, state.theme"));
}

#[test]
fn a_single_mutation_is_below_the_threshold() {
    let src = "function rename(name) {\n  setUser({ name });\n}\n";
    assert!(check_with(&config(), src).is_empty());
}

#[test]
fn repeated_calls_to_one_setter_count_once() {
    let src = "function twice() {\n  setUser(1);\n  setUser(2);\n}\n";
    assert!(check_with(&config(), src).is_empty());
}

#[test]
fn mixed_kinds_reach_the_threshold_together() {
    let src = r#"function checkout(cart) {
  setCart(cart);
  badge.textContent = cart.items.length;
  localStorage.setItem("cart", JSON.stringify(cart));
}
"#;
    let issues = check_with(&config(), src);
    assert_eq!(issues.len(), 1);
    let kinds: Vec<SignalKind> = issues[0].mutations.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![SignalKind::StateMutation, SignalKind::InterfaceMutation, SignalKind::PersistenceWrite]
    );
    assert!(issues[0].suggestion.contains("@mutates state.cart, dom, storage"));
}

#[test]
fn documented_mutations_are_clean() {
    let src = r#"// @mutates state.user, state.cart
function resetSession() {
  setUser(null);
  setCart([]);
}
"#;
    assert!(check_with(&config(), src).is_empty());
}

#[test]
fn registered_setters_are_exempt_by_name() {
    let src = r#"function setUser(next) {
  state.user = next;
  el.innerHTML = next.name;
  localStorage.setItem("user", next.id);
}
"#;
    assert!(check_with(&config(), src).is_empty());
}

#[test]
fn threshold_is_configurable() {
    let mut strict = config();
    strict.scan.mutation_threshold = 1;
    strict.mutation_severity = Severity::Error;
    let src = "function rename(name) {\n  setUser({ name });\n}\n";
    let issues = check_with(&strict, src);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].severity, Severity::Error);
}

#[test]
fn checker_reports_its_name() {
    let checker = MutationChecker::from_config(&config());
    assert_eq!(checker.name(), "mutations");
}

#[test]
fn mutations_are_checked_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("session.js"),
        "function resetSession() {\n  setUser(null);\n  setCart([]);\n}\n",
    )
    .expect("write source");

    let layout = contract_core::project::ProjectLayout::new(dir.path());
    let report =
        contract_core::checks::check_mutations(&layout, &["session.js".to_string()], &config())
            .expect("check runs");
    assert_eq!(report.stats.total, 1);
    assert_eq!(report.issues[0].kind, IssueKind::MissingMutatesState);
}
