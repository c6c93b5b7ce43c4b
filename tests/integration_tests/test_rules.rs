// integration tests for rule loading and evaluation

use acto::rules::{evaluate, load_rules, parse_size, FileContext, Operator, RuleSet};

use crate::common::{test_workspace, write_rules};

#[test]
fn test_size_literal_properties() {
    assert_eq!(parse_size("10MB").unwrap(), 10 * 1024 * 1024);
    assert_eq!(parse_size("512").unwrap(), 512);
    assert_eq!(parse_size("1KB").unwrap(), 1024);
}

#[test]
fn test_load_rules_from_file() {
    let ws = test_workspace();
    let path = write_rules(
        ws.path(),
        "IF size > 1MB THEN TAG 'large'\n\
         IF extension IS '.log' THEN TAG 'logfile'\n",
    );

    let rules = load_rules(&path).unwrap();
    assert_eq!(rules.len(), 2);

    let first = rules.iter().next().unwrap();
    assert_eq!(first.variable, "size");
    assert_eq!(first.operator, Operator::GreaterThan);
    assert_eq!(first.value, "1MB");
    assert_eq!(first.tag, "large");
}

#[test]
fn test_missing_rules_file_yields_empty_set() {
    let ws = test_workspace();
    let rules = load_rules(&ws.path().join("nope.acto")).unwrap();
    assert!(rules.is_empty());

    // with no rules, every file evaluates to an empty tag set
    let tags = evaluate(&rules, &FileContext::new(12345, ".log"));
    assert!(tags.is_empty());
}

#[test]
fn test_malformed_and_comment_lines_never_abort_a_load() {
    let ws = test_workspace();
    let path = write_rules(
        ws.path(),
        "# comment\n\
         IF size >>> garbage\n\
         IF THEN TAG\n\
         IF extension IS '.txt' THEN TAG 'text'\n",
    );

    let rules = load_rules(&path).unwrap();
    assert_eq!(rules.len(), 1);
}

#[test]
fn test_unknown_variable_never_contributes_a_tag() {
    let ws = test_workspace();
    let path = write_rules(ws.path(), "IF owner IS 'root' THEN TAG 'x'\n");
    let rules = load_rules(&path).unwrap();
    assert_eq!(rules.len(), 1);

    for size in [0, 1, 1024, u64::MAX] {
        for ext in ["", ".log", ".root"] {
            assert!(evaluate(&rules, &FileContext::new(size, ext)).is_empty());
        }
    }
}

#[test]
fn test_evaluate_is_idempotent_over_a_loaded_set() {
    let ws = test_workspace();
    let path = write_rules(
        ws.path(),
        "IF size > 1KB THEN TAG 'big'\n\
         IF extension IS '.BIN' THEN TAG 'binary'\n\
         IF size < 10MB THEN TAG 'manageable'\n",
    );
    let rules = load_rules(&path).unwrap();

    let ctx = FileContext::new(4096, ".bin");
    let first = evaluate(&rules, &ctx);
    let second = evaluate(&rules, &ctx);

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_duplicate_tags_from_distinct_rules_collapse() {
    let ws = test_workspace();
    let path = write_rules(
        ws.path(),
        "IF size > 1KB THEN TAG 'big'\n\
         IF extension IS '.iso' THEN TAG 'big'\n",
    );
    let rules = load_rules(&path).unwrap();

    let tags = evaluate(&rules, &FileContext::new(10_000, ".iso"));
    assert_eq!(tags.len(), 1);
    assert!(tags.contains("big"));
}

#[test]
fn test_rule_set_is_plain_value_state() {
    // the rule set is an explicitly constructed value, not ambient state:
    // two sets built from different files evaluate independently
    let ws = test_workspace();
    let a = load_rules(&write_rules(ws.path(), "IF size > 1B THEN TAG 'a'\n")).unwrap();

    let b_path = ws.path().join("other.acto");
    std::fs::write(&b_path, "IF size > 1B THEN TAG 'b'\n").unwrap();
    let b = load_rules(&b_path).unwrap();

    let ctx = FileContext::new(2, "");
    assert!(evaluate(&a, &ctx).contains("a"));
    assert!(evaluate(&b, &ctx).contains("b"));
    assert!(!evaluate(&a, &ctx).contains("b"));
}

#[test]
fn test_empty_rule_set_value() {
    let rules = RuleSet::new();
    assert!(rules.is_empty());
    assert!(evaluate(&rules, &FileContext::new(0, "")).is_empty());
}
