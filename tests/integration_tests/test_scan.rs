// end-to-end scan scenarios

use std::fs;

use acto::rules::load_rules;
use acto::scan::{scan, ScanReport};

use crate::common::{test_workspace, write_file, write_rules};

#[test]
fn test_large_logfile_scenario() {
    let ws = test_workspace();
    let rules_path = write_rules(
        ws.path(),
        "IF size > 1MB THEN TAG 'large'\n\
         IF extension IS '.log' THEN TAG 'logfile'\n",
    );
    let target = ws.path().join("target_folder");
    write_file(&target, "app.log", 2 * 1024 * 1024);

    let rules = load_rules(&rules_path).unwrap();
    let report = scan(&rules, &target).unwrap();

    let record = report.get("app.log").unwrap();
    assert_eq!(record.size_bytes, 2_097_152);
    let tags: Vec<&str> = record.tags.iter().map(String::as_str).collect();
    assert_eq!(tags, vec!["large", "logfile"]);
}

#[test]
fn test_tiny_file_scenario() {
    let ws = test_workspace();
    let rules_path = write_rules(ws.path(), "IF size < 10B THEN TAG 'tiny'\n");
    let target = ws.path().join("target_folder");
    write_file(&target, "empty.dat", 0);
    write_file(&target, "filled.dat", 100);

    let rules = load_rules(&rules_path).unwrap();
    let report = scan(&rules, &target).unwrap();

    assert!(report.get("empty.dat").unwrap().tags.contains("tiny"));
    assert!(report.get("filled.dat").unwrap().tags.is_empty());
}

#[test]
fn test_missing_target_directory_is_created() {
    let ws = test_workspace();
    let target = ws.path().join("does_not_exist_yet");

    let report = scan(&acto::rules::RuleSet::new(), &target).unwrap();
    assert!(report.is_empty());
    assert!(target.is_dir());
}

#[test]
fn test_missing_rules_file_scan_still_succeeds() {
    let ws = test_workspace();
    let rules = load_rules(&ws.path().join("absent.acto")).unwrap();
    let target = ws.path().join("target_folder");
    write_file(&target, "a.txt", 5);

    let report = scan(&rules, &target).unwrap();
    assert_eq!(report.len(), 1);
    assert!(report.get("a.txt").unwrap().tags.is_empty());
}

#[test]
fn test_scan_covers_nested_directories() {
    let ws = test_workspace();
    let rules_path = write_rules(ws.path(), "IF extension IS '.log' THEN TAG 'logfile'\n");
    let target = ws.path().join("target_folder");
    write_file(&target, "top.log", 1);
    write_file(&target, "nested/dir/deep.log", 1);
    write_file(&target, "nested/readme", 1);

    let rules = load_rules(&rules_path).unwrap();
    let report = scan(&rules, &target).unwrap();

    assert_eq!(report.len(), 3);
    assert!(report.get("deep.log").unwrap().tags.contains("logfile"));
    assert!(report.get("readme").unwrap().tags.is_empty());
}

#[test]
fn test_extension_matching_is_case_insensitive_both_ways() {
    let ws = test_workspace();
    let rules_path = write_rules(ws.path(), "IF extension IS '.LOG' THEN TAG 'logfile'\n");
    let target = ws.path().join("target_folder");
    write_file(&target, "UPPER.LOG", 1);
    write_file(&target, "lower.log", 1);

    let rules = load_rules(&rules_path).unwrap();
    let report = scan(&rules, &target).unwrap();

    assert!(report.get("UPPER.LOG").unwrap().tags.contains("logfile"));
    assert!(report.get("lower.log").unwrap().tags.contains("logfile"));
}

#[test]
fn test_report_persists_and_reloads() {
    let ws = test_workspace();
    let rules_path = write_rules(ws.path(), "IF size IS 512 THEN TAG 'exact'\n");
    let target = ws.path().join("target_folder");
    write_file(&target, "block.bin", 512);

    let rules = load_rules(&rules_path).unwrap();
    let report = scan(&rules, &target).unwrap();

    let out = ws.path().join("dat/json/metadata.json");
    report.save(&out).unwrap();

    let loaded = ScanReport::load(&out).unwrap();
    assert_eq!(loaded, report);

    // shape on disk: file name keys at the top level
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(raw["block.bin"]["size_bytes"], 512);
    assert_eq!(raw["block.bin"]["tags"][0], "exact");
}
