// integration tests for the change log and watcher

use std::fs;

use acto::changelog::{append_entry, read_entries, ChangeKind, LogEntry};
use acto::watch::Watcher;

use crate::common::{test_workspace, write_change_log};

#[test]
fn test_change_log_round_trip() {
    let ws = test_workspace();
    let log = ws.path().join("dat/json/changes_log.json");

    append_entry(
        &log,
        &LogEntry::new("2024-05-01 09:00:00", "a.txt", ChangeKind::Created),
    )
    .unwrap();
    append_entry(
        &log,
        &LogEntry::new("2024-05-01 09:00:01", "a.txt", ChangeKind::Deleted),
    )
    .unwrap();

    let (entries, stats) = read_entries(&log).unwrap();
    assert_eq!(stats.valid, 2);
    assert_eq!(entries[0].change, ChangeKind::Created);
    assert_eq!(entries[1].change, ChangeKind::Deleted);

    // one JSON object per line on disk
    let content = fs::read_to_string(&log).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.lines().all(|l| l.starts_with('{')));
}

#[test]
fn test_invalid_records_are_counted_not_fatal() {
    let ws = test_workspace();
    let log = write_change_log(
        ws.path(),
        &[
            r#"{"timestamp": "2024-05-01 09:00:00", "file": "a.txt", "change": "CREATED"}"#,
            r#"{"timestamp": "2024-05-01 09:00:01", "file": "b.txt", "change": "RENAMED"}"#,
            "garbage",
            r#"{"file": "c.txt", "change": "DELETED"}"#,
        ],
    );

    let (entries, stats) = read_entries(&log).unwrap();
    assert_eq!(stats.valid, 1);
    assert_eq!(stats.invalid, 3);
    assert_eq!(entries[0].file, "a.txt");
}

#[test]
fn test_watcher_logs_full_lifecycle() {
    let ws = test_workspace();
    let target = ws.path().join("watched");
    let log = ws.path().join("changes_log.json");

    let mut watcher = Watcher::new(&target, &log).unwrap();

    fs::write(target.join("data.txt"), b"v1").unwrap();
    watcher.poll_once().unwrap();

    fs::remove_file(target.join("data.txt")).unwrap();
    watcher.poll_once().unwrap();

    let (entries, stats) = read_entries(&log).unwrap();
    assert_eq!(stats.valid, 2);
    assert_eq!(entries[0].change, ChangeKind::Created);
    assert_eq!(entries[0].file, "data.txt");
    assert_eq!(entries[1].change, ChangeKind::Deleted);
}

#[test]
fn test_watcher_output_feeds_the_consumers() {
    // records appended by the watcher must satisfy the exporter's schema
    let ws = test_workspace();
    let target = ws.path().join("watched");
    let log = ws.path().join("changes_log.json");

    let mut watcher = Watcher::new(&target, &log).unwrap();
    fs::write(target.join("report.pdf"), b"pdf").unwrap();
    watcher.poll_once().unwrap();

    let (entries, stats) = read_entries(&log).unwrap();
    assert_eq!(stats.invalid, 0);
    assert!(acto::export::validate_for_xml(&entries).is_empty());
}
