// integration tests for the analytics aggregation

use std::fs;

use acto::analytics::{build_dashboard, save_dashboard, DashboardStats};
use acto::changelog::read_entries;

use crate::common::{test_workspace, write_change_log};

#[test]
fn test_dashboard_from_change_log() {
    let ws = test_workspace();
    let log = write_change_log(
        ws.path(),
        &[
            r#"{"timestamp": "2024-05-01 09:00:00", "file": "a.txt", "change": "CREATED"}"#,
            r#"{"timestamp": "2024-05-01 09:00:01", "file": "b.txt", "change": "MODIFIED"}"#,
            r#"{"timestamp": "2024-05-01 09:00:02", "file": "c.log", "change": "CREATED"}"#,
            r#"{"timestamp": "2024-05-01 09:00:03", "file": "README", "change": "DELETED"}"#,
        ],
    );

    let (entries, _) = read_entries(&log).unwrap();
    let dashboard = build_dashboard(&entries);

    assert_eq!(dashboard.frequent_analytics.get(".txt"), Some(&2));
    assert_eq!(dashboard.frequent_analytics.get(".log"), Some(&1));
    assert_eq!(dashboard.frequent_analytics.get(""), Some(&1));
    assert_eq!(dashboard.status, "active");
}

#[test]
fn test_dashboard_from_missing_log_is_empty() {
    let ws = test_workspace();
    let (entries, _) = read_entries(&ws.path().join("absent.json")).unwrap();

    let dashboard = build_dashboard(&entries);
    assert!(dashboard.frequent_analytics.is_empty());
    assert_eq!(dashboard.status, "active");
}

#[test]
fn test_dashboard_persists_as_pretty_json() {
    let ws = test_workspace();
    let out = ws.path().join("dat/json/dashboard_stats.json");

    let dashboard = build_dashboard(&[]);
    save_dashboard(&dashboard, &out).unwrap();

    let content = fs::read_to_string(&out).unwrap();
    // indented output with the expected top-level fields
    assert!(content.contains("\n  \"frequent_analytics\""));
    let loaded: DashboardStats = serde_json::from_str(&content).unwrap();
    assert_eq!(loaded, dashboard);
}
