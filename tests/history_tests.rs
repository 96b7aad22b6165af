use chrono::{DateTime, TimeZone, Utc};
use locator_engine::element::element_model::{Attributes, Element};
use locator_engine::history::history::{DEFAULT_HISTORY_CAPACITY, HistoryEntry, LocatorHistory};
use locator_engine::locator::synthesizer::synthesize;

// ============================================================================
// Helper builders
// ============================================================================

fn at(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, second).unwrap()
}

fn entry(id_attr: &str, second: u32) -> HistoryEntry {
    let element = Element::new("input", Attributes::from_pairs([("id", id_attr)]), "");
    let locator = synthesize(&element, None);
    HistoryEntry::new(element, locator, "playwright", "// code".to_string(), at(second))
}

fn selectors(history: &LocatorHistory) -> Vec<String> {
    history.iter().map(|e| e.locator.css_selector.clone()).collect()
}

// ============================================================================
// Capacity and eviction
// ============================================================================

#[test]
fn default_capacity_is_twenty() {
    assert_eq!(DEFAULT_HISTORY_CAPACITY, 20);
    assert_eq!(LocatorHistory::default().capacity(), 20);
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let mut history = LocatorHistory::new(0);
    assert_eq!(history.capacity(), 1);
    history.record(entry("a", 0));
    history.record(entry("b", 1));
    assert_eq!(selectors(&history), vec!["#b"]);
}

#[test]
fn newest_entry_comes_first() {
    let mut history = LocatorHistory::new(5);
    history.record(entry("first", 0));
    history.record(entry("second", 1));
    history.record(entry("third", 2));

    assert_eq!(selectors(&history), vec!["#third", "#second", "#first"]);
    assert_eq!(history.latest().unwrap().locator.css_selector, "#third");
}

#[test]
fn full_history_evicts_oldest() {
    let mut history = LocatorHistory::new(3);
    for (i, id) in ["a", "b", "c"].iter().enumerate() {
        assert!(history.record(entry(id, i as u32)).is_none());
    }

    let evicted = history.record(entry("d", 3)).unwrap();
    assert_eq!(evicted.locator.css_selector, "#a");
    assert_eq!(history.len(), 3);
    assert_eq!(selectors(&history), vec!["#d", "#c", "#b"]);
}

#[test]
fn twenty_one_records_keep_twenty() {
    let mut history = LocatorHistory::default();
    for i in 0..21 {
        history.record(entry(&format!("el{}", i), i));
    }
    assert_eq!(history.len(), 20);
    assert!(!selectors(&history).contains(&"#el0".to_string()));
}

#[test]
fn clear_empties_history() {
    let mut history = LocatorHistory::new(3);
    history.record(entry("a", 0));
    history.clear();
    assert!(history.is_empty());
    assert!(history.latest().is_none());
}

#[test]
fn snapshot_is_detached_from_later_changes() {
    let mut history = LocatorHistory::new(3);
    history.record(entry("a", 0));
    let snapshot = history.snapshot();

    history.record(entry("b", 1));
    history.clear();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].locator.css_selector, "#a");
}

// ============================================================================
// Entry ids
// ============================================================================

#[test]
fn entry_id_is_stable_sha1() {
    let first = entry("a", 0);
    let again = entry("a", 0);
    assert_eq!(first.id, again.id);
    assert_eq!(first.id.len(), 40);
    assert!(first.id.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn entry_id_changes_with_timestamp_and_element() {
    assert_ne!(entry("a", 0).id, entry("a", 1).id);
    assert_ne!(entry("a", 0).id, entry("b", 0).id);
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn to_json_exports_records() {
    let mut history = LocatorHistory::new(3);
    history.record(entry("user", 5));

    let json: serde_json::Value = serde_json::from_str(&history.to_json().unwrap()).unwrap();
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record["element"], r#"<input id="user">"#);
    assert_eq!(record["cssSelector"], "#user");
    assert_eq!(record["xpath"], r#"//*[@id="user"]"#);
    assert_eq!(record["framework"], "playwright");
    assert_eq!(record["timestamp"], "2026-01-02T03:04:05.000Z");
    assert_eq!(record["id"].as_str().unwrap().len(), 40);
}

#[test]
fn empty_history_exports_empty_array() {
    let history = LocatorHistory::new(3);
    let json: serde_json::Value = serde_json::from_str(&history.to_json().unwrap()).unwrap();
    assert_eq!(json, serde_json::json!([]));
}

#[test]
fn export_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut history = LocatorHistory::new(3);
    history.record(entry("a", 0));
    history.record(entry("b", 1));
    history.export(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    let css: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["cssSelector"].as_str().unwrap())
        .collect();
    assert_eq!(css, vec!["#b", "#a"]);
}

#[test]
fn export_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("history.json");
    let history = LocatorHistory::new(3);
    assert!(history.export(&path).is_err());
}
