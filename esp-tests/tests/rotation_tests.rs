//! Integration Tests für RotatingFileSink über dem RAM-Store

mod common;

use common::MockLogStore;
use esp_core::{Formatter, Level, LogRecord, LogSink, RotatingFileSink, SinkConfig, StoreError};

const PATH: &str = "led_controller.log";

fn record(level: Level, message: &str) -> LogRecord {
    LogRecord {
        timestamp_ms: 0,
        level,
        name: "led_controller",
        message: message.to_string(),
    }
}

/// Nur die Nachricht: Zeilenlänge = Nachricht + '\n'
fn sink(store: &MockLogStore, max_bytes: u64, backup_count: u32) -> RotatingFileSink<MockLogStore> {
    RotatingFileSink::new(
        store.clone(),
        SinkConfig::new(PATH, max_bytes, backup_count),
        Formatter::new("{message}", "%H:%M:%S"),
    )
}

/// Neun Zeichen + '\n' = 10 Bytes pro Zeile
fn line(n: usize) -> String {
    format!("line-{:04}", n)
}

#[test]
fn test_writes_below_budget_without_rotation() {
    let store = MockLogStore::new();
    let mut sink = sink(&store, 100, 2);

    sink.emit(&record(Level::Info, "a")).unwrap();
    sink.emit(&record(Level::Info, "b")).unwrap();

    assert_eq!(store.content(PATH).as_deref(), Some("a\nb\n"));
    assert_eq!(store.names(), vec![PATH.to_string()]);
    assert_eq!(sink.current_size(), 4);
}

#[test]
fn test_generations_keep_content_oldest_at_highest_suffix() {
    let store = MockLogStore::new();
    let mut sink = sink(&store, 20, 2);

    // Rotationen vor Zeile 3, 5, 7 und 9
    for n in 1..=10 {
        sink.emit(&record(Level::Info, &line(n))).unwrap();
        let active = store.content(PATH).unwrap();
        assert!(active.len() <= 20 + 10);
    }

    assert_eq!(
        store.names(),
        vec![
            PATH.to_string(),
            format!("{}.1", PATH),
            format!("{}.2", PATH)
        ]
    );
    assert_eq!(store.content(PATH).unwrap(), "line-0009\nline-0010\n");
    assert_eq!(
        store.content(&format!("{}.1", PATH)).unwrap(),
        "line-0007\nline-0008\n"
    );
    assert_eq!(
        store.content(&format!("{}.2", PATH)).unwrap(),
        "line-0005\nline-0006\n"
    );
}

#[test]
fn test_fewer_rotations_than_backups() {
    let store = MockLogStore::new();
    let mut sink = sink(&store, 20, 5);

    for n in 1..=3 {
        sink.emit(&record(Level::Info, &line(n))).unwrap();
    }

    assert_eq!(store.names().len(), 2);
    assert_eq!(
        store.content(&format!("{}.1", PATH)).unwrap(),
        "line-0001\nline-0002\n"
    );
}

#[test]
fn test_zero_backups_deletes_active_file() {
    let store = MockLogStore::new();
    let mut sink = sink(&store, 20, 0);

    for n in 1..=3 {
        sink.emit(&record(Level::Info, &line(n))).unwrap();
    }

    assert_eq!(store.names(), vec![PATH.to_string()]);
    assert_eq!(store.content(PATH).unwrap(), "line-0003\n");
    assert_eq!(sink.current_size(), 10);
}

#[test]
fn test_zero_max_bytes_never_rotates() {
    let store = MockLogStore::new();
    let mut sink = sink(&store, 0, 2);

    for n in 1..=50 {
        sink.emit(&record(Level::Info, &line(n))).unwrap();
    }

    assert_eq!(store.names(), vec![PATH.to_string()]);
    assert_eq!(sink.current_size(), 500);
}

#[test]
fn test_info_sink_skips_debug() {
    let store = MockLogStore::new();
    let mut sink = sink(&store, 100, 2).with_level(Level::Info);

    sink.emit(&record(Level::Debug, "Govee response: 200 ok")).unwrap();
    assert_eq!(store.content(PATH), None);

    sink.emit(&record(Level::Info, "Input state changed to on")).unwrap();
    assert_eq!(
        store.content(PATH).as_deref(),
        Some("Input state changed to on\n")
    );
}

#[test]
fn test_debug_sink_writes_debug_and_info() {
    let store = MockLogStore::new();
    let mut sink = sink(&store, 100, 2);
    assert_eq!(sink.level(), Level::Debug);

    sink.emit(&record(Level::Debug, "d")).unwrap();
    sink.emit(&record(Level::Info, "i")).unwrap();

    assert_eq!(store.content(PATH).as_deref(), Some("d\ni\n"));
}

#[test]
fn test_existing_file_size_is_picked_up() {
    let store = MockLogStore::new();
    store.insert(PATH, "0123456789012345678\n");

    let mut sink = sink(&store, 25, 1);
    assert_eq!(sink.current_size(), 20);

    sink.emit(&record(Level::Info, &line(1))).unwrap();

    assert_eq!(
        store.content(&format!("{}.1", PATH)).unwrap(),
        "0123456789012345678\n"
    );
    assert_eq!(store.content(PATH).unwrap(), "line-0001\n");
}

#[test]
fn test_rename_failure_is_swallowed() {
    let store = MockLogStore::new();
    let mut sink = sink(&store, 20, 2);
    store.fail_rename.set(true);

    for n in 1..=3 {
        sink.emit(&record(Level::Info, &line(n))).unwrap();
    }

    // Budget überschritten, aber weiter geloggt
    assert_eq!(store.content(PATH).unwrap().len(), 30);
    assert_eq!(sink.current_size(), 10);
}

#[test]
fn test_append_failure_is_returned() {
    let store = MockLogStore::new();
    let mut sink = sink(&store, 20, 2);
    store.fail_append.set(true);

    assert_eq!(
        sink.emit(&record(Level::Error, "lost")),
        Err(StoreError::Io)
    );
    assert_eq!(sink.current_size(), 0);
}
