//! Concurrency tests for Engine
//!
//! These tests verify:
//! - Concurrent updates to one table are never lost
//! - Concurrent creates all land in the table
//! - Readers never observe a half-written table
//! - Independent tables do not interfere
//! - Engines opened on the same directory exclude each other

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use jsonstore::config::Config;
use jsonstore::engine::Engine;
use jsonstore::Record;
use serde_json::{json, Value};
use tempfile::TempDir;

const DB: &str = "shop";

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_shared_engine() -> (TempDir, Arc<Engine>) {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join(DB)).unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .sync_writes(false)
        .build();
    (temp_dir, Arc::new(Engine::open(config).unwrap()))
}

/// Engine on an existing data directory
fn open_engine(data_dir: &Path) -> Engine {
    let config = Config::builder().data_dir(data_dir).sync_writes(false).build();
    Engine::open(config).unwrap()
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(fields) => fields,
        other => panic!("expected object, got {}", other),
    }
}

// =============================================================================
// Lost Update Tests
// =============================================================================

#[test]
fn test_concurrent_disjoint_updates_both_reflected() {
    let (_temp, engine) = setup_shared_engine();
    engine.create_record(DB, "t.json", record(json!({"id": "a", "n": 0}))).unwrap();
    engine.create_record(DB, "t.json", record(json!({"id": "b", "n": 0}))).unwrap();

    let handles: Vec<_> = ["a", "b"]
        .into_iter()
        .map(|id| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for n in 1..=50 {
                    let mut patch = record(json!({ "n": n }));
                    patch.insert(format!("seen_{}", n), json!(id));
                    assert!(engine.update_record(DB, "t.json", id, patch).unwrap());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for id in ["a", "b"] {
        let found = engine.read_record(DB, "t.json", id).unwrap().unwrap();
        assert_eq!(found["n"], json!(50));
        // Every patch of this id survived: none was overwritten by the other thread.
        for n in 1..=50 {
            assert_eq!(found[&format!("seen_{}", n)], json!(id));
        }
    }
}

#[test]
fn test_concurrent_creates_all_persist() {
    let (_temp, engine) = setup_shared_engine();
    engine.create_record(DB, "c.json", record(json!({"id": "seed"}))).unwrap();

    // Each thread appends its own record; the count proves no create was lost.
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..25 {
                    engine
                        .create_record(DB, "c.json", record(json!({"id": format!("{}-{}", t, i)})))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let all = engine.read_table(DB, "c.json").unwrap();
    assert_eq!(all.len(), 1 + 8 * 25);
    assert_eq!(engine.active_locks(), 0);
}

#[test]
fn test_readers_never_see_partial_table() {
    let (_temp, engine) = setup_shared_engine();
    engine.create_record(DB, "r.json", record(json!({"id": 0}))).unwrap();

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for i in 1..100 {
                engine.create_record(DB, "r.json", record(json!({"id": i}))).unwrap();
            }
        })
    };

    let reader = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for _ in 0..100 {
                // Strict decode would fail on any torn write.
                let found = engine.read_record(DB, "r.json", 0).unwrap();
                assert!(found.is_some());
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();

    assert_eq!(engine.read_table(DB, "r.json").unwrap().len(), 100);
}

// =============================================================================
// Independent Table Tests
// =============================================================================

#[test]
fn test_tables_are_independent() {
    let (_temp, engine) = setup_shared_engine();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let table = format!("table_{}.json", t);
                for i in 0..20 {
                    engine.create_record(DB, &table, record(json!({"id": i}))).unwrap();
                }
                engine.delete_record(DB, &table, 0).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for t in 0..4 {
        let all = engine.read_table(DB, &format!("table_{}.json", t)).unwrap();
        assert_eq!(all.len(), 19);
        assert_eq!(all[0], json!({"id": 1}));
    }
}

// =============================================================================
// Multiple Engine Tests
// =============================================================================

#[test]
fn test_engines_on_same_directory_do_not_lose_updates() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join(DB)).unwrap();

    // The second engine reaches the same directory through a different spelling.
    let first = open_engine(temp_dir.path());
    let second = open_engine(&temp_dir.path().join(DB).join(".."));
    first.create_record(DB, "t.json", record(json!({"id": "a", "n": 0}))).unwrap();
    first.create_record(DB, "t.json", record(json!({"id": "b", "n": 0}))).unwrap();

    let handles: Vec<_> = [("a", first), ("b", second)]
        .into_iter()
        .map(|(id, engine)| {
            thread::spawn(move || {
                for n in 1..=200 {
                    let patch = record(json!({ "n": n }));
                    assert!(engine.update_record(DB, "t.json", id, patch).unwrap());
                }
                engine
            })
        })
        .collect();

    let engines: Vec<Engine> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for engine in &engines {
        for id in ["a", "b"] {
            let found = engine.read_record(DB, "t.json", id).unwrap().unwrap();
            assert_eq!(found["n"], json!(200));
        }
        assert_eq!(engine.active_locks(), 0);
    }
}

#[test]
fn test_engines_on_same_directory_keep_all_creates() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join(DB)).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = open_engine(temp_dir.path());
            thread::spawn(move || {
                for i in 0..25 {
                    engine
                        .create_record(DB, "c.json", record(json!({"id": format!("{}-{}", t, i)})))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let all = open_engine(temp_dir.path()).read_table(DB, "c.json").unwrap();
    assert_eq!(all.len(), 4 * 25);
}
