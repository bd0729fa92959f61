#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rtimebilling::models::NewTimeEntry;
use rtimebilling::{Store, StoreLocation, StorePolicy};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rtb() -> Command {
    cargo_bin_cmd!("rtimebilling")
}

/// Create a unique test data file path inside the system temp dir and remove
/// any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rtimebilling.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Store on a fresh fixed file with the default (auto-create) policy.
pub fn test_store(name: &str) -> Store {
    store_with_policy(name, StorePolicy::default())
}

pub fn store_with_policy(name: &str, policy: StorePolicy) -> Store {
    let path = setup_test_db(name);
    Store::new(StoreLocation::Fixed(PathBuf::from(path)), policy)
}

pub fn entry(project: &str, date: &str, start: &str, end: &str, duration: f64) -> NewTimeEntry {
    NewTimeEntry {
        project: project.to_string(),
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        duration,
    }
}

/// Two projects with a handful of entries spread over three days.
pub fn seed(store: &Store) {
    store.add_project("Acme", Some(50.0)).expect("add Acme");
    store.add_project("Globex", Some(80.0)).expect("add Globex");

    for e in [
        entry("Acme", "2025-06-01", "09:00", "12:00", 3.0),
        entry("Acme", "2025-06-02", "13:00", "14:30", 1.5),
        entry("Globex", "2025-06-01", "14:00", "16:00", 2.0),
        entry("Globex", "2025-06-03", "08:00", "09:00", 1.0),
    ] {
        store.save_entry(&e).expect("save entry");
    }
}
