use predicates::prelude::*;
use predicates::str::contains;
use std::fs;

mod common;
use common::{rtb, setup_test_db, temp_out};

fn init_db(db: &str) {
    rtb()
        .args(["--db", db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));
}

fn add_project(db: &str, name: &str, rate: &str) {
    rtb()
        .args(["--db", db, "--test", "project", "add", name, "--rate", rate])
        .assert()
        .success();
}

fn add_entry(db: &str, project: &str, date: &str, start: &str, end: &str) {
    rtb()
        .args([
            "--db", db, "--test", "entry", "add", project, "--date", date, "--start", start,
            "--end", end,
        ])
        .assert()
        .success();
}

#[test]
fn init_creates_the_data_file() {
    let db = setup_test_db("cli_init");
    init_db(&db);
    assert!(std::path::Path::new(&db).exists());
}

#[test]
fn projects_are_added_and_listed() {
    let db = setup_test_db("cli_projects");
    init_db(&db);
    add_project(&db, "Acme", "50");

    rtb()
        .args(["--db", &db, "--test", "project", "list"])
        .assert()
        .success()
        .stdout(contains("Acme").and(contains("50.00")));

    rtb()
        .args(["--db", &db, "--test", "project", "rate", "Acme", "65"])
        .assert()
        .success()
        .stdout(contains("65.00"));
}

#[test]
fn duplicate_project_fails() {
    let db = setup_test_db("cli_duplicate_project");
    init_db(&db);
    add_project(&db, "Acme", "50");

    rtb()
        .args(["--db", &db, "--test", "project", "add", "Acme"])
        .assert()
        .failure()
        .stderr(contains("Already exists"));
}

#[test]
fn rate_of_unknown_project_fails() {
    let db = setup_test_db("cli_rate_unknown");
    init_db(&db);

    rtb()
        .args(["--db", &db, "--test", "project", "rate", "Ghost", "10"])
        .assert()
        .failure()
        .stderr(contains("Not found"));
}

#[test]
fn entry_duration_is_derived_and_costed() {
    let db = setup_test_db("cli_entry_add");
    init_db(&db);
    add_project(&db, "Acme", "50");

    rtb()
        .args([
            "--db", &db, "--test", "entry", "add", "Acme", "--date", "2025-06-01", "--start",
            "09:00", "--end", "11:30",
        ])
        .assert()
        .success()
        .stdout(contains("2.50h").and(contains("125.00")));

    rtb()
        .args(["--db", &db, "--test", "entry", "list", "--project", "Acme"])
        .assert()
        .success()
        .stdout(contains("2025-06-01").and(contains("Total")));
}

#[test]
fn entry_without_end_is_rejected() {
    let db = setup_test_db("cli_entry_missing_end");
    init_db(&db);

    rtb()
        .args(["--db", &db, "--test", "entry", "add", "Acme", "--start", "09:00"])
        .assert()
        .failure()
        .stderr(contains("--end"));
}

#[test]
fn entries_are_updated_by_key_and_deleted_by_id() {
    let db = setup_test_db("cli_entry_update_delete");
    init_db(&db);
    add_project(&db, "Acme", "40");
    add_entry(&db, "Acme", "2025-06-01", "09:00", "10:00");

    rtb()
        .args([
            "--db",
            &db,
            "--test",
            "entry",
            "update",
            "Acme|2025-06-01|09:00|10:00",
            "--end",
            "11:00",
            "--duration",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("09:00-11:00").and(contains("80.00")));

    rtb()
        .args(["--db", &db, "--test", "entry", "update", "1"])
        .assert()
        .failure()
        .stderr(contains("Nothing to update"));

    rtb()
        .args(["--db", &db, "--test", "entry", "del", "1"])
        .assert()
        .success()
        .stdout(contains("deleted"));

    rtb()
        .args(["--db", &db, "--test", "entry", "del", "1"])
        .assert()
        .failure()
        .stderr(contains("Not found"));
}

#[test]
fn timers_run_through_their_lifecycle() {
    let db = setup_test_db("cli_timers");
    init_db(&db);

    rtb()
        .args(["--db", &db, "--test", "timer", "start", "t1", "Acme"])
        .assert()
        .success()
        .stdout(contains("running"));

    rtb()
        .args(["--db", &db, "--test", "timer", "update", "t1", "3725"])
        .assert()
        .success()
        .stdout(contains("01:02:05"));

    rtb()
        .args(["--db", &db, "--test", "timer", "stop", "t1"])
        .assert()
        .success()
        .stdout(contains("stopped"));

    rtb()
        .args(["--db", &db, "--test", "timer", "list"])
        .assert()
        .success()
        .stdout(contains("t1").and(contains("Acme")));

    rtb()
        .args(["--db", &db, "--test", "timer", "del", "t1"])
        .assert()
        .success()
        .stdout(contains("deleted"));

    rtb()
        .args(["--db", &db, "--test", "timer", "stop", "t1"])
        .assert()
        .success()
        .stdout(contains("not found"));
}

#[test]
fn ledger_and_analytics_show_totals() {
    let db = setup_test_db("cli_reports");
    init_db(&db);
    add_project(&db, "Acme", "50");
    add_project(&db, "Globex", "100");
    add_entry(&db, "Acme", "2025-06-01", "09:00", "12:00");
    add_entry(&db, "Globex", "2025-06-01", "13:00", "14:00");

    rtb()
        .args(["--db", &db, "--test", "ledger"])
        .assert()
        .success()
        .stdout(contains("2025-06-01").and(contains("4.00")));

    rtb()
        .args(["--db", &db, "--test", "analytics", "--rebuild"])
        .assert()
        .success()
        .stdout(
            contains("Globex")
                .and(contains("250.00"))
                .and(contains("75.0%"))
                .and(contains("Total")),
        );
}

#[test]
fn export_writes_an_xlsx_file() {
    let db = setup_test_db("cli_export");
    let out = temp_out("cli_export", "xlsx");
    init_db(&db);
    add_project(&db, "Acme", "50");
    add_entry(&db, "Acme", "2025-06-01", "09:00", "12:00");

    rtb()
        .args([
            "--db", &db, "--test", "export", "--project", "Acme", "--file", &out, "--force",
        ])
        .assert()
        .success()
        .stdout(contains("export completed"));

    let bytes = fs::read(&out).expect("workbook written");
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn export_needs_a_target() {
    let db = setup_test_db("cli_export_no_target");
    init_db(&db);

    rtb()
        .args(["--db", &db, "--test", "export"])
        .assert()
        .failure();
}

#[test]
fn export_of_empty_project_fails() {
    let db = setup_test_db("cli_export_empty");
    let out = temp_out("cli_export_empty", "xlsx");
    init_db(&db);
    add_project(&db, "Idle", "10");

    rtb()
        .args(["--db", &db, "--test", "export", "--project", "Idle", "--file", &out])
        .assert()
        .failure()
        .stderr(contains("No entries found"));
    assert!(!std::path::Path::new(&out).exists());
}

#[test]
fn log_lists_recorded_operations() {
    let db = setup_test_db("cli_log");
    init_db(&db);
    add_project(&db, "Acme", "50");

    rtb()
        .args(["--db", &db, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("project:Acme"));
}

#[test]
fn explicit_duration_is_stored_unrounded() {
    let db = setup_test_db("cli_entry_explicit_duration");
    init_db(&db);
    add_project(&db, "Acme", "100");

    // 1.005h at 100/h costs 100.50; a rounded duration would give 100.00
    rtb()
        .args([
            "--db", &db, "--test", "entry", "add", "Acme", "--date", "2025-06-01", "--start",
            "09:00", "--end", "10:00", "--duration", "1.005",
        ])
        .assert()
        .success()
        .stdout(contains("100.50"));

    rtb()
        .args([
            "--db", &db, "--test", "entry", "add", "Acme", "--date", "2025-06-01", "--start",
            "10:00", "--end", "10:00", "--duration", "0.004",
        ])
        .assert()
        .success();
}
