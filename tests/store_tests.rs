use rtimebilling::StorePolicy;
use rtimebilling::errors::AppError;
use rtimebilling::models::{EntryRef, EntryUpdate};

mod common;
use common::{entry, seed, store_with_policy, test_store};

#[test]
fn added_project_is_listed_with_its_rate() {
    let store = test_store("store_add_list");

    store.add_project("Acme", Some(50.0)).unwrap();
    store.add_project("Beta", None).unwrap();

    let projects = store.list_projects().unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "Acme");
    assert_eq!(projects[0].hourly_rate, 50.0);
    assert_eq!(projects[1].name, "Beta");
    assert_eq!(projects[1].hourly_rate, 0.0);
}

#[test]
fn duplicate_project_is_a_conflict() {
    let store = test_store("store_duplicate");

    store.add_project("Acme", Some(50.0)).unwrap();
    let err = store.add_project("Acme", Some(10.0)).unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(store.list_projects().unwrap()[0].hourly_rate, 50.0);
}

#[test]
fn invalid_names_and_rates_are_rejected() {
    let store = test_store("store_invalid_project");

    assert!(matches!(
        store.add_project("", None),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        store.add_project("a/b", None),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        store.add_project("Acme", Some(-5.0)),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        store.update_rate("Acme", f64::NAN),
        Err(AppError::Validation(_))
    ));
    assert!(store.list_projects().unwrap().is_empty());
}

#[test]
fn saved_entry_is_priced_at_save_time() {
    let store = test_store("store_entry_cost");
    store.add_project("Acme", Some(50.0)).unwrap();

    let saved = store
        .save_entry(&entry("Acme", "2025-06-01", "09:00", "12:00", 3.0))
        .unwrap();
    assert_eq!(saved.cost, 150.0);
    assert_eq!(saved.hourly_rate, 50.0);

    let listed = store.project_entries("Acme").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].date, "2025-06-01");
    assert_eq!(listed[0].start_time, "09:00");
    assert_eq!(listed[0].end_time, "12:00");
    assert_eq!(listed[0].duration, 3.0);
    assert_eq!(listed[0].cost, 150.0);
}

#[test]
fn cost_is_rounded_to_cents() {
    let store = test_store("store_entry_rounding");
    store.add_project("Acme", Some(33.333)).unwrap();

    let saved = store
        .save_entry(&entry("Acme", "2025-06-01", "09:00", "09:20", 0.33))
        .unwrap();
    assert_eq!(saved.cost, 11.0);
}

#[test]
fn rate_change_keeps_historical_cost() {
    let store = test_store("store_rate_history");
    store.add_project("Acme", Some(50.0)).unwrap();
    store
        .save_entry(&entry("Acme", "2025-06-01", "09:00", "12:00", 3.0))
        .unwrap();

    store.update_rate("Acme", 100.0).unwrap();
    store
        .save_entry(&entry("Acme", "2025-06-02", "09:00", "10:00", 1.0))
        .unwrap();

    let listed = store.project_entries("Acme").unwrap();
    // newest first
    assert_eq!(listed[0].cost, 100.0);
    assert_eq!(listed[1].cost, 150.0);
    assert_eq!(listed[1].hourly_rate, 50.0);
}

#[test]
fn entry_dates_are_normalized() {
    let store = test_store("store_entry_dates");

    let a = store
        .save_entry(&entry("Acme", "20.11.2025", "09:00", "10:00", 1.0))
        .unwrap();
    let b = store
        .save_entry(&entry("Acme", "21/11/2025", "09:00", "10:00", 1.0))
        .unwrap();

    assert_eq!(a.date, "2025-11-20");
    assert_eq!(b.date, "2025-11-21");
}

#[test]
fn entries_are_listed_newest_first() {
    let store = test_store("store_entry_order");
    seed(&store);

    let all = store.all_entries().unwrap();
    let dates: Vec<&str> = all.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(
        dates,
        ["2025-06-03", "2025-06-02", "2025-06-01", "2025-06-01"]
    );
    // same date: later start first
    assert_eq!(all[2].start_time, "14:00");
    assert_eq!(all[3].start_time, "09:00");
}

#[test]
fn missing_fields_and_bad_durations_are_rejected() {
    let store = test_store("store_entry_validation");

    for bad in [
        entry("", "2025-06-01", "09:00", "10:00", 1.0),
        entry("Acme", "", "09:00", "10:00", 1.0),
        entry("Acme", "2025-06-01", "", "10:00", 1.0),
        entry("Acme", "2025-06-01", "09:00", " ", 1.0),
        entry("Acme", "2025-06-01", "09:00", "10:00", 0.0),
        entry("Acme", "2025-06-01", "09:00", "10:00", -2.0),
    ] {
        assert!(matches!(store.save_entry(&bad), Err(AppError::Validation(_))));
    }
    assert!(store.all_entries().unwrap().is_empty());
}

#[test]
fn unknown_project_is_auto_created_with_rate_zero() {
    let store = test_store("store_auto_create_on");

    let saved = store
        .save_entry(&entry("NewCo", "2025-06-01", "09:00", "10:00", 1.0))
        .unwrap();
    assert_eq!(saved.cost, 0.0);

    let projects = store.list_projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "NewCo");
    assert_eq!(projects[0].hourly_rate, 0.0);
}

#[test]
fn unknown_project_is_rejected_when_auto_create_is_off() {
    let store = store_with_policy(
        "store_auto_create_off",
        StorePolicy {
            auto_create_project: false,
        },
    );

    let err = store
        .save_entry(&entry("NewCo", "2025-06-01", "09:00", "10:00", 1.0))
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(store.list_projects().unwrap().is_empty());

    store.add_project("NewCo", Some(10.0)).unwrap();
    assert!(
        store
            .save_entry(&entry("NewCo", "2025-06-01", "09:00", "10:00", 1.0))
            .is_ok()
    );
}

#[test]
fn update_by_key_recomputes_cost_at_current_rate() {
    let store = test_store("store_update_key");
    store.add_project("Acme", Some(50.0)).unwrap();
    store
        .save_entry(&entry("Acme", "2025-06-01", "09:00", "12:00", 3.0))
        .unwrap();
    store.update_rate("Acme", 60.0).unwrap();

    let r = EntryRef::parse("Acme|01.06.2025|09:00|12:00").unwrap();
    let updated = store
        .update_entry(
            &r,
            &EntryUpdate {
                end_time: Some("13:00".into()),
                duration: Some(4.0),
                ..EntryUpdate::default()
            },
        )
        .unwrap();

    assert_eq!(updated.end_time, "13:00");
    assert_eq!(updated.duration, 4.0);
    assert_eq!(updated.cost, 240.0);
    assert_eq!(updated.date, "2025-06-01");
}

#[test]
fn update_and_delete_by_id() {
    let store = test_store("store_update_delete_id");
    let saved = store
        .save_entry(&entry("Acme", "2025-06-01", "09:00", "12:00", 3.0))
        .unwrap();

    let r = EntryRef::Id(saved.id);
    store
        .update_entry(
            &r,
            &EntryUpdate {
                date: Some("02.06.2025".into()),
                ..EntryUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(store.all_entries().unwrap()[0].date, "2025-06-02");

    let deleted = store.delete_entry(&r).unwrap();
    assert_eq!(deleted.id, saved.id);
    assert!(store.all_entries().unwrap().is_empty());

    assert!(matches!(store.delete_entry(&r), Err(AppError::NotFound(_))));
}

#[test]
fn missing_entry_is_not_found() {
    let store = test_store("store_missing_entry");
    store.add_project("Acme", Some(50.0)).unwrap();

    let r = EntryRef::parse("Acme|2025-06-01|09:00|12:00").unwrap();
    assert!(matches!(
        store.update_entry(&r, &EntryUpdate::default()),
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(store.delete_entry(&r), Err(AppError::NotFound(_))));
}

#[test]
fn ambiguous_key_resolves_to_the_first_entry() {
    let store = test_store("store_ambiguous_key");
    let first = store
        .save_entry(&entry("Acme", "2025-06-01", "09:00", "12:00", 3.0))
        .unwrap();
    let second = store
        .save_entry(&entry("Acme", "2025-06-01", "09:00", "12:00", 2.0))
        .unwrap();
    assert!(first.id < second.id);

    let r = EntryRef::parse("Acme|2025-06-01|09:00|12:00").unwrap();

    let updated = store
        .update_entry(
            &r,
            &EntryUpdate {
                duration: Some(5.0),
                ..EntryUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.id, first.id);

    let deleted = store.delete_entry(&r).unwrap();
    assert_eq!(deleted.id, first.id);

    let remaining = store.all_entries().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
    assert_eq!(remaining[0].duration, 2.0);
}

#[test]
fn settings_round_trip() {
    let store = test_store("store_settings");
    assert_eq!(store.setting("theme").unwrap(), None);

    store.set_setting("theme", "dark").unwrap();
    store.set_setting("theme", "light").unwrap();
    assert_eq!(store.setting("theme").unwrap().as_deref(), Some("light"));

    store.add_project("Acme", Some(42.5)).unwrap();
    assert_eq!(
        store.setting("project:Acme:hourlyRateEUR").unwrap().as_deref(),
        Some("42.5")
    );
}

#[test]
fn mutations_are_written_to_the_audit_log() {
    let store = test_store("store_audit_log");
    seed(&store);

    let log = store.audit_log().unwrap();
    assert!(log.iter().any(|r| r.operation == "add" && r.target == "project:Acme"));
    assert_eq!(
        log.iter()
            .filter(|r| r.operation == "add" && r.target.starts_with("entry:"))
            .count(),
        4
    );
}

#[test]
fn key_separator_is_rejected_in_entry_fields() {
    let store = test_store("store_key_separator");
    seed(&store);

    let err = store
        .save_entry(&entry("Acme", "2025-06-05", "09|00", "10:00", 1.0))
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let upd = EntryUpdate {
        end_time: Some("a|b".into()),
        ..Default::default()
    };
    let err = store
        .update_entry(&EntryRef::parse("Acme|2025-06-01|09:00|12:00").unwrap(), &upd)
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // every served key parses back to the entry it came from
    for e in store.all_entries().unwrap() {
        let r = EntryRef::parse(&e.key().to_string()).unwrap();
        assert_eq!(store.delete_entry(&r).unwrap().id, e.id);
    }
}
