use rtimebilling::StorePolicy;
use rtimebilling::errors::AppError;

mod common;
use common::{store_with_policy, test_store};

#[test]
fn timer_lifecycle() {
    let store = test_store("timer_lifecycle");

    let started = store.start_timer("t1", "Acme").unwrap();
    assert!(started.is_running);
    assert_eq!(started.elapsed_time, 0.0);
    assert_eq!(started.project, "Acme");
    assert!(chrono::DateTime::parse_from_rfc3339(&started.start_time).is_ok());
    assert_eq!(store.timers().unwrap().len(), 1);

    let updated = store.update_timer("t1", 120.0).unwrap().unwrap();
    assert_eq!(updated.elapsed_time, 120.0);
    assert!(updated.is_running);

    let stopped = store.stop_timer("t1").unwrap().unwrap();
    assert!(!stopped.is_running);
    assert_eq!(stopped.elapsed_time, 120.0);

    let listed = store.timers().unwrap();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].is_running);

    assert!(store.delete_timer("t1").unwrap());
    assert!(store.timers().unwrap().is_empty());

    assert_eq!(store.update_timer("t1", 5.0).unwrap(), None);
    assert_eq!(store.stop_timer("t1").unwrap(), None);
    assert!(!store.delete_timer("t1").unwrap());
}

#[test]
fn restart_resets_the_timer() {
    let store = test_store("timer_restart");

    store.start_timer("t1", "Acme").unwrap();
    store.update_timer("t1", 300.0).unwrap();
    store.stop_timer("t1").unwrap();

    let restarted = store.start_timer("t1", "Globex").unwrap();
    assert!(restarted.is_running);
    assert_eq!(restarted.elapsed_time, 0.0);
    assert_eq!(restarted.project, "Globex");
    assert_eq!(store.timers().unwrap().len(), 1);
}

#[test]
fn timer_auto_creates_its_project() {
    let store = test_store("timer_auto_create");
    store.start_timer("t1", "Fresh").unwrap();

    let projects = store.list_projects().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Fresh");
    assert!(store.analytics().unwrap().row("Fresh").is_some());
}

#[test]
fn timer_on_unknown_project_fails_when_auto_create_is_off() {
    let store = store_with_policy(
        "timer_auto_create_off",
        StorePolicy {
            auto_create_project: false,
        },
    );

    assert!(matches!(
        store.start_timer("t1", "Ghost"),
        Err(AppError::NotFound(_))
    ));
    assert!(store.timers().unwrap().is_empty());
}

#[test]
fn elapsed_time_must_be_non_negative() {
    let store = test_store("timer_negative_elapsed");
    store.start_timer("t1", "Acme").unwrap();

    assert!(matches!(
        store.update_timer("t1", -1.0),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        store.update_timer("t1", f64::NAN),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn timers_are_ordered_by_start_time() {
    let store = test_store("timer_order");
    store.start_timer("b", "Acme").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    store.start_timer("a", "Acme").unwrap();

    let ids: Vec<String> = store.timers().unwrap().into_iter().map(|t| t.timer_id).collect();
    assert_eq!(ids, ["b", "a"]);
}
