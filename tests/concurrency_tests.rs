use rtimebilling::errors::AppError;
use std::sync::Arc;
use std::thread;

mod common;
use common::{entry, test_store};

const WRITERS: usize = 8;
const PER_WRITER: usize = 20;

#[test]
fn parallel_writers_on_one_store_all_succeed() {
    let store = Arc::new(test_store("concurrent_writers"));
    store.add_project("Acme", Some(60.0)).unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..PER_WRITER)
                    .map(|i| {
                        let start = format!("{w:02}:{:02}", i * 2);
                        let end = format!("{w:02}:{:02}", i * 2 + 1);
                        store.save_entry(&entry("Acme", "2025-06-01", &start, &end, 0.25))
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for result in handle.join().unwrap() {
            match result {
                Ok(_) => {}
                Err(AppError::FileLocked) => panic!("writer saw its own store as locked"),
                Err(e) => panic!("save failed: {e}"),
            }
        }
    }

    assert_eq!(store.all_entries().unwrap().len(), WRITERS * PER_WRITER);

    // derived tables saw every commit
    let analytics = store.analytics().unwrap();
    assert_eq!(analytics.row("Acme").unwrap().cost, 0.25 * 60.0 * 160.0);
}

#[test]
fn reads_keep_working_while_a_timer_ticks() {
    let store = test_store("concurrent_timer_reads");
    store.start_timer("t1", "Acme").unwrap();

    // clones share the underlying connection
    let ticker = {
        let store = store.clone();
        thread::spawn(move || {
            for tick in 1..=50 {
                store.update_timer("t1", f64::from(tick)).unwrap();
            }
        })
    };
    let reader = {
        let store = store.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                let timers = store.timers().unwrap();
                assert_eq!(timers.len(), 1);
                store.ledger().unwrap();
            }
        })
    };

    ticker.join().unwrap();
    reader.join().unwrap();

    assert_eq!(store.timers().unwrap()[0].elapsed_time, 50.0);
}
