use super::{log_debug, log_file_path, set_logging_for_tests};
use crate::lock_or_recover;
use std::fs;
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn log_debug_writes_file_when_enabled() {
    set_logging_for_tests(true);
    let marker = format!("segment-log-marker-{}", std::process::id());
    log_debug(&marker);
    let contents = fs::read_to_string(log_file_path()).unwrap_or_default();
    set_logging_for_tests(false);
    assert!(contents.contains(&marker));
}

#[test]
fn poisoned_lock_is_recovered() {
    let shared = Arc::new(Mutex::new(7u32));
    let poisoner = Arc::clone(&shared);
    let _ = thread::spawn(move || {
        let _guard = poisoner.lock().unwrap();
        panic!("poison the lock");
    })
    .join();
    assert!(shared.is_poisoned());
    assert_eq!(*lock_or_recover(&shared, "test value"), 7);
}
