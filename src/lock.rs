use std::sync::{Mutex, MutexGuard};

/// Lock a shared cell, taking the inner value back if another thread panicked
/// while holding it. Every loop in the recorder must survive a sibling panic.
pub(crate) fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            crate::log_debug(&format!("{context} lock poisoned; recovering"));
            poisoned.into_inner()
        }
    }
}
