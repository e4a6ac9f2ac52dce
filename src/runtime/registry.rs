use crate::{lock_or_recover, log_debug};
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

/// Named background threads plus the channel that cancels them.
///
/// Nothing is ever sent on the shutdown channel; dropping the sender
/// disconnects every receiver, which the loops treat as "stop".
pub(crate) struct ThreadRegistry {
    shutdown_tx: Mutex<Option<Sender<()>>>,
    shutdown_rx: Receiver<()>,
    handles: Mutex<Vec<(String, JoinHandle<()>)>>,
}

impl ThreadRegistry {
    pub(crate) fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
        Self {
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            shutdown_rx,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Spawn `body` on a named thread, handing it a shutdown receiver.
    pub(crate) fn spawn<F>(&self, name: &str, body: F) -> io::Result<()>
    where
        F: FnOnce(Receiver<()>) + Send + 'static,
    {
        let shutdown = self.shutdown_rx.clone();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || body(shutdown))?;
        lock_or_recover(&self.handles, "thread registry").push((name.to_string(), handle));
        Ok(())
    }

    /// Remove a handle so the caller can join it without holding the registry.
    pub(crate) fn take(&self, name: &str) -> Option<JoinHandle<()>> {
        let mut handles = lock_or_recover(&self.handles, "thread registry");
        let index = handles.iter().position(|(entry, _)| entry == name)?;
        Some(handles.remove(index).1)
    }

    pub(crate) fn cancel(&self) {
        lock_or_recover(&self.shutdown_tx, "shutdown signal").take();
    }

    pub(crate) fn join_all(&self) {
        let handles = std::mem::take(&mut *lock_or_recover(&self.handles, "thread registry"));
        for (name, handle) in handles {
            if handle.join().is_err() {
                log_debug(&format!("{name} thread panicked"));
            }
        }
    }
}
