use super::SegmentStore;
use crate::log_debug;
use crate::segment::select_legal;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::time::Duration;

/// Extra slot kept past the window so the segment being written is never a
/// deletion candidate.
pub const CLEANUP_BUFFER: usize = 1;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Segments inside the window after this cycle.
    pub kept: usize,
    pub deleted: Vec<String>,
    /// Already gone when we tried to delete them.
    pub vanished: Vec<String>,
    pub failed: Vec<String>,
}

/// One pass: delete every managed segment outside the window (+ buffer).
///
/// Only a failed directory listing is returned as an error; per-file problems
/// are logged and counted.
pub fn cleanup_cycle(store: &SegmentStore) -> io::Result<CleanupReport> {
    let _files = store.lock_files();
    let names = store.list_candidates()?;
    let legal = select_legal(store.layout(), &names, store.window(), CLEANUP_BUFFER);
    let keep: HashSet<&str> = legal.iter().map(|segment| segment.name.as_str()).collect();

    let mut report = CleanupReport {
        kept: legal.len(),
        ..CleanupReport::default()
    };
    for name in &names {
        if keep.contains(name.as_str()) || store.layout().parse(name).is_none() {
            continue;
        }
        let path = store.segment_path(name);
        match fs::remove_file(&path) {
            Ok(()) => {
                log_debug(&format!("DELETE file '{}'", path.display()));
                tracing::info!(segment = %name, "segment_deleted");
                report.deleted.push(name.clone());
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log_debug(&format!("file '{}' is already gone", path.display()));
                report.vanished.push(name.clone());
            }
            Err(err) => {
                log_debug(&format!("failed to delete '{}': {err}", path.display()));
                tracing::warn!(segment = %name, error = %err, "segment_delete_failed");
                report.failed.push(name.clone());
            }
        }
    }
    Ok(report)
}

/// Clean once per `period` until `shutdown` fires or its sender is dropped.
pub fn run_cleanup_loop(store: &SegmentStore, period: Duration, shutdown: &Receiver<()>) {
    loop {
        if let Err(err) = cleanup_cycle(store) {
            log_debug(&format!(
                "cleanup listing of {} failed: {err}",
                store.root().display()
            ));
            tracing::warn!(error = %err, "cleanup_failed");
        }
        match shutdown.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    log_debug("cleanup loop stopped");
}
