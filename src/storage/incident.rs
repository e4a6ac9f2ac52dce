use super::SegmentStore;
use crate::config::Timings;
use crate::gpio::OutputLine;
use crate::indicator::feedback_blink;
use crate::log_debug;
use crate::recorder::SegmentCursor;
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Prepended to every preserved copy.
pub const INCIDENT_PREFIX: &str = "INCIDENT_";

/// Outcome of one incident capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentReport {
    pub folder: PathBuf,
    /// Source names copied, in copy order.
    pub copied: Vec<String>,
    /// Window members that were gone by the time we copied them.
    pub missing: Vec<String>,
    pub failed: Vec<String>,
    /// In-flight segment that was copied only after the recorder rotated past it.
    pub waited_for: Option<String>,
}

/// Copies the legal window into a fresh folder under `<storage>/legal`.
pub struct IncidentPreserver {
    store: Arc<SegmentStore>,
    cursor: Arc<SegmentCursor>,
    feedback: Arc<dyn OutputLine>,
    timings: Timings,
}

impl IncidentPreserver {
    pub fn new(
        store: Arc<SegmentStore>,
        cursor: Arc<SegmentCursor>,
        feedback: Arc<dyn OutputLine>,
        timings: Timings,
    ) -> Self {
        Self {
            store,
            cursor,
            feedback,
            timings,
        }
    }

    /// Preserve the window as it is right now, including the segment still
    /// being written.
    ///
    /// The file-state lock is held for the whole call, the finalize wait
    /// included; the recorder publishes names without it, so the wait always
    /// ends once the current segment rotates or recording stops.
    pub fn preserve(&self) -> Result<IncidentReport> {
        let _files = self.store.lock_files();
        self.feedback.set_on();
        let result = self.preserve_locked();
        match &result {
            Ok(report) => {
                log_debug("Copy done.");
                tracing::info!(
                    folder = %report.folder.display(),
                    copied = report.copied.len(),
                    missing = report.missing.len(),
                    failed = report.failed.len(),
                    "incident_preserved"
                );
                feedback_blink(self.feedback.as_ref(), &self.timings);
            }
            Err(err) => {
                log_debug(&format!("incident capture failed: {err:#}"));
                tracing::warn!(error = %format!("{err:#}"), "incident_failed");
            }
        }
        self.feedback.set_off();
        result
    }

    fn preserve_locked(&self) -> Result<IncidentReport> {
        let window = self
            .store
            .legal_window(0)
            .with_context(|| format!("failed to list {}", self.store.root().display()))?;

        let epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        // A second capture within the same second reuses the folder.
        let folder = self.store.incident_root().join(format!("{epoch}_utc"));
        fs::create_dir_all(&folder)
            .with_context(|| format!("failed to create incident folder {}", folder.display()))?;

        let mut names: Vec<String> = window.into_iter().map(|segment| segment.name).collect();
        let pending = self
            .cursor
            .current()
            .filter(|current| names.iter().any(|name| name == current));
        if let Some(current) = &pending {
            names.retain(|name| name != current);
        }

        let mut report = IncidentReport {
            folder,
            copied: Vec::new(),
            missing: Vec::new(),
            failed: Vec::new(),
            waited_for: pending.clone(),
        };
        for name in &names {
            self.copy_one(name, &mut report);
        }

        if let Some(current) = pending {
            log_debug(&format!("waiting for '{current}' to be finalized"));
            self.cursor
                .wait_until_past(&current, self.timings.finalize_poll);
            self.copy_one(&current, &mut report);
        }
        Ok(report)
    }

    fn copy_one(&self, name: &str, report: &mut IncidentReport) {
        let src = self.store.segment_path(name);
        let dst = report.folder.join(format!("{INCIDENT_PREFIX}{name}"));
        match copy_segment(&src, &dst) {
            Ok(()) => report.copied.push(name.to_string()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log_debug(&format!("file '{}' is gone, skipping", src.display()));
                report.missing.push(name.to_string());
            }
            Err(err) => {
                log_debug(&format!("failed to copy '{}': {err}", src.display()));
                tracing::warn!(segment = %name, error = %err, "incident_copy_failed");
                report.failed.push(name.to_string());
            }
        }
    }
}

fn copy_segment(src: &Path, dst: &Path) -> io::Result<()> {
    log_debug(&format!("Copy '{}' to '{}'.", src.display(), dst.display()));
    fs::copy(src, dst)?;
    Ok(())
}
