//! The segment directory and the two things that rewrite it.
//!
//! Cleanup and incident capture both decide what to touch from a fresh
//! listing, so they take the same file-state lock for the whole operation:
//! a preserve can never see a file that cleanup is about to delete.

mod cleanup;
mod incident;

use crate::lock_or_recover;
use crate::log_debug;
use crate::segment::{select_legal, SegmentDescriptor, SegmentLayout};
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

pub use cleanup::{cleanup_cycle, run_cleanup_loop, CleanupReport, CLEANUP_BUFFER};
pub use incident::{IncidentPreserver, IncidentReport, INCIDENT_PREFIX};

pub struct SegmentStore {
    root: PathBuf,
    incident_root: PathBuf,
    layout: Arc<SegmentLayout>,
    window: usize,
    file_state: Mutex<()>,
}

impl SegmentStore {
    pub fn new(root: impl Into<PathBuf>, layout: Arc<SegmentLayout>, window: usize) -> Self {
        let root = root.into();
        Self {
            incident_root: root.join("legal"),
            root,
            layout,
            window,
            file_state: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn incident_root(&self) -> &Path {
        &self.incident_root
    }

    pub fn layout(&self) -> &SegmentLayout {
        &self.layout
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn segment_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Create the segment and incident directories.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.root).with_context(|| {
            format!("failed to create storage directory {}", self.root.display())
        })?;
        fs::create_dir_all(&self.incident_root).with_context(|| {
            format!(
                "failed to create incident directory {}",
                self.incident_root.display()
            )
        })?;
        Ok(())
    }

    /// Regular files directly in the root that carry the segment extension.
    /// Whether they are actually managed is decided by the layout parser.
    pub fn list_candidates(&self) -> io::Result<Vec<String>> {
        let suffix = format!(".{}", self.layout.extension());
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log_debug(&format!("skipping unreadable directory entry: {err}"));
                    continue;
                }
            };
            match entry.file_type() {
                Ok(kind) if kind.is_file() => {}
                _ => continue,
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(&suffix) {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    /// Current legal window read from disk. Callers that act on the result
    /// must hold [`Self::lock_files`].
    pub fn legal_window(&self, buffer: usize) -> io::Result<Vec<SegmentDescriptor>> {
        let names = self.list_candidates()?;
        Ok(select_legal(&self.layout, &names, self.window, buffer))
    }

    pub(crate) fn lock_files(&self) -> MutexGuard<'_, ()> {
        lock_or_recover(&self.file_state, "segment file state")
    }
}
