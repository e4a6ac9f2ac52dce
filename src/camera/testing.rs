use super::Camera;
use crate::config::VideoFormat;
use crate::lock_or_recover;
use crate::recorder::SegmentCursor;
use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CameraOp {
    Start(PathBuf),
    /// New path plus the name the cursor showed while the split ran.
    Split(PathBuf, Option<String>),
    Stop,
}

/// Encoder double: touches the segment files and logs every call.
pub(crate) struct FakeCamera {
    ops: Arc<Mutex<Vec<CameraOp>>>,
    cursor: Option<Arc<SegmentCursor>>,
    fail_start: bool,
    fail_split_after: Option<usize>,
    splits: usize,
}

impl FakeCamera {
    pub(crate) fn new() -> (Self, Arc<Mutex<Vec<CameraOp>>>) {
        let ops = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                ops: Arc::clone(&ops),
                cursor: None,
                fail_start: false,
                fail_split_after: None,
                splits: 0,
            },
            ops,
        )
    }

    pub(crate) fn watching(mut self, cursor: Arc<SegmentCursor>) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Encoder that never opens, like a camera that is unplugged or busy.
    pub(crate) fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub(crate) fn failing_split_after(mut self, splits: usize) -> Self {
        self.fail_split_after = Some(splits);
        self
    }

    fn push(&self, op: CameraOp) {
        lock_or_recover(&self.ops, "fake camera").push(op);
    }
}

impl Camera for FakeCamera {
    fn start(&mut self, path: &Path, _format: VideoFormat, _bitrate: u32) -> Result<()> {
        if self.fail_start {
            bail!("fake encoder unavailable");
        }
        fs::write(path, b"segment")?;
        self.push(CameraOp::Start(path.to_path_buf()));
        Ok(())
    }

    fn split(&mut self, path: &Path) -> Result<()> {
        if self.fail_split_after == Some(self.splits) {
            bail!("fake encoder failure");
        }
        self.splits += 1;
        fs::write(path, b"segment")?;
        let seen = self.cursor.as_ref().and_then(|cursor| cursor.current());
        self.push(CameraOp::Split(path.to_path_buf(), seen));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.push(CameraOp::Stop);
        Ok(())
    }

    fn wait(&mut self, duration: Duration) -> Result<()> {
        thread::sleep(duration);
        Ok(())
    }
}
