use super::state::{RecordingState, RecordingStateCell, SegmentCursor};
use crate::camera::Camera;
use crate::config::{Timings, VideoFormat};
use crate::gpio::OutputLine;
use crate::indicator::warning_blink;
use crate::segment::SegmentLayout;
use crate::{lock_or_recover, log_debug};
use anyhow::Result;
use crossbeam_channel::Sender;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub(super) struct WorkerContext {
    pub(super) camera: Arc<Mutex<Box<dyn Camera>>>,
    pub(super) state: Arc<RecordingStateCell>,
    pub(super) cursor: Arc<SegmentCursor>,
    pub(super) layout: Arc<SegmentLayout>,
    pub(super) sequence: Arc<AtomicU64>,
    pub(super) info_line: Arc<dyn OutputLine>,
    pub(super) timings: Timings,
    pub(super) storage: PathBuf,
    pub(super) format: VideoFormat,
    pub(super) bitrate: u32,
    /// Answered exactly once: whether the first segment opened.
    pub(super) started: Sender<Result<()>>,
}

/// Returns the shared cells to "nothing recording" however the worker exits,
/// panics included.
struct ExitGuard {
    state: Arc<RecordingStateCell>,
    cursor: Arc<SegmentCursor>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        self.cursor.clear();
        self.state.store(RecordingState::Off);
    }
}

pub(super) fn run(ctx: WorkerContext) {
    let _exit = ExitGuard {
        state: Arc::clone(&ctx.state),
        cursor: Arc::clone(&ctx.cursor),
    };
    let mut camera = lock_or_recover(&ctx.camera, "camera");

    if let Err(err) = open_first(&mut **camera, &ctx) {
        log_debug(&format!("encoder unavailable: {err:#}"));
        tracing::error!(error = %format!("{err:#}"), "encoder_unavailable");
        if let Err(err) = camera.stop() {
            log_debug(&format!("encoder stop after failed start also failed: {err:#}"));
        }
        warning_blink(ctx.info_line.as_ref(), &ctx.timings);
        let _ = ctx.started.send(Err(err));
        return;
    }
    let _ = ctx.started.send(Ok(()));

    match rotate(&mut **camera, &ctx) {
        Ok(()) => log_debug("Recording stopped."),
        Err(err) => {
            log_debug(&format!("recorder stopped after encoder error: {err:#}"));
            tracing::warn!(error = %format!("{err:#}"), "recorder_failed");
            if let Err(err) = camera.stop() {
                log_debug(&format!("encoder stop after failure also failed: {err:#}"));
            }
        }
    }
}

fn open_first(camera: &mut dyn Camera, ctx: &WorkerContext) -> Result<()> {
    let sequence = ctx.sequence.fetch_add(1, Ordering::SeqCst);
    let name = ctx.layout.next_name(sequence);
    let path = ctx.storage.join(&name);
    log_debug(&format!("Recording to '{}'.", path.display()));
    camera.start(&path, ctx.format, ctx.bitrate)?;
    ctx.cursor.publish(&name);
    tracing::info!(segment = %name, sequence, "segment_started");
    Ok(())
}

fn rotate(camera: &mut dyn Camera, ctx: &WorkerContext) -> Result<()> {
    camera.wait(ctx.timings.segment)?;

    while ctx.state.load() == RecordingState::Recording {
        let sequence = ctx.sequence.fetch_add(1, Ordering::SeqCst);
        let name = ctx.layout.next_name(sequence);
        let path = ctx.storage.join(&name);
        log_debug(&format!("Recording to '{}'.", path.display()));
        camera.split(&path)?;
        // Publish only after the hand-off: the previous file is now final and
        // the new one exists.
        ctx.cursor.publish(&name);
        tracing::info!(segment = %name, sequence, "segment_rotated");
        camera.wait(ctx.timings.segment)?;
    }

    camera.stop()
}
