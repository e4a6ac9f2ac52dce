//! Recording state machine and the segment-splitting worker it drives.
//!
//! ```text
//! OFF --start--> RECORDING --stop--> STOPPING --(in-flight segment ends)--> OFF
//! ```
//!
//! Start and stop are serialized by one transition lock; only a start while
//! OFF spawns a worker, so at most one worker ever owns the encoder. A start
//! only reports success once the encoder has opened its first segment.

mod state;
mod worker;

use crate::camera::Camera;
use crate::config::DashcamSettings;
use crate::gpio::OutputLine;
use crate::segment::SegmentLayout;
use crate::{lock_or_recover, log_debug};
use anyhow::{anyhow, Context, Result};
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub use state::{RecordingState, RecordingStateCell, SegmentCursor};

pub struct RecordingController {
    camera: Arc<Mutex<Box<dyn Camera>>>,
    state: Arc<RecordingStateCell>,
    cursor: Arc<SegmentCursor>,
    layout: Arc<SegmentLayout>,
    power_line: Arc<dyn OutputLine>,
    info_line: Arc<dyn OutputLine>,
    settings: DashcamSettings,
    /// Next unused sequence number; survives stop/start so names never repeat in a run.
    sequence: Arc<AtomicU64>,
    transition: Mutex<()>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RecordingController {
    pub fn new(
        camera: Box<dyn Camera>,
        state: Arc<RecordingStateCell>,
        cursor: Arc<SegmentCursor>,
        layout: Arc<SegmentLayout>,
        power_line: Arc<dyn OutputLine>,
        info_line: Arc<dyn OutputLine>,
        settings: DashcamSettings,
    ) -> Self {
        Self {
            camera: Arc::new(Mutex::new(camera)),
            state,
            cursor,
            layout,
            power_line,
            info_line,
            settings,
            sequence: Arc::new(AtomicU64::new(0)),
            transition: Mutex::new(()),
            worker: Mutex::new(None),
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state.load()
    }

    /// Spawn the recorder worker if nothing is recording.
    ///
    /// Returns `Ok(false)` when the recorder is already active and an error
    /// when the encoder could not open its first segment; the worker shows the
    /// warning pattern on the info line before that error comes back.
    ///
    /// Holds the transition lock for the whole start-confirmation delay, so a
    /// stop pressed right after start waits instead of racing the spawn.
    pub fn start(&self) -> Result<bool> {
        let _transition = lock_or_recover(&self.transition, "recording transition");
        if self.state.load() != RecordingState::Off {
            log_debug(&format!(
                "start ignored, recorder is {}",
                self.state.load().label()
            ));
            return Ok(false);
        }

        let mut worker = lock_or_recover(&self.worker, "recorder worker");
        if let Some(previous) = worker.take() {
            // The old worker already reported OFF; this only reaps the thread.
            if previous.join().is_err() {
                log_debug("previous recorder worker panicked");
            }
        }

        if !self
            .state
            .transition(RecordingState::Off, RecordingState::Recording)
        {
            return Ok(false);
        }
        let (started_tx, started_rx) = crossbeam_channel::bounded(1);
        let ctx = worker::WorkerContext {
            camera: Arc::clone(&self.camera),
            state: Arc::clone(&self.state),
            cursor: Arc::clone(&self.cursor),
            layout: Arc::clone(&self.layout),
            sequence: Arc::clone(&self.sequence),
            info_line: Arc::clone(&self.info_line),
            timings: self.settings.timings.clone(),
            storage: self.settings.storage_path.clone(),
            format: self.settings.format,
            bitrate: self.settings.bitrate,
            started: started_tx,
        };
        let handle = match thread::Builder::new()
            .name("recorder".to_string())
            .spawn(move || worker::run(ctx))
        {
            Ok(handle) => handle,
            Err(err) => {
                self.state.store(RecordingState::Off);
                return Err(err).context("failed to spawn recorder worker");
            }
        };

        let opened = started_rx
            .recv()
            .unwrap_or_else(|_| Err(anyhow!("recorder worker exited before the encoder opened")));
        if let Err(err) = opened {
            // The worker is already on its way out; joining leaves the state OFF.
            if handle.join().is_err() {
                log_debug("recorder worker panicked during start");
            }
            return Err(err).context("encoder failed to start");
        }
        *worker = Some(handle);
        drop(worker);

        tracing::info!(state = "recording", "recording_state");
        self.power_line
            .set_duty_cycle(self.settings.led_dim_percent);
        thread::sleep(self.settings.timings.start_confirm);
        Ok(true)
    }

    /// Ask the worker to finish its in-flight segment and stop.
    pub fn stop(&self) -> bool {
        let _transition = lock_or_recover(&self.transition, "recording transition");
        if !self
            .state
            .transition(RecordingState::Recording, RecordingState::Stopping)
        {
            log_debug(&format!(
                "stop ignored, recorder is {}",
                self.state.load().label()
            ));
            return false;
        }
        tracing::info!(state = "stopping", "recording_state");
        self.power_line.set_off();
        true
    }

    /// Stop and wait for the worker to release the encoder.
    pub fn shutdown(&self) {
        self.stop();
        let handle = lock_or_recover(&self.worker, "recorder worker").take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                log_debug("recorder worker panicked during shutdown");
            }
        }
    }

    /// Wait until the worker has gone back to OFF, polling every `poll`.
    pub fn wait_until_off(&self, poll: Duration) {
        while self.state.load() != RecordingState::Off {
            thread::sleep(poll);
        }
    }
}
