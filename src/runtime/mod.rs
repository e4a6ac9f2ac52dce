//! Process-level wiring: shared cells, background loops, and the action
//! handler the input sources drive.

mod registry;

use crate::camera::Camera;
use crate::config::DashcamSettings;
use crate::dispatch::{Action, ActionHandler, ActionOutcome, InputDispatcher};
use crate::indicator::{warning_blink, IndicatorCoordinator, IndicatorLines, InfoMode};
use crate::log_debug;
use crate::recorder::{RecordingController, RecordingState, RecordingStateCell, SegmentCursor};
use crate::segment::{RunSalt, SegmentLayout};
use crate::storage::{run_cleanup_loop, IncidentPreserver, SegmentStore};
use anyhow::{Context, Result};
use registry::ThreadRegistry;
use std::sync::Arc;

const CLEANUP_THREAD: &str = "cleanup";
const INDICATOR_THREAD: &str = "indicator";

/// The four button actions, bound to the recorder and the preserver.
pub struct DashcamCore {
    controller: RecordingController,
    preserver: IncidentPreserver,
    info_mode: Arc<InfoMode>,
}

impl DashcamCore {
    pub fn controller(&self) -> &RecordingController {
        &self.controller
    }
}

impl ActionHandler for DashcamCore {
    fn perform(&self, action: Action) -> ActionOutcome {
        match action {
            Action::Start => match self.controller.start() {
                Ok(true) => ActionOutcome::Started,
                Ok(false) => ActionOutcome::AlreadyActive,
                Err(err) => ActionOutcome::StartFailed(format!("{err:#}")),
            },
            Action::Stop => {
                if self.controller.stop() {
                    ActionOutcome::Stopping
                } else {
                    ActionOutcome::NotRecording
                }
            }
            Action::Preserve => match self.preserver.preserve() {
                Ok(report) => ActionOutcome::Preserved(report),
                Err(err) => ActionOutcome::PreserveFailed(format!("{err:#}")),
            },
            Action::CycleInfoMode => ActionOutcome::InfoMode(self.info_mode.cycle()),
        }
    }
}

/// Point-in-time view for status queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashcamStatus {
    pub run_id: String,
    pub state: RecordingState,
    pub segment: Option<String>,
    pub info_mode: u8,
}

/// Lets an input thread end the process while the main thread sits in
/// [`Dashcam::wait`].
#[derive(Clone)]
pub struct ShutdownHandle {
    core: Arc<DashcamCore>,
    threads: Arc<ThreadRegistry>,
}

impl ShutdownHandle {
    pub fn request(&self) {
        log_debug("shutdown requested");
        self.core.controller.shutdown();
        self.threads.cancel();
    }
}

pub struct Dashcam {
    settings: DashcamSettings,
    layout: Arc<SegmentLayout>,
    state: Arc<RecordingStateCell>,
    cursor: Arc<SegmentCursor>,
    info_mode: Arc<InfoMode>,
    store: Arc<SegmentStore>,
    lines: IndicatorLines,
    core: Arc<DashcamCore>,
    threads: Arc<ThreadRegistry>,
}

impl Dashcam {
    /// Wire the engine for one run. Generates the run salt; touches no files.
    pub fn new(
        settings: DashcamSettings,
        camera: Box<dyn Camera>,
        lines: IndicatorLines,
    ) -> Result<Self> {
        let salt = RunSalt::generate(settings.salt_bytes);
        let layout = Arc::new(
            SegmentLayout::new(&settings.prefix, settings.format, salt)
                .context("invalid segment naming")?,
        );
        let state = Arc::new(RecordingStateCell::default());
        let cursor = Arc::new(SegmentCursor::default());
        let info_mode = Arc::new(InfoMode::default());
        let store = Arc::new(SegmentStore::new(
            settings.storage_path.clone(),
            Arc::clone(&layout),
            settings.window,
        ));
        let controller = RecordingController::new(
            camera,
            Arc::clone(&state),
            Arc::clone(&cursor),
            Arc::clone(&layout),
            Arc::clone(&lines.power),
            Arc::clone(&lines.info),
            settings.clone(),
        );
        let preserver = IncidentPreserver::new(
            Arc::clone(&store),
            Arc::clone(&cursor),
            Arc::clone(&lines.copy),
            settings.timings.clone(),
        );
        let core = Arc::new(DashcamCore {
            controller,
            preserver,
            info_mode: Arc::clone(&info_mode),
        });
        log_debug(&format!("dashcam run id {}", layout.salt()));
        Ok(Self {
            settings,
            layout,
            state,
            cursor,
            info_mode,
            store,
            lines,
            core,
            threads: Arc::new(ThreadRegistry::new()),
        })
    }

    /// The per-run salt embedded in every segment name.
    pub fn run_id(&self) -> &str {
        self.layout.salt().as_str()
    }

    pub fn settings(&self) -> &DashcamSettings {
        &self.settings
    }

    pub fn core(&self) -> Arc<DashcamCore> {
        Arc::clone(&self.core)
    }

    pub fn dispatcher(&self) -> InputDispatcher<DashcamCore> {
        InputDispatcher::new(self.core())
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            core: self.core(),
            threads: Arc::clone(&self.threads),
        }
    }

    /// Create the storage directories and start the cleanup and indicator
    /// loops. A storage failure shows the warning pattern before returning.
    pub fn launch(&self) -> Result<()> {
        if let Err(err) = self.store.prepare() {
            log_debug(&format!("storage unavailable: {err:#}"));
            tracing::error!(error = %format!("{err:#}"), "storage_unavailable");
            warning_blink(self.lines.info.as_ref(), &self.settings.timings);
            return Err(err);
        }

        let store = Arc::clone(&self.store);
        let period = self.settings.timings.segment;
        self.threads
            .spawn(CLEANUP_THREAD, move |shutdown| {
                run_cleanup_loop(&store, period, &shutdown)
            })
            .context("failed to spawn cleanup thread")?;

        let coordinator = IndicatorCoordinator::new(
            &self.lines,
            Arc::clone(&self.state),
            Arc::clone(&self.info_mode),
            self.settings.led_dim_percent,
            self.settings.timings.clone(),
        );
        self.threads
            .spawn(INDICATOR_THREAD, move |shutdown| coordinator.run(shutdown))
            .context("failed to spawn indicator thread")?;
        tracing::info!(run_id = self.run_id(), "dashcam_launched");
        Ok(())
    }

    /// Same as pressing the start button. `Ok(false)` means already active.
    pub fn start_recording(&self) -> Result<bool> {
        self.core.controller.start()
    }

    pub fn status(&self) -> DashcamStatus {
        DashcamStatus {
            run_id: self.run_id().to_string(),
            state: self.state.load(),
            segment: self.cursor.current(),
            info_mode: self.info_mode.get(),
        }
    }

    /// Block on the cleanup thread, which only returns after a shutdown request.
    pub fn wait(&self) {
        if let Some(handle) = self.threads.take(CLEANUP_THREAD) {
            if handle.join().is_err() {
                log_debug("cleanup thread panicked");
            }
        }
    }

    /// Stop recording, cancel the loops and join everything.
    pub fn shutdown(&self) {
        self.shutdown_handle().request();
        self.threads.join_all();
        log_debug("dashcam stopped");
    }
}
