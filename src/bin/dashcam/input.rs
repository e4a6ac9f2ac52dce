//! Operator input sources for the selected `--io` mode.

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use dashcam::config::{AppConfig, IoMode, PinMap};
use dashcam::dispatch::TriggerLine;
use dashcam::gpio::SysfsButtons;
use dashcam::ipc::{spawn_stdin_input, EventFormat};
use dashcam::{log_debug, Dashcam};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Threads to join on the way out. The stdin reader is left detached since
/// it may be blocked in a read that never returns.
pub(crate) struct InputThreads {
    joinable: Vec<JoinHandle<()>>,
}

impl InputThreads {
    pub(crate) fn join(self) {
        for handle in self.joinable {
            if handle.join().is_err() {
                log_debug("input thread panicked");
            }
        }
    }
}

pub(crate) fn spawn_inputs(
    config: &AppConfig,
    pins: &PinMap,
    dashcam: &Arc<Dashcam>,
    shutdown: Receiver<()>,
) -> Result<InputThreads> {
    let format = match config.io {
        IoMode::Console => EventFormat::Console,
        IoMode::Json => EventFormat::Json,
        IoMode::Gpio => return spawn_buttons(config, pins, dashcam, shutdown),
    };
    spawn_stdin_input(Arc::clone(dashcam), format).context("failed to spawn input thread")?;
    Ok(InputThreads {
        joinable: Vec::new(),
    })
}

fn spawn_buttons(
    config: &AppConfig,
    pins: &PinMap,
    dashcam: &Arc<Dashcam>,
    shutdown: Receiver<()>,
) -> Result<InputThreads> {
    let buttons = SysfsButtons::open(
        &config.gpio_root,
        &[
            (pins.button_copy, TriggerLine::Copy),
            (pins.button_power, TriggerLine::Power),
            (pins.button_stop, TriggerLine::Stop),
            (pins.button_info, TriggerLine::Info),
        ],
    )
    .context("failed to open GPIO buttons")?;
    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    let poller = buttons
        .spawn(events_tx, shutdown)
        .context("failed to spawn button poller")?;
    let dispatcher = dashcam
        .dispatcher()
        .spawn(events_rx)
        .context("failed to spawn dispatcher")?;
    Ok(InputThreads {
        joinable: vec![poller, dispatcher],
    })
}
