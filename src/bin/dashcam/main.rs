//! Dashcam entrypoint: wires the recorder to its lamps and operator input,
//! starts recording, and stays alive on the cleanup thread.
//!
//! # Architecture
//!
//! - Recorder worker: splits the camera stream into segments
//! - Cleanup thread: keeps only the newest segments on disk
//! - Indicator thread: drives the power/info lamps
//! - Input thread(s): console or JSON commands, or polled GPIO buttons

mod input;

use anyhow::{Context, Result};
use dashcam::camera::SyntheticCamera;
use dashcam::config::{AppConfig, IoMode, PinMap};
use dashcam::gpio::{LogLine, OutputLine, SysfsLine};
use dashcam::indicator::IndicatorLines;
use dashcam::{init_logging, install_panic_hook, log_debug, log_file_path, Dashcam};
use std::sync::Arc;

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    install_panic_hook();
    log_debug("=== Dashcam Started ===");
    log_debug(&format!("Log file: {:?}", log_file_path()));

    let settings = config.dashcam_settings();
    let pins = config.pin_map();
    let lines = indicator_lines(&config, &pins)?;
    let camera = SyntheticCamera::new(settings.resolution, settings.framerate);
    let dashcam = Arc::new(Dashcam::new(settings, Box::new(camera), lines)?);
    log_debug(&format!("Run id: {}", dashcam.run_id()));
    dashcam.launch()?;

    // An encoder that cannot open at boot is fatal; the worker has already
    // shown the warning pattern by the time this returns.
    match dashcam.start_recording() {
        Ok(true) => {}
        Ok(false) => log_debug("auto start skipped, recorder already active"),
        Err(err) => {
            dashcam.shutdown();
            return Err(err);
        }
    }

    let (input_stop_tx, input_stop_rx) = crossbeam_channel::bounded::<()>(1);
    let inputs = input::spawn_inputs(&config, &pins, &dashcam, input_stop_rx)?;
    dashcam.wait();

    drop(input_stop_tx);
    dashcam.shutdown();
    inputs.join();
    log_debug("=== Dashcam Exiting ===");
    Ok(())
}

fn indicator_lines(config: &AppConfig, pins: &PinMap) -> Result<IndicatorLines> {
    if config.io != IoMode::Gpio {
        return Ok(IndicatorLines {
            power: Arc::new(LogLine::new("power")),
            info: Arc::new(LogLine::new("info")),
            copy: Arc::new(LogLine::new("copy")),
        });
    }
    let open = |pin: u32, name: &str| -> Result<Arc<dyn OutputLine>> {
        let line = SysfsLine::open(&config.gpio_root, pin)
            .with_context(|| format!("failed to open {name} LED on GPIO {pin}"))?;
        Ok(Arc::new(line))
    };
    Ok(IndicatorLines {
        power: open(pins.led_power, "power")?,
        info: open(pins.led_info, "info")?,
        copy: open(pins.led_copy, "copy")?,
    })
}
