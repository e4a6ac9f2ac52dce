use super::OutputLine;
use crate::dispatch::{TriggerEvent, TriggerLine};
use crate::log_debug;
use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

const BUTTON_POLL_INTERVAL: Duration = Duration::from_millis(10);
const BUTTON_DEBOUNCE: Duration = Duration::from_millis(50);

/// Export `pin` under `root` if needed and set its direction.
fn export_pin(root: &Path, pin: u32, direction: &str) -> Result<PathBuf> {
    let pin_dir = root.join(format!("gpio{pin}"));
    if !pin_dir.exists() {
        fs::write(root.join("export"), pin.to_string())
            .with_context(|| format!("failed to export GPIO {pin} via '{}'", root.display()))?;
    }
    fs::write(pin_dir.join("direction"), direction)
        .with_context(|| format!("failed to set GPIO {pin} direction to {direction}"))?;
    Ok(pin_dir.join("value"))
}

/// LED driven through `/sys/class/gpio/gpioN/value`.
pub struct SysfsLine {
    pin: u32,
    value_path: PathBuf,
    write_failed: AtomicBool,
}

impl SysfsLine {
    pub fn open(root: &Path, pin: u32) -> Result<Self> {
        let value_path = export_pin(root, pin, "out")?;
        let line = Self {
            pin,
            value_path,
            write_failed: AtomicBool::new(false),
        };
        line.write("0");
        Ok(line)
    }

    fn write(&self, value: &str) {
        match fs::write(&self.value_path, value) {
            Ok(()) => {
                if self.write_failed.swap(false, Ordering::Relaxed) {
                    log_debug(&format!("GPIO {} writable again", self.pin));
                }
            }
            Err(err) => {
                // Report once per failure streak, the indicator loop retries every tick.
                if !self.write_failed.swap(true, Ordering::Relaxed) {
                    log_debug(&format!("GPIO {} write failed: {err}", self.pin));
                }
            }
        }
    }
}

impl OutputLine for SysfsLine {
    fn set_on(&self) {
        self.write("1");
    }

    fn set_off(&self) {
        self.write("0");
    }

    fn set_duty_cycle(&self, percent: u8) {
        self.write(if percent > 0 { "1" } else { "0" });
    }
}

/// Press detection for one active-low button: a press is a high-to-low
/// transition at least `debounce` after the previous accepted press.
#[derive(Debug)]
pub struct EdgeDetector {
    debounce: Duration,
    last_high: bool,
    last_press: Option<Instant>,
}

impl EdgeDetector {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            last_high: true,
            last_press: None,
        }
    }

    pub fn sample(&mut self, high: bool, now: Instant) -> bool {
        let falling = self.last_high && !high;
        self.last_high = high;
        if !falling {
            return false;
        }
        if let Some(previous) = self.last_press {
            if now.duration_since(previous) < self.debounce {
                return false;
            }
        }
        self.last_press = Some(now);
        true
    }
}

struct ButtonInput {
    line: TriggerLine,
    value_path: PathBuf,
    detector: EdgeDetector,
}

/// Button bank polled through sysfs value files.
pub struct SysfsButtons {
    inputs: Vec<ButtonInput>,
}

impl SysfsButtons {
    pub fn open(root: &Path, pins: &[(u32, TriggerLine)]) -> Result<Self> {
        let mut inputs = Vec::with_capacity(pins.len());
        for (pin, line) in pins {
            let value_path = export_pin(root, *pin, "in")?;
            inputs.push(ButtonInput {
                line: *line,
                value_path,
                detector: EdgeDetector::new(BUTTON_DEBOUNCE),
            });
        }
        Ok(Self { inputs })
    }

    /// Poll every button until `shutdown` disconnects or the receiver of
    /// `events` goes away.
    pub fn spawn(
        mut self,
        events: Sender<TriggerEvent>,
        shutdown: Receiver<()>,
    ) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("buttons".to_string())
            .spawn(move || loop {
                let now = Instant::now();
                for input in &mut self.inputs {
                    let high = match fs::read_to_string(&input.value_path) {
                        Ok(raw) => raw.trim() != "0",
                        Err(_) => continue,
                    };
                    if input.detector.sample(high, now)
                        && events.send(TriggerEvent::pressed(input.line)).is_err()
                    {
                        return;
                    }
                }
                match shutdown.recv_timeout(BUTTON_POLL_INTERVAL) {
                    Err(RecvTimeoutError::Timeout) => {}
                    _ => return,
                }
            })
    }
}
