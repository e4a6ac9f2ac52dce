//! Digital I/O collaborator: indicator output lines and button inputs.
//!
//! Duty cycle is treated as an opaque brightness knob; backends without PWM
//! map any non-zero duty to "on".

mod sysfs;
#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

pub use sysfs::{EdgeDetector, SysfsButtons, SysfsLine};

/// One indicator output. Implementations log their own I/O failures; an
/// indicator glitch must never stop recording.
pub trait OutputLine: Send + Sync {
    fn set_on(&self);
    fn set_off(&self);
    fn set_duty_cycle(&self, percent: u8);
}

/// Output line that only reports level changes to the trace log.
pub struct LogLine {
    name: &'static str,
}

impl LogLine {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl OutputLine for LogLine {
    fn set_on(&self) {
        tracing::debug!(line = self.name, level = 100u8, "indicator");
    }

    fn set_off(&self) {
        tracing::debug!(line = self.name, level = 0u8, "indicator");
    }

    fn set_duty_cycle(&self, percent: u8) {
        tracing::debug!(line = self.name, level = percent.min(100), "indicator");
    }
}
