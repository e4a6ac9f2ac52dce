use super::OutputLine;
use crate::lock_or_recover;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineOp {
    On,
    Off,
    Duty(u8),
}

/// Output line that remembers every call.
#[derive(Default)]
pub(crate) struct MemoryLine {
    ops: Mutex<Vec<LineOp>>,
}

impl MemoryLine {
    pub(crate) fn ops(&self) -> Vec<LineOp> {
        lock_or_recover(&self.ops, "memory line").clone()
    }

    pub(crate) fn take(&self) -> Vec<LineOp> {
        std::mem::take(&mut *lock_or_recover(&self.ops, "memory line"))
    }

    /// Level after the last call, as a lamp would show it.
    pub(crate) fn lit(&self) -> bool {
        match self.ops().last() {
            Some(LineOp::On) => true,
            Some(LineOp::Duty(percent)) => *percent > 0,
            _ => false,
        }
    }

    fn push(&self, op: LineOp) {
        lock_or_recover(&self.ops, "memory line").push(op);
    }
}

impl OutputLine for MemoryLine {
    fn set_on(&self) {
        self.push(LineOp::On);
    }

    fn set_off(&self) {
        self.push(LineOp::Off);
    }

    fn set_duty_cycle(&self, percent: u8) {
        self.push(LineOp::Duty(percent));
    }
}
