use crate::lock_or_recover;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// No recorder worker exists.
    Off,
    /// The worker finishes its in-flight segment and then exits.
    Stopping,
    Recording,
}

impl RecordingState {
    pub fn label(self) -> &'static str {
        match self {
            RecordingState::Off => "off",
            RecordingState::Stopping => "stopping",
            RecordingState::Recording => "recording",
        }
    }

    fn to_raw(self) -> u8 {
        match self {
            RecordingState::Off => 0,
            RecordingState::Stopping => 1,
            RecordingState::Recording => 2,
        }
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            2 => RecordingState::Recording,
            1 => RecordingState::Stopping,
            _ => RecordingState::Off,
        }
    }
}

/// Recording state shared by the controller, the worker and the indicator loop.
#[derive(Debug)]
pub struct RecordingStateCell(AtomicU8);

impl Default for RecordingStateCell {
    fn default() -> Self {
        Self(AtomicU8::new(RecordingState::Off.to_raw()))
    }
}

impl RecordingStateCell {
    pub fn load(&self) -> RecordingState {
        RecordingState::from_raw(self.0.load(Ordering::SeqCst))
    }

    pub(crate) fn store(&self, state: RecordingState) {
        self.0.store(state.to_raw(), Ordering::SeqCst);
    }

    /// Move `from -> to`; false when the cell held something else.
    pub(crate) fn transition(&self, from: RecordingState, to: RecordingState) -> bool {
        self.0
            .compare_exchange(from.to_raw(), to.to_raw(), Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Name of the segment the encoder is currently writing.
///
/// Only ever set after the encoder has created the file, so a reader never
/// sees a name that is not on disk yet. Cleared once the encoder stops, which
/// also marks the last segment as finalized.
#[derive(Debug, Default)]
pub struct SegmentCursor {
    current: Mutex<Option<String>>,
    changed: Condvar,
}

impl SegmentCursor {
    pub fn current(&self) -> Option<String> {
        lock_or_recover(&self.current, "segment cursor").clone()
    }

    pub(crate) fn publish(&self, name: &str) {
        *lock_or_recover(&self.current, "segment cursor") = Some(name.to_string());
        self.changed.notify_all();
    }

    pub(crate) fn clear(&self) {
        *lock_or_recover(&self.current, "segment cursor") = None;
        self.changed.notify_all();
    }

    /// Block until the encoder has moved past `pending`. Wakes on every
    /// publish and at least every `poll` so a missed notification only costs
    /// one interval.
    pub fn wait_until_past(&self, pending: &str, poll: Duration) {
        let mut current = lock_or_recover(&self.current, "segment cursor");
        while current.as_deref() == Some(pending) {
            current = match self.changed.wait_timeout(current, poll) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }
}
