//! Maps physical trigger lines to the four logical recorder actions.

#[cfg(test)]
mod tests;

use crate::log_debug;
use crate::storage::IncidentReport;
use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::thread;

/// Physical buttons wired to the recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerLine {
    Copy,
    Power,
    Stop,
    Info,
}

impl TriggerLine {
    pub fn action(self) -> Action {
        match self {
            TriggerLine::Copy => Action::Preserve,
            TriggerLine::Power => Action::Start,
            TriggerLine::Stop => Action::Stop,
            TriggerLine::Info => Action::CycleInfoMode,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TriggerLine::Copy => "copy",
            TriggerLine::Power => "power",
            TriggerLine::Stop => "stop",
            TriggerLine::Info => "info",
        }
    }
}

/// Buttons are active-low: `Low` is a press, `High` a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEvent {
    pub line: TriggerLine,
    pub level: Level,
}

impl TriggerEvent {
    pub fn pressed(line: TriggerLine) -> Self {
        Self {
            line,
            level: Level::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Preserve,
    CycleInfoMode,
}

/// What an action actually did; repeated presses mostly land in the no-op arms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Started,
    AlreadyActive,
    /// The encoder or its worker could not be brought up.
    StartFailed(String),
    Stopping,
    NotRecording,
    Preserved(IncidentReport),
    PreserveFailed(String),
    InfoMode(u8),
}

/// Receiver of logical actions. Each action is responsible for ignoring
/// presses that make no sense in the current state.
pub trait ActionHandler: Send + Sync {
    fn perform(&self, action: Action) -> ActionOutcome;
}

pub struct InputDispatcher<H: ActionHandler> {
    handler: Arc<H>,
}

impl<H: ActionHandler> Clone for InputDispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<H: ActionHandler + 'static> InputDispatcher<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self { handler }
    }

    /// Run the bound action synchronously. Releases are ignored.
    pub fn dispatch(&self, event: TriggerEvent) -> Option<ActionOutcome> {
        if event.level != Level::Low {
            return None;
        }
        let action = event.line.action();
        log_debug(&format!("button '{}' -> {action:?}", event.line.label()));
        let outcome = self.handler.perform(action);
        tracing::info!(line = event.line.label(), ?action, ?outcome, "action");
        Some(outcome)
    }

    /// Drain trigger events one at a time until every sender is gone.
    pub fn spawn(self, events: Receiver<TriggerEvent>) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("dispatcher".to_string())
            .spawn(move || {
                for event in events.iter() {
                    self.dispatch(event);
                }
            })
    }
}
