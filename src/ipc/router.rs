use super::protocol::{IpcCommand, IpcEvent};
use crate::dispatch::{ActionOutcome, TriggerEvent, TriggerLine};
use crate::runtime::Dashcam;
use crate::storage::IncidentReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    Continue,
    Quit,
}

// ============================================================================
// Input Parsing
// ============================================================================

/// One input line: a JSON object or a bare console word. Blank lines are `None`.
pub(super) fn parse_line(line: &str) -> Result<Option<IpcCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.starts_with('{') {
        return serde_json::from_str::<IpcCommand>(trimmed)
            .map(Some)
            .map_err(|err| format!("Invalid command: {err}"));
    }
    IpcCommand::from_word(trimmed)
        .map(Some)
        .ok_or_else(|| format!("Unknown command: {trimmed}"))
}

// ============================================================================
// Command Handlers
// ============================================================================

/// Button commands go through the dispatcher so they behave exactly like
/// the physical buttons.
pub(super) fn handle_command(dashcam: &Dashcam, command: IpcCommand) -> (Vec<IpcEvent>, Flow) {
    let line = match command {
        IpcCommand::Start => TriggerLine::Power,
        IpcCommand::Stop => TriggerLine::Stop,
        IpcCommand::Preserve => TriggerLine::Copy,
        IpcCommand::Info => TriggerLine::Info,
        IpcCommand::Status => return (vec![status_event(dashcam)], Flow::Continue),
        IpcCommand::Quit => {
            dashcam.shutdown_handle().request();
            return (vec![IpcEvent::Shutdown], Flow::Quit);
        }
    };

    let events = match dashcam.dispatcher().dispatch(TriggerEvent::pressed(line)) {
        Some(outcome) => vec![outcome_event(dashcam, command, outcome)],
        None => Vec::new(),
    };
    (events, Flow::Continue)
}

pub(super) fn status_event(dashcam: &Dashcam) -> IpcEvent {
    let status = dashcam.status();
    IpcEvent::Status {
        run_id: status.run_id,
        state: status.state.label().to_string(),
        segment: status.segment,
        info_mode: status.info_mode,
    }
}

pub(super) fn ready_event(dashcam: &Dashcam) -> IpcEvent {
    let settings = dashcam.settings();
    IpcEvent::Ready {
        run_id: dashcam.run_id().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage_path: settings.storage_path.display().to_string(),
        segment_seconds: settings.timings.segment.as_secs(),
        segment_count: settings.window,
    }
}

fn outcome_event(dashcam: &Dashcam, command: IpcCommand, outcome: ActionOutcome) -> IpcEvent {
    let recording = |accepted: bool| IpcEvent::Recording {
        command: command.label().to_string(),
        accepted,
        state: dashcam.status().state.label().to_string(),
    };
    match outcome {
        ActionOutcome::Started | ActionOutcome::Stopping => recording(true),
        ActionOutcome::AlreadyActive | ActionOutcome::NotRecording => recording(false),
        ActionOutcome::StartFailed(message) => IpcEvent::Error {
            message: format!("Recording failed to start: {message}"),
            recoverable: true,
        },
        ActionOutcome::Preserved(report) => incident_event(report),
        ActionOutcome::PreserveFailed(message) => IpcEvent::Error {
            message: format!("Incident capture failed: {message}"),
            recoverable: true,
        },
        ActionOutcome::InfoMode(mode) => IpcEvent::InfoMode { mode },
    }
}

fn incident_event(report: IncidentReport) -> IpcEvent {
    IpcEvent::Incident {
        folder: report.folder.display().to_string(),
        copied: report.copied,
        missing: report.missing,
        failed: report.failed,
        waited_for: report.waited_for,
    }
}

// ============================================================================
// Console Rendering
// ============================================================================

pub(super) fn console_line(event: &IpcEvent) -> String {
    match event {
        IpcEvent::Ready {
            run_id,
            storage_path,
            segment_seconds,
            segment_count,
            ..
        } => format!(
            "dashcam ready (run {run_id}): {segment_count} x {segment_seconds}s segments in {storage_path}"
        ),
        IpcEvent::Status {
            run_id,
            state,
            segment,
            info_mode,
        } => format!(
            "run {run_id}: {state}, segment {}, info mode {info_mode}",
            segment.as_deref().unwrap_or("-")
        ),
        IpcEvent::Recording {
            command,
            accepted: true,
            state,
        } => format!("{command}: now {state}"),
        IpcEvent::Recording {
            command,
            accepted: false,
            state,
        } => format!("{command} ignored, recorder is {state}"),
        IpcEvent::Incident {
            folder,
            copied,
            missing,
            ..
        } => {
            if missing.is_empty() {
                format!("incident saved to {folder} ({} segments)", copied.len())
            } else {
                format!(
                    "incident saved to {folder} ({} segments, {} missing)",
                    copied.len(),
                    missing.len()
                )
            }
        }
        IpcEvent::InfoMode { mode } => format!("info mode {mode}"),
        IpcEvent::Shutdown => "shutting down".to_string(),
        IpcEvent::Error { message, .. } => format!("error: {message}"),
    }
}
