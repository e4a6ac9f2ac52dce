use super::protocol::IpcEvent;
use super::router::{console_line, handle_command, parse_line, ready_event, Flow};
use crate::log_debug;
use crate::runtime::Dashcam;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

/// How events are written back to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFormat {
    /// One human-readable line per event
    Console,
    /// One JSON object per line
    Json,
}

// ============================================================================
// Event Sending
// ============================================================================

pub(super) fn send_event<W: Write>(out: &mut W, format: EventFormat, event: &IpcEvent) {
    let line = match format {
        EventFormat::Console => console_line(event),
        EventFormat::Json => match serde_json::to_string(event) {
            Ok(json) => json,
            Err(err) => {
                log_debug(&format!("failed to encode ipc event: {err}"));
                return;
            }
        },
    };
    let _ = writeln!(out, "{line}");
    let _ = out.flush();
}

// ============================================================================
// Input Loop
// ============================================================================

/// Read commands until `quit` or end of input, answering each with events.
///
/// End of input only ends the reader; the recorder keeps running.
pub fn run_input_loop<R: BufRead, W: Write>(
    dashcam: &Dashcam,
    format: EventFormat,
    input: R,
    out: &mut W,
) {
    send_event(out, format, &ready_event(dashcam));
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log_debug(&format!("input read failed: {err}"));
                break;
            }
        };
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                send_event(
                    out,
                    format,
                    &IpcEvent::Error {
                        message,
                        recoverable: true,
                    },
                );
                continue;
            }
        };
        let (events, flow) = handle_command(dashcam, command);
        for event in &events {
            send_event(out, format, event);
        }
        if flow == Flow::Quit {
            return;
        }
    }
    log_debug("operator input closed; recorder keeps running");
}

/// Serve stdin/stdout on a background thread.
pub fn spawn_stdin_input(
    dashcam: Arc<Dashcam>,
    format: EventFormat,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("operator-input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_input_loop(&dashcam, format, stdin.lock(), &mut stdout);
        })
}
