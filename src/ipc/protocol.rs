//! Operator protocol for the console and JSON-lines inputs.
//!
//! Messages are newline-delimited JSON in `--io json` mode; the console mode
//! accepts the same commands as bare words.

use serde::{Deserialize, Serialize};

// ============================================================================
// IPC Events (recorder → client)
// ============================================================================

/// Serialized as JSON with an `"event"` tag field for type discrimination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum IpcEvent {
    /// Sent once after the engine is running
    #[serde(rename = "ready")]
    Ready {
        run_id: String,
        version: String,
        storage_path: String,
        segment_seconds: u64,
        segment_count: usize,
    },

    /// Reply to `status`
    #[serde(rename = "status")]
    Status {
        run_id: String,
        state: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        segment: Option<String>,
        info_mode: u8,
    },

    /// Start/stop result; `accepted` is false when the press was a no-op
    #[serde(rename = "recording")]
    Recording {
        command: String,
        accepted: bool,
        state: String,
    },

    /// Incident copy finished
    #[serde(rename = "incident")]
    Incident {
        folder: String,
        copied: Vec<String>,
        missing: Vec<String>,
        failed: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        waited_for: Option<String>,
    },

    #[serde(rename = "info_mode")]
    InfoMode { mode: u8 },

    /// Sent right before the process stops reading input
    #[serde(rename = "shutdown")]
    Shutdown,

    /// Error (recoverable or fatal)
    #[serde(rename = "error")]
    Error { message: String, recoverable: bool },
}

// ============================================================================
// IPC Commands (client → recorder)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd")]
pub enum IpcCommand {
    /// Same as the power button
    #[serde(rename = "start")]
    Start,

    #[serde(rename = "stop")]
    Stop,

    /// Incident capture (copy button)
    #[serde(rename = "preserve", alias = "copy")]
    Preserve,

    /// Advance the indicator info mode
    #[serde(rename = "info")]
    Info,

    #[serde(rename = "status")]
    Status,

    /// Stop recording and exit
    #[serde(rename = "quit")]
    Quit,
}

impl IpcCommand {
    /// Console word for the command.
    pub fn from_word(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "start" | "power" => Some(IpcCommand::Start),
            "stop" => Some(IpcCommand::Stop),
            "preserve" | "copy" | "incident" => Some(IpcCommand::Preserve),
            "info" => Some(IpcCommand::Info),
            "status" => Some(IpcCommand::Status),
            "quit" | "exit" | "q" => Some(IpcCommand::Quit),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IpcCommand::Start => "start",
            IpcCommand::Stop => "stop",
            IpcCommand::Preserve => "preserve",
            IpcCommand::Info => "info",
            IpcCommand::Status => "status",
            IpcCommand::Quit => "quit",
        }
    }
}
