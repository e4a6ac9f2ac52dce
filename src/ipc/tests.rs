use super::protocol::*;
use super::router::*;
use super::session::*;
use crate::camera::testing::FakeCamera;
use crate::config::DashcamSettings;
use crate::gpio::testing::MemoryLine;
use crate::indicator::IndicatorLines;
use crate::recorder::RecordingState;
use crate::runtime::Dashcam;
use std::io::Cursor;
use std::sync::Arc;

fn test_dashcam(dir: &tempfile::TempDir) -> Dashcam {
    let settings = DashcamSettings::for_tests(dir.path(), 3);
    let lines = IndicatorLines {
        power: Arc::new(MemoryLine::default()),
        info: Arc::new(MemoryLine::default()),
        copy: Arc::new(MemoryLine::default()),
    };
    let (camera, _ops) = FakeCamera::new();
    let dashcam = Dashcam::new(settings, Box::new(camera), lines).unwrap();
    dashcam.launch().unwrap();
    dashcam
}

fn run_script(dashcam: &Dashcam, format: EventFormat, script: &str) -> Vec<String> {
    let mut out = Vec::new();
    run_input_loop(dashcam, format, Cursor::new(script.to_string()), &mut out);
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_parse_console_words() {
    assert_eq!(parse_line("start"), Ok(Some(IpcCommand::Start)));
    assert_eq!(parse_line("  STOP \n"), Ok(Some(IpcCommand::Stop)));
    assert_eq!(parse_line("copy"), Ok(Some(IpcCommand::Preserve)));
    assert_eq!(parse_line("info"), Ok(Some(IpcCommand::Info)));
    assert_eq!(parse_line("q"), Ok(Some(IpcCommand::Quit)));
    assert_eq!(parse_line("   "), Ok(None));
    assert!(parse_line("rewind").unwrap_err().contains("Unknown command"));
}

#[test]
fn test_parse_json_commands() {
    assert_eq!(parse_line(r#"{"cmd":"start"}"#), Ok(Some(IpcCommand::Start)));
    assert_eq!(
        parse_line(r#"{"cmd":"preserve"}"#),
        Ok(Some(IpcCommand::Preserve))
    );
    assert_eq!(parse_line(r#"{"cmd":"copy"}"#), Ok(Some(IpcCommand::Preserve)));
    assert_eq!(parse_line(r#"{"cmd":"status"}"#), Ok(Some(IpcCommand::Status)));
    assert!(parse_line(r#"{"cmd":"format_disk"}"#)
        .unwrap_err()
        .starts_with("Invalid command"));
    assert!(parse_line(r#"{"cmd":"#).is_err());
}

#[test]
fn test_serialize_status_event() {
    let event = IpcEvent::Status {
        run_id: "deadbeef".to_string(),
        state: "recording".to_string(),
        segment: None,
        info_mode: 2,
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains(r#""event":"status""#));
    assert!(json.contains(r#""state":"recording""#));
    assert!(!json.contains("segment"), "empty segment is omitted");
}

#[test]
fn test_serialize_incident_event() {
    let event = IpcEvent::Incident {
        folder: "/opt/dashcam/legal/1700000000_utc".to_string(),
        copied: vec!["a.h264".to_string()],
        missing: Vec::new(),
        failed: Vec::new(),
        waited_for: Some("a.h264".to_string()),
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains(r#""event":"incident""#));
    assert!(json.contains(r#""waited_for":"a.h264""#));
}

#[test]
fn test_console_lines_are_readable() {
    let ignored = IpcEvent::Recording {
        command: "stop".to_string(),
        accepted: false,
        state: "off".to_string(),
    };
    assert_eq!(console_line(&ignored), "stop ignored, recorder is off");
    assert_eq!(
        console_line(&IpcEvent::InfoMode { mode: 3 }),
        "info mode 3"
    );
}

#[test]
fn test_json_session_round() {
    let dir = tempfile::tempdir().unwrap();
    let dashcam = test_dashcam(&dir);
    let script = concat!(
        r#"{"cmd":"stop"}"#,
        "\n",
        r#"{"cmd":"info"}"#,
        "\n",
        "not json\n",
        r#"{"cmd":"status"}"#,
        "\n",
        r#"{"cmd":"quit"}"#,
        "\n",
        r#"{"cmd":"start"}"#,
        "\n",
    );
    let lines = run_script(&dashcam, EventFormat::Json, script);

    let events: Vec<serde_json::Value> = lines
        .iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let names: Vec<&str> = events
        .iter()
        .map(|event| event["event"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["ready", "recording", "info_mode", "error", "status", "shutdown"],
        "nothing after quit is read"
    );
    assert_eq!(events[0]["run_id"], dashcam.run_id());
    assert_eq!(events[1]["accepted"], false);
    assert_eq!(events[2]["mode"], 1);
    assert_eq!(events[4]["info_mode"], 1);
    assert_eq!(dashcam.status().state, RecordingState::Off);
    dashcam.shutdown();
}

#[test]
fn test_console_session_records_and_preserves() {
    let dir = tempfile::tempdir().unwrap();
    let dashcam = test_dashcam(&dir);
    let lines = run_script(&dashcam, EventFormat::Console, "start\ncopy\nstop\n");

    assert!(lines[0].starts_with("dashcam ready"));
    assert_eq!(lines[1], "start: now recording");
    assert!(lines[2].starts_with("incident saved to"), "{}", lines[2]);
    assert!(lines[3].starts_with("stop: now "), "{}", lines[3]);
    assert_eq!(lines.len(), 4);
    dashcam.shutdown();
}
