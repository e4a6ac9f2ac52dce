use super::validation::validate_prefix;
use super::{AppConfig, IoMode, VideoFormat};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn accepts_valid_defaults() {
    let mut cfg = AppConfig::parse_from(["test-app"]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.segment_seconds, 60);
    assert_eq!(cfg.segment_count, 10);
    assert_eq!(cfg.storage_path, PathBuf::from("/opt/dashcam"));
    assert_eq!(cfg.prefix, "video-dashcam");
    assert_eq!(cfg.resolution, vec![1920, 1080]);
    assert_eq!(cfg.format, VideoFormat::H264);
    assert_eq!(cfg.io, IoMode::Console);
}

#[test]
fn short_flags_match_long_flags() {
    let mut cfg = AppConfig::parse_from([
        "test-app", "-s", "30", "-c", "5", "-p", "/tmp/cam", "-f", "car", "-r", "1280", "720",
    ]);
    cfg.validate().expect("short flags should validate");
    assert_eq!(cfg.segment_seconds, 30);
    assert_eq!(cfg.segment_count, 5);
    assert_eq!(cfg.storage_path, PathBuf::from("/tmp/cam"));
    assert_eq!(cfg.prefix, "car");
    assert_eq!(cfg.resolution, vec![1280, 720]);
}

#[test]
fn rejects_segment_seconds_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--segment-seconds", "0"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--segment-seconds", "3601"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_zero_segment_count() {
    let mut cfg = AppConfig::parse_from(["test-app", "--segment-count", "0"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_short_salt() {
    let mut cfg = AppConfig::parse_from(["test-app", "--salt-bytes", "3"]);
    assert!(cfg.validate().is_err());
    let mut cfg = AppConfig::parse_from(["test-app", "--salt-bytes", "4"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_dim_percent_above_hundred() {
    let mut cfg = AppConfig::parse_from(["test-app", "--led-dim-percent", "101"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_zero_resolution() {
    let mut cfg = AppConfig::parse_from(["test-app", "-r", "0", "1080"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_unknown_format() {
    assert!(AppConfig::try_parse_from(["test-app", "--format", "avi"]).is_err());
    let cfg = AppConfig::parse_from(["test-app", "--format", "mjpeg"]);
    assert_eq!(cfg.format.label(), "mjpeg");
}

#[test]
fn rejects_shared_pins() {
    let mut cfg = AppConfig::parse_from(["test-app", "--pin-button-stop", "35"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn prefix_is_trimmed_and_checked() {
    let mut cfg = AppConfig::parse_from(["test-app", "--prefix", "  rear-cam  "]);
    cfg.validate().expect("padded prefix should validate");
    assert_eq!(cfg.prefix, "rear-cam");

    assert!(validate_prefix("").is_err());
    assert!(validate_prefix("../etc").is_err());
    assert!(validate_prefix("cam.1").is_err());
    assert!(validate_prefix("front_cam-2").is_ok());
}

#[test]
fn settings_snapshot_carries_cli_values() {
    let mut cfg = AppConfig::parse_from([
        "test-app",
        "-s",
        "15",
        "-c",
        "4",
        "--start-confirm-secs",
        "2",
        "--bitrate",
        "1000000",
    ]);
    cfg.validate().expect("valid flags");
    let settings = cfg.dashcam_settings();
    assert_eq!(settings.window, 4);
    assert_eq!(settings.bitrate, 1_000_000);
    assert_eq!(settings.resolution, (1920, 1080));
    assert_eq!(settings.timings.segment, Duration::from_secs(15));
    assert_eq!(settings.timings.start_confirm, Duration::from_secs(2));
    assert_eq!(settings.timings.indicator_tick, Duration::from_millis(500));
    assert_eq!(settings.storage_path, PathBuf::from("/opt/dashcam"));
}

#[test]
fn pin_map_uses_board_defaults() {
    let cfg = AppConfig::parse_from(["test-app"]);
    let pins = cfg.pin_map();
    assert_eq!(pins.button_copy, 11);
    assert_eq!(pins.button_power, 35);
    assert_eq!(pins.button_stop, 37);
    assert_eq!(pins.button_info, 33);
    assert_eq!(pins.led_copy, 15);
    assert_eq!(pins.led_power, 12);
    assert_eq!(pins.led_info, 13);
}
