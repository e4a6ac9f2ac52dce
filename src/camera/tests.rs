use super::{Camera, SyntheticCamera};
use crate::config::VideoFormat;
use std::fs;
use std::time::Duration;

#[test]
fn split_leaves_both_files_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("a.h264");
    let second = dir.path().join("b.h264");
    let mut camera = SyntheticCamera::new((640, 480), 50);

    camera
        .start(&first, VideoFormat::H264, 80_000)
        .expect("start");
    camera.wait(Duration::from_millis(40)).expect("wait");
    camera.split(&second).expect("split");
    assert_eq!(camera.current_path(), Some(second.as_path()));
    assert!(second.exists());
    camera.wait(Duration::from_millis(40)).expect("wait");
    camera.stop().expect("stop");

    let first_len = fs::metadata(&first).expect("first exists").len();
    let second_len = fs::metadata(&second).expect("second exists").len();
    assert!(first_len > 20, "frames were written into the first segment");
    assert!(second_len > 20, "frames were written into the second segment");
    assert!(camera.current_path().is_none());
}

#[test]
fn split_without_start_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut camera = SyntheticCamera::new((640, 480), 30);
    assert!(camera.split(&dir.path().join("x.h264")).is_err());
    assert!(camera.wait(Duration::from_millis(1)).is_err());
    assert!(camera.stop().is_ok());
}

#[test]
fn start_twice_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut camera = SyntheticCamera::new((640, 480), 30);
    camera
        .start(&dir.path().join("a.h264"), VideoFormat::H264, 8_000)
        .expect("start");
    assert!(camera
        .start(&dir.path().join("b.h264"), VideoFormat::H264, 8_000)
        .is_err());
}

#[test]
fn start_into_missing_directory_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut camera = SyntheticCamera::new((640, 480), 30);
    let missing = dir.path().join("nope").join("a.h264");
    assert!(camera.start(&missing, VideoFormat::H264, 8_000).is_err());
}
