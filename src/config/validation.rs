use super::defaults::{
    MAX_PREFIX_LEN, MAX_SALT_BYTES, MAX_SEGMENT_COUNT, MAX_SEGMENT_SECONDS,
    MAX_START_CONFIRM_SECS, MIN_SALT_BYTES, MIN_SEGMENT_SECONDS,
};
use super::{AppConfig, DashcamSettings, PinMap, Timings};
use anyhow::{bail, Result};
use clap::Parser;
use std::collections::HashSet;
use std::time::Duration;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values before any thread or file is touched.
    pub fn validate(&mut self) -> Result<()> {
        if !(MIN_SEGMENT_SECONDS..=MAX_SEGMENT_SECONDS).contains(&self.segment_seconds) {
            bail!(
                "--segment-seconds must be between {MIN_SEGMENT_SECONDS} and {MAX_SEGMENT_SECONDS}, got {}",
                self.segment_seconds
            );
        }
        if !(1..=MAX_SEGMENT_COUNT).contains(&self.segment_count) {
            bail!(
                "--segment-count must be between 1 and {MAX_SEGMENT_COUNT}, got {}",
                self.segment_count
            );
        }
        if self.storage_path.as_os_str().is_empty() {
            bail!("--storage-path must not be empty");
        }

        self.prefix = self.prefix.trim().to_string();
        validate_prefix(&self.prefix)?;

        if self.resolution.len() != 2 || self.resolution.iter().any(|value| *value == 0) {
            bail!(
                "--resolution expects two non-zero values (WIDTH HEIGHT), got {:?}",
                self.resolution
            );
        }
        if self.bitrate == 0 {
            bail!("--bitrate must be greater than zero");
        }
        if !(1..=120).contains(&self.framerate) {
            bail!("--framerate must be between 1 and 120, got {}", self.framerate);
        }
        if !(MIN_SALT_BYTES..=MAX_SALT_BYTES).contains(&self.salt_bytes) {
            bail!(
                "--salt-bytes must be between {MIN_SALT_BYTES} and {MAX_SALT_BYTES}, got {}",
                self.salt_bytes
            );
        }
        if self.led_dim_percent > 100 {
            bail!(
                "--led-dim-percent must be between 0 and 100, got {}",
                self.led_dim_percent
            );
        }
        if self.start_confirm_secs > MAX_START_CONFIRM_SECS {
            bail!(
                "--start-confirm-secs must be at most {MAX_START_CONFIRM_SECS}, got {}",
                self.start_confirm_secs
            );
        }

        // A pin wired to two functions would make one button fire two actions.
        let pins = self.pin_map();
        let all_pins = [
            pins.led_copy,
            pins.led_power,
            pins.led_info,
            pins.button_copy,
            pins.button_power,
            pins.button_stop,
            pins.button_info,
        ];
        let mut seen = HashSet::new();
        for pin in all_pins {
            if !seen.insert(pin) {
                bail!("GPIO pin {pin} is assigned to more than one button or LED");
            }
        }

        Ok(())
    }

    /// Snapshot the validated recording settings for the runtime.
    pub fn dashcam_settings(&self) -> DashcamSettings {
        let mut timings = Timings::for_segment(Duration::from_secs(self.segment_seconds));
        timings.start_confirm = Duration::from_secs(self.start_confirm_secs);
        DashcamSettings {
            storage_path: self.storage_path.clone(),
            prefix: self.prefix.clone(),
            format: self.format,
            bitrate: self.bitrate,
            resolution: (
                self.resolution.first().copied().unwrap_or(1920),
                self.resolution.get(1).copied().unwrap_or(1080),
            ),
            framerate: self.framerate,
            window: self.segment_count,
            salt_bytes: self.salt_bytes,
            led_dim_percent: self.led_dim_percent,
            timings,
        }
    }

    pub fn pin_map(&self) -> PinMap {
        PinMap {
            led_copy: self.pin_led_copy,
            led_power: self.pin_led_power,
            led_info: self.pin_led_info,
            button_copy: self.pin_button_copy,
            button_power: self.pin_button_power,
            button_stop: self.pin_button_stop,
            button_info: self.pin_button_info,
        }
    }
}

/// The prefix ends up in a file name and in the segment pattern, so keep it plain.
pub(super) fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        bail!("--prefix must not be empty");
    }
    if prefix.len() > MAX_PREFIX_LEN {
        bail!("--prefix must be at most {MAX_PREFIX_LEN} characters");
    }
    if !prefix
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        bail!("--prefix may only contain ASCII letters, digits, '-' and '_', got '{prefix}'");
    }
    Ok(())
}
