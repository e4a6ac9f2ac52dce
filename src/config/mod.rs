//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

pub use defaults::{
    DEFAULT_BITRATE, DEFAULT_FRAMERATE, DEFAULT_GPIO_ROOT, DEFAULT_LED_DIM_PERCENT,
    DEFAULT_PIN_BUTTON_COPY, DEFAULT_PIN_BUTTON_INFO, DEFAULT_PIN_BUTTON_POWER,
    DEFAULT_PIN_BUTTON_STOP, DEFAULT_PIN_LED_COPY, DEFAULT_PIN_LED_INFO, DEFAULT_PIN_LED_POWER,
    DEFAULT_PREFIX, DEFAULT_SALT_BYTES, DEFAULT_SEGMENT_COUNT, DEFAULT_SEGMENT_SECONDS,
    DEFAULT_START_CONFIRM_SECS, DEFAULT_STORAGE_PATH,
};

/// CLI options for the dashcam recorder.
///
/// Instead of one growing video file the stream is split into fixed-length
/// segments and only the newest few are kept on disk. An incident button copies
/// the kept window into `<storage>/legal/`, which is never cleaned.
#[derive(Debug, Parser, Clone)]
#[command(
    about = "Dashcam recorder with rolling segment retention and incident capture",
    author,
    version
)]
pub struct AppConfig {
    /// Length of a single stored video segment (seconds)
    #[arg(short = 's', long = "segment-seconds", default_value_t = DEFAULT_SEGMENT_SECONDS)]
    pub segment_seconds: u64,

    /// Number of segments kept on disk at the same time
    #[arg(short = 'c', long = "segment-count", default_value_t = DEFAULT_SEGMENT_COUNT)]
    pub segment_count: usize,

    /// Directory that receives the rolling segments
    #[arg(short = 'p', long = "storage-path", default_value = DEFAULT_STORAGE_PATH)]
    pub storage_path: PathBuf,

    /// Filename prefix for the stored segments
    #[arg(short = 'f', long = "prefix", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Video resolution passed to the encoder
    #[arg(
        short = 'r',
        long = "resolution",
        num_args = 2,
        value_names = ["WIDTH", "HEIGHT"],
        default_values_t = [1920u32, 1080]
    )]
    pub resolution: Vec<u32>,

    /// Encoder bitrate (bits per second)
    #[arg(long, default_value_t = DEFAULT_BITRATE)]
    pub bitrate: u32,

    /// Container/codec used for the stored segments
    #[arg(long, value_enum, default_value_t = VideoFormat::H264)]
    pub format: VideoFormat,

    /// Encoder framerate
    #[arg(long, default_value_t = DEFAULT_FRAMERATE)]
    pub framerate: u32,

    /// Random bytes in the per-run salt embedded in every segment name
    #[arg(long = "salt-bytes", default_value_t = DEFAULT_SALT_BYTES)]
    pub salt_bytes: usize,

    /// Brightness of the power/info LEDs in percent
    #[arg(long = "led-dim-percent", default_value_t = DEFAULT_LED_DIM_PERCENT)]
    pub led_dim_percent: u8,

    /// How long the start button keeps further start/stop presses waiting (seconds)
    #[arg(long = "start-confirm-secs", default_value_t = DEFAULT_START_CONFIRM_SECS)]
    pub start_confirm_secs: u64,

    /// Where operator input comes from and where indicators are driven
    #[arg(long = "io", value_enum, default_value_t = IoMode::Console)]
    pub io: IoMode,

    /// sysfs GPIO root used by `--io gpio`
    #[arg(long = "gpio-root", default_value = DEFAULT_GPIO_ROOT)]
    pub gpio_root: PathBuf,

    /// GPIO line of the data-copy LED
    #[arg(long = "pin-led-copy", default_value_t = DEFAULT_PIN_LED_COPY)]
    pub pin_led_copy: u32,

    /// GPIO line of the power LED
    #[arg(long = "pin-led-power", default_value_t = DEFAULT_PIN_LED_POWER)]
    pub pin_led_power: u32,

    /// GPIO line of the info LED
    #[arg(long = "pin-led-info", default_value_t = DEFAULT_PIN_LED_INFO)]
    pub pin_led_info: u32,

    /// GPIO line of the incident (data copy) button
    #[arg(long = "pin-button-copy", default_value_t = DEFAULT_PIN_BUTTON_COPY)]
    pub pin_button_copy: u32,

    /// GPIO line of the start button
    #[arg(long = "pin-button-power", default_value_t = DEFAULT_PIN_BUTTON_POWER)]
    pub pin_button_power: u32,

    /// GPIO line of the stop button
    #[arg(long = "pin-button-stop", default_value_t = DEFAULT_PIN_BUTTON_STOP)]
    pub pin_button_stop: u32,

    /// GPIO line of the info-mode button
    #[arg(long = "pin-button-info", default_value_t = DEFAULT_PIN_BUTTON_INFO)]
    pub pin_button_info: u32,

    /// Enable file logging (debug log plus JSON trace)
    #[arg(long = "logs", env = "DASHCAM_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs)
    #[arg(long = "no-logs", env = "DASHCAM_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Do not echo diagnostics to stderr
    #[arg(long, short = 'q', default_value_t = false)]
    pub quiet: bool,
}

/// Segment formats the encoder collaborator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VideoFormat {
    H264,
    Mjpeg,
}

impl VideoFormat {
    /// File extension and encoder format name.
    pub fn label(self) -> &'static str {
        match self {
            VideoFormat::H264 => "h264",
            VideoFormat::Mjpeg => "mjpeg",
        }
    }
}

/// Operator I/O backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IoMode {
    /// Words on stdin, indicator changes in the log
    Console,
    /// Newline-delimited JSON commands on stdin and events on stdout
    Json,
    /// sysfs GPIO buttons and LEDs
    Gpio,
}

/// GPIO line numbers for every button and LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pub led_copy: u32,
    pub led_power: u32,
    pub led_info: u32,
    pub button_copy: u32,
    pub button_power: u32,
    pub button_stop: u32,
    pub button_info: u32,
}

/// Every sleep the engine performs. Tests shrink these to milliseconds.
#[derive(Debug, Clone)]
pub struct Timings {
    pub segment: Duration,
    pub indicator_tick: Duration,
    pub heartbeat_pulse: Duration,
    pub heartbeat_gap: Duration,
    pub heartbeat_tail: Duration,
    pub slow_heartbeat_ticks: u32,
    pub feedback_blink_total: Duration,
    pub feedback_blink_step: Duration,
    pub warning_step: Duration,
    pub warning_blinks: u32,
    pub start_confirm: Duration,
    pub finalize_poll: Duration,
}

impl Timings {
    /// Stock cadences around the given segment length.
    pub fn for_segment(segment: Duration) -> Self {
        Self {
            segment,
            indicator_tick: defaults::INDICATOR_TICK,
            heartbeat_pulse: defaults::HEARTBEAT_PULSE,
            heartbeat_gap: defaults::HEARTBEAT_GAP,
            heartbeat_tail: defaults::HEARTBEAT_TAIL,
            slow_heartbeat_ticks: defaults::SLOW_HEARTBEAT_TICKS,
            feedback_blink_total: defaults::FEEDBACK_BLINK_TOTAL,
            feedback_blink_step: defaults::FEEDBACK_BLINK_STEP,
            warning_step: defaults::WARNING_STEP,
            warning_blinks: defaults::WARNING_BLINKS,
            start_confirm: Duration::from_secs(DEFAULT_START_CONFIRM_SECS),
            finalize_poll: defaults::FINALIZE_POLL,
        }
    }
}

/// Validated snapshot of everything the recording engine needs.
#[derive(Debug, Clone)]
pub struct DashcamSettings {
    pub storage_path: PathBuf,
    pub prefix: String,
    pub format: VideoFormat,
    pub bitrate: u32,
    pub resolution: (u32, u32),
    pub framerate: u32,
    pub window: usize,
    pub salt_bytes: usize,
    pub led_dim_percent: u8,
    pub timings: Timings,
}

#[cfg(test)]
impl DashcamSettings {
    /// Millisecond-scale settings for engine tests.
    pub(crate) fn for_tests(storage_path: &std::path::Path, window: usize) -> Self {
        let mut timings = Timings::for_segment(Duration::from_millis(40));
        timings.indicator_tick = Duration::from_millis(5);
        timings.heartbeat_pulse = Duration::from_millis(1);
        timings.heartbeat_gap = Duration::from_millis(1);
        timings.heartbeat_tail = Duration::from_millis(1);
        timings.feedback_blink_total = Duration::from_millis(10);
        timings.feedback_blink_step = Duration::from_millis(1);
        timings.warning_step = Duration::from_millis(1);
        timings.warning_blinks = 3;
        timings.start_confirm = Duration::from_millis(5);
        timings.finalize_poll = Duration::from_millis(5);
        Self {
            storage_path: storage_path.to_path_buf(),
            prefix: DEFAULT_PREFIX.to_string(),
            format: VideoFormat::H264,
            bitrate: 80_000,
            resolution: (640, 480),
            framerate: 10,
            window,
            salt_bytes: DEFAULT_SALT_BYTES,
            led_dim_percent: DEFAULT_LED_DIM_PERCENT,
            timings,
        }
    }
}
