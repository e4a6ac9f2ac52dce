use std::time::Duration;

pub const DEFAULT_SEGMENT_SECONDS: u64 = 60;
pub const DEFAULT_SEGMENT_COUNT: usize = 10;
pub const DEFAULT_STORAGE_PATH: &str = "/opt/dashcam";
pub const DEFAULT_PREFIX: &str = "video-dashcam";
pub const DEFAULT_BITRATE: u32 = 7_000_000;
pub const DEFAULT_FRAMERATE: u32 = 30;
pub const DEFAULT_SALT_BYTES: usize = 4;
pub const DEFAULT_LED_DIM_PERCENT: u8 = 5;
pub const DEFAULT_START_CONFIRM_SECS: u64 = 10;
pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

pub const DEFAULT_PIN_LED_COPY: u32 = 15;
pub const DEFAULT_PIN_LED_POWER: u32 = 12;
pub const DEFAULT_PIN_LED_INFO: u32 = 13;
pub const DEFAULT_PIN_BUTTON_COPY: u32 = 11;
pub const DEFAULT_PIN_BUTTON_POWER: u32 = 35;
pub const DEFAULT_PIN_BUTTON_STOP: u32 = 37;
pub const DEFAULT_PIN_BUTTON_INFO: u32 = 33;

pub(super) const MIN_SEGMENT_SECONDS: u64 = 1;
pub(super) const MAX_SEGMENT_SECONDS: u64 = 3_600;
pub(super) const MAX_SEGMENT_COUNT: usize = 1_000;
/// 4 bytes keeps the per-run collision odds at 2^-32.
pub(super) const MIN_SALT_BYTES: usize = 4;
pub(super) const MAX_SALT_BYTES: usize = 16;
pub(super) const MAX_PREFIX_LEN: usize = 64;
pub(super) const MAX_START_CONFIRM_SECS: u64 = 60;

pub(super) const INDICATOR_TICK: Duration = Duration::from_millis(500);
pub(super) const HEARTBEAT_PULSE: Duration = Duration::from_millis(150);
pub(super) const HEARTBEAT_GAP: Duration = Duration::from_millis(150);
pub(super) const HEARTBEAT_TAIL: Duration = Duration::from_millis(200);
pub(super) const SLOW_HEARTBEAT_TICKS: u32 = 60;
pub(super) const FEEDBACK_BLINK_TOTAL: Duration = Duration::from_secs(2);
pub(super) const FEEDBACK_BLINK_STEP: Duration = Duration::from_millis(100);
pub(super) const WARNING_STEP: Duration = Duration::from_millis(500);
pub(super) const WARNING_BLINKS: u32 = 10;
pub(super) const FINALIZE_POLL: Duration = Duration::from_secs(5);
