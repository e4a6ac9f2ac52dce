pub mod camera;
pub mod config;
pub mod dispatch;
pub mod gpio;
pub mod indicator;
pub mod ipc;
mod lock;
pub mod recorder;
pub mod runtime;
pub mod segment;
pub mod storage;
mod telemetry;

mod app;

pub use app::*;
pub(crate) use lock::lock_or_recover;
pub use runtime::Dashcam;
