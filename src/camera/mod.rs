//! Encoder collaborator.
//!
//! The engine only ever calls `start`, then any number of `split`/`wait`
//! pairs, then `stop`. `split` must be a seamless hand-off: by the time it
//! returns the new file exists and the old one is complete.

mod synthetic;
#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

use crate::config::VideoFormat;
use anyhow::Result;
use std::path::Path;
use std::time::Duration;

pub use synthetic::SyntheticCamera;

pub trait Camera: Send {
    /// Begin encoding into `path`.
    fn start(&mut self, path: &Path, format: VideoFormat, bitrate: u32) -> Result<()>;

    /// Continue the running stream in `path` without dropping frames.
    fn split(&mut self, path: &Path) -> Result<()>;

    /// Finish the current file and release the encoder.
    fn stop(&mut self) -> Result<()>;

    /// Keep recording for `duration`; returns early only on encoder failure.
    fn wait(&mut self, duration: Duration) -> Result<()>;
}
