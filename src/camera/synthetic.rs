use super::Camera;
use crate::config::VideoFormat;
use anyhow::{anyhow, bail, Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound on a single synthetic frame so huge bitrates stay cheap.
const MAX_FRAME_BYTES: usize = 64 * 1024;

/// File-writing stand-in for a hardware encoder.
///
/// Emits fixed-size placeholder frames at the configured framerate and
/// bitrate. Useful on machines without a camera and in tests that need real
/// files to appear, grow and rotate.
pub struct SyntheticCamera {
    resolution: (u32, u32),
    framerate: u32,
    frame_bytes: usize,
    output: Option<Output>,
}

struct Output {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl SyntheticCamera {
    pub fn new(resolution: (u32, u32), framerate: u32) -> Self {
        Self {
            resolution,
            framerate: framerate.max(1),
            frame_bytes: 0,
            output: None,
        }
    }

    /// File currently receiving frames.
    #[cfg(test)]
    pub(crate) fn current_path(&self) -> Option<&Path> {
        self.output.as_ref().map(|output| output.path.as_path())
    }

    fn open(&self, path: &Path) -> Result<Output> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to open segment '{}'", path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "SYNTHETIC {}x{}@{}",
            self.resolution.0, self.resolution.1, self.framerate
        )?;
        writer.flush()?;
        Ok(Output {
            path: path.to_path_buf(),
            writer,
        })
    }

    fn finish(output: &mut Output) -> Result<()> {
        output
            .writer
            .flush()
            .with_context(|| format!("failed to flush segment '{}'", output.path.display()))
    }
}

impl Camera for SyntheticCamera {
    fn start(&mut self, path: &Path, format: VideoFormat, bitrate: u32) -> Result<()> {
        if self.output.is_some() {
            bail!("encoder already running");
        }
        let per_frame = (bitrate as usize / 8) / self.framerate as usize;
        self.frame_bytes = per_frame.clamp(1, MAX_FRAME_BYTES);
        crate::log_debug(&format!(
            "synthetic encoder start: {} ({}, {} bit/s)",
            path.display(),
            format.label(),
            bitrate
        ));
        self.output = Some(self.open(path)?);
        Ok(())
    }

    fn split(&mut self, path: &Path) -> Result<()> {
        // Open the next file before retiring the current one, so there is
        // never a moment without a file receiving frames.
        if self.output.is_none() {
            bail!("split requested while the encoder is stopped");
        }
        let next = self.open(path)?;
        match self.output.replace(next) {
            Some(mut previous) => Self::finish(&mut previous),
            None => Ok(()),
        }
    }

    fn stop(&mut self) -> Result<()> {
        match self.output.take() {
            Some(mut output) => Self::finish(&mut output),
            None => Ok(()),
        }
    }

    fn wait(&mut self, duration: Duration) -> Result<()> {
        let frame_interval = Duration::from_secs_f64(1.0 / f64::from(self.framerate));
        let frame = vec![0u8; self.frame_bytes];
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let output = self
                .output
                .as_mut()
                .ok_or_else(|| anyhow!("wait requested while the encoder is stopped"))?;
            output
                .writer
                .write_all(&frame)
                .with_context(|| format!("failed to write frame to '{}'", output.path.display()))?;
            thread::sleep(frame_interval.min(deadline - now));
        }
        if let Some(output) = self.output.as_mut() {
            output.writer.flush()?;
        }
        Ok(())
    }
}
