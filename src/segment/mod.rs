//! Segment naming, parsing and the retention ranking.
//!
//! The directory listing is the only source of truth for what has been
//! recorded: every fact the engine needs (run, order, age) is encoded in the
//! segment file name `<prefix>_<epoch>-<salt>-<sequence>.<ext>` and parsed back
//! out here.

mod retention;

use crate::config::VideoFormat;
use anyhow::{bail, Context, Result};
use rand::RngCore;
use regex::Regex;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

pub use retention::select_legal;

/// Random per-process token that separates this run's segments from leftovers
/// of an earlier (possibly crashed) run sharing the same directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunSalt(String);

impl RunSalt {
    /// Draw `bytes` random bytes and hex-encode them.
    pub fn generate(bytes: usize) -> Self {
        let mut raw = vec![0u8; bytes];
        rand::thread_rng().fill_bytes(&mut raw);
        Self(raw.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Fixed salt for reproducible names.
    #[cfg(test)]
    pub(crate) fn from_hex(hex: &str) -> Result<Self> {
        if hex.is_empty() || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            bail!("run salt must be non-empty hex, got '{hex}'");
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunSalt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields recovered from one segment file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentDescriptor {
    pub name: String,
    pub epoch_secs: u64,
    pub salt: String,
    pub sequence: u64,
    /// Whether `salt` matches the salt of the layout that parsed it.
    pub current_run: bool,
}

/// Naming scheme for one run: prefix, format and salt are fixed for the
/// lifetime of the process.
#[derive(Debug)]
pub struct SegmentLayout {
    prefix: String,
    format: VideoFormat,
    salt: RunSalt,
    pattern: Regex,
}

impl SegmentLayout {
    pub fn new(prefix: &str, format: VideoFormat, salt: RunSalt) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"^{}_(\d+)-([0-9a-f]+)-(\d+)\.{}$",
            regex::escape(prefix),
            regex::escape(format.label())
        ))
        .with_context(|| format!("failed to build segment pattern for prefix '{prefix}'"))?;
        Ok(Self {
            prefix: prefix.to_string(),
            format,
            salt,
            pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn format(&self) -> VideoFormat {
        self.format
    }

    pub fn salt(&self) -> &RunSalt {
        &self.salt
    }

    /// File extension (without the dot) of every managed segment.
    pub fn extension(&self) -> &'static str {
        self.format.label()
    }

    /// Name for `sequence`, stamped with the current wall clock.
    pub fn next_name(&self, sequence: u64) -> String {
        let epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.name_at(epoch, sequence)
    }

    pub fn name_at(&self, epoch_secs: u64, sequence: u64) -> String {
        format!(
            "{}_{epoch_secs}-{}-{sequence}.{}",
            self.prefix,
            self.salt,
            self.format.label()
        )
    }

    /// Parse a bare file name. Anything that does not match this layout
    /// exactly yields `None` and is never touched by the engine.
    pub fn parse(&self, file_name: &str) -> Option<SegmentDescriptor> {
        let captures = self.pattern.captures(file_name)?;
        let epoch_secs = captures.get(1)?.as_str().parse().ok()?;
        let salt = captures.get(2)?.as_str().to_string();
        let sequence = captures.get(3)?.as_str().parse().ok()?;
        Some(SegmentDescriptor {
            name: file_name.to_string(),
            current_run: salt == self.salt.as_str(),
            epoch_secs,
            salt,
            sequence,
        })
    }
}
