//! Batch directories and the files written into them.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A file produced for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub format: OutputFormat,
}

impl OutputArtifact {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Builds `root/<timestamp>` paths for a run.
#[derive(Debug, Clone)]
pub struct BatchPathBuilder {
    root: PathBuf,
    timestamp_format: String,
}

impl BatchPathBuilder {
    pub fn new(root: impl Into<PathBuf>, timestamp_format: impl Into<String>) -> Self {
        Self { root: root.into(), timestamp_format: timestamp_format.into() }
    }

    pub fn build(&self, clock: &dyn Clock) -> Result<PathBuf> {
        let stamp = format_timestamp(clock.now(), &self.timestamp_format)?;
        Ok(self.root.join(stamp))
    }
}

/// Render `at` with a strftime pattern.
///
/// Patterns chrono can parse but not apply to a naive time (`%z`, `%Z`) fail
/// here instead of panicking inside `to_string`.
pub fn format_timestamp(at: NaiveDateTime, pattern: &str) -> Result<String> {
    let mut stamp = String::new();
    write!(stamp, "{}", at.format(pattern))
        .map_err(|_| Error::config(format!("timestamp format {pattern:?} cannot be applied to a local time")))?;
    Ok(stamp)
}

/// The directory one run writes into.
#[derive(Debug, Clone)]
pub struct BatchDir {
    path: PathBuf,
}

impl BatchDir {
    /// Create the directory (and parents); an existing one is reused.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        tracing::debug!("batch directory ready: {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn artifact_path(&self, stem: &str, format: OutputFormat) -> PathBuf {
        self.path.join(format!("{stem}.{}", format.extension()))
    }

    pub fn write(&self, stem: &str, format: OutputFormat, data: &[u8]) -> Result<OutputArtifact> {
        let path = self.artifact_path(stem, format);
        fs::write(&path, data)?;
        Ok(OutputArtifact { path, format })
    }

    /// Best-effort removal of files already written for an abandoned row.
    pub fn discard(&self, artifacts: &[OutputArtifact]) {
        for artifact in artifacts {
            if let Err(e) = fs::remove_file(&artifact.path) {
                tracing::warn!("could not remove {}: {e}", artifact.path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn clock() -> FixedClock {
        let at = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap().and_hms_opt(9, 5, 42).unwrap();
        FixedClock(at)
    }

    #[test]
    fn batch_path_uses_clock() {
        let builder = BatchPathBuilder::new("out", "%Y-%m-%d_%H%M");
        assert_eq!(builder.build(&clock()).unwrap(), PathBuf::from("out/2025-03-07_0905"));
    }

    #[test]
    fn offset_specifiers_are_errors_not_panics() {
        for pattern in ["%Y-%m-%d_%H%M%z", "%Z", "%Y%m%d%:z"] {
            let builder = BatchPathBuilder::new("out", pattern);
            assert!(matches!(builder.build(&clock()), Err(Error::Config { .. })), "{pattern}");
        }
    }

    #[test]
    fn create_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let path = BatchPathBuilder::new(tmp.path(), "%Y%m%d").build(&clock()).unwrap();
        let first = BatchDir::create(&path).unwrap();
        let second = BatchDir::create(&path).unwrap();
        assert_eq!(first.path(), second.path());
        assert!(path.is_dir());
    }

    #[test]
    fn write_names_file_by_stem_and_format() {
        let tmp = TempDir::new().unwrap();
        let dir = BatchDir::create(tmp.path()).unwrap();
        let artifact = dir.write("Widget", OutputFormat::Svg, b"<svg/>").unwrap();
        assert_eq!(artifact.file_name(), "Widget.svg");
        assert_eq!(artifact.format, OutputFormat::Svg);
        assert_eq!(fs::read(&artifact.path).unwrap(), b"<svg/>");

        dir.discard(&[artifact.clone()]);
        assert!(!artifact.path.exists());
    }
}
