//! # coop-adapter-gpio-sysfs
//!
//! [`GpioPort`] over the Linux sysfs GPIO interface.
//!
//! ## Layout
//!
//! | Resource | Path | Content |
//! |----------|------|---------|
//! | export | `<root>/export` | line number, written once to provision |
//! | direction | `<root>/gpioN/direction` | `in` / `out` |
//! | value | `<root>/gpioN/value` | `0` / `1` |
//!
//! A missing `gpioN` resource is reported as
//! [`LineError::NotProvisioned`]; the kernel creates it asynchronously
//! after an export.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `coop-app` and `coop-domain`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::io::AsyncWriteExt;

use coop_app::ports::GpioPort;
use coop_domain::error::LineError;
use coop_domain::line::{Direction, LineId, LineValue};

/// Location of the sysfs GPIO tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SysfsConfig {
    pub root: PathBuf,
}

impl Default for SysfsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/sys/class/gpio"),
        }
    }
}

/// Sysfs-backed GPIO access.
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    #[must_use]
    pub fn new(config: SysfsConfig) -> Self {
        Self { root: config.root }
    }

    fn export_path(&self) -> PathBuf {
        self.root.join("export")
    }

    fn line_path(&self, line: LineId, resource: &str) -> PathBuf {
        self.root.join(format!("gpio{line}")).join(resource)
    }

    async fn read(&self, line: LineId, path: &Path) -> Result<String, LineError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|err| classify(line, err))
    }

    async fn write(&self, line: LineId, path: &Path, content: &str) -> Result<(), LineError> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .await
            .map_err(|err| classify(line, err))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|source| LineError::Io { line, source })?;
        file.flush()
            .await
            .map_err(|source| LineError::Io { line, source })
    }
}

/// A missing resource means the line is not exported; anything else is a fault.
fn classify(line: LineId, err: std::io::Error) -> LineError {
    if err.kind() == ErrorKind::NotFound {
        LineError::NotProvisioned { line }
    } else {
        LineError::Io { line, source: err }
    }
}

impl GpioPort for SysfsGpio {
    async fn export(&self, line: LineId) -> Result<(), LineError> {
        let path = self.export_path();
        tracing::debug!(%line, path = %path.display(), "writing export request");
        self.write(line, &path, &line.to_string())
            .await
            .map_err(|err| match err {
                // The export file itself is missing: there is no GPIO tree.
                LineError::NotProvisioned { line } => LineError::Io {
                    line,
                    source: std::io::Error::new(ErrorKind::NotFound, "no GPIO export file"),
                },
                other => other,
            })
    }

    async fn direction(&self, line: LineId) -> Result<Direction, LineError> {
        let raw = self.read(line, &self.line_path(line, "direction")).await?;
        raw.parse().map_err(|_| LineError::InvalidDirection {
            line,
            raw: raw.trim().to_string(),
        })
    }

    async fn set_direction(&self, line: LineId, direction: Direction) -> Result<(), LineError> {
        let path = self.line_path(line, "direction");
        self.write(line, &path, &format!("{direction}\n")).await?;
        tracing::debug!(%line, %direction, path = %path.display(), "direction written");
        Ok(())
    }

    async fn read_value(&self, line: LineId) -> Result<LineValue, LineError> {
        let raw = self.read(line, &self.line_path(line, "value")).await?;
        raw.parse().map_err(|_| LineError::InvalidValue {
            line,
            raw: raw.trim().to_string(),
        })
    }

    async fn write_value(&self, line: LineId, value: LineValue) -> Result<(), LineError> {
        self.write(line, &self.line_path(line, "value"), value.as_str())
            .await
    }
}
