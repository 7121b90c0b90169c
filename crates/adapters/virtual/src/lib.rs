//! # coop-adapter-virtual
//!
//! Virtual GPIO that simulates digital lines in memory, for running the
//! controller without hardware and for end-to-end tests.
//!
//! ## Behaviour
//!
//! | Operation | Simulation |
//! |-----------|------------|
//! | export | Line appears after `export_lag_ms`, direction `in`, configured initial value |
//! | direction / value before export settles | Reports the line as not provisioned |
//! | write | Stores the value and counts the write |
//! | injected fault | Value reads and writes fail with an I/O error |
//!
//! ## Dependency rule
//!
//! Depends on `coop-app` (port traits) and `coop-domain` only.

mod line;

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Deserialize;
use tokio::time::Instant;

use coop_app::ports::GpioPort;
use coop_domain::error::LineError;
use coop_domain::line::{Direction, LineId, LineValue};

use line::VirtualLine;

/// Configuration for the simulated lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Delay between an export and the line becoming usable, in milliseconds.
    pub export_lag_ms: u64,
    /// Value of a freshly exported line.
    pub initial_value: LineValue,
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            export_lag_ms: 200,
            initial_value: LineValue::High,
        }
    }
}

/// In-memory [`GpioPort`].
pub struct VirtualGpio {
    config: VirtualConfig,
    lines: Mutex<HashMap<LineId, VirtualLine>>,
    faults: Mutex<HashSet<LineId>>,
}

impl Default for VirtualGpio {
    fn default() -> Self {
        Self::new(VirtualConfig::default())
    }
}

impl VirtualGpio {
    #[must_use]
    pub fn new(config: VirtualConfig) -> Self {
        Self {
            config,
            lines: Mutex::new(HashMap::new()),
            faults: Mutex::new(HashSet::new()),
        }
    }

    /// Current value of `line`, if it was ever exported.
    #[must_use]
    pub fn value(&self, line: LineId) -> Option<LineValue> {
        self.lock_lines().get(&line).map(|l| l.value)
    }

    /// Number of value writes that reached `line`.
    #[must_use]
    pub fn writes(&self, line: LineId) -> usize {
        self.lock_lines().get(&line).map_or(0, |l| l.writes)
    }

    /// Number of export requests for `line`.
    #[must_use]
    pub fn exports(&self, line: LineId) -> usize {
        self.lock_lines().get(&line).map_or(0, |l| l.exports)
    }

    /// Make value reads and writes on `line` fail until [`clear_fault`](Self::clear_fault).
    pub fn inject_fault(&self, line: LineId) {
        tracing::debug!(%line, "virtual fault injected");
        self.lock_faults().insert(line);
    }

    pub fn clear_fault(&self, line: LineId) {
        self.lock_faults().remove(&line);
    }

    fn export_lag(&self) -> Duration {
        Duration::from_millis(self.config.export_lag_ms)
    }

    fn check_fault(&self, line: LineId) -> Result<(), LineError> {
        if self.lock_faults().contains(&line) {
            return Err(LineError::Io {
                line,
                source: std::io::Error::other("injected virtual fault"),
            });
        }
        Ok(())
    }

    /// Run `f` against a settled line, or report it as not provisioned.
    fn with_ready_line<T>(
        &self,
        line: LineId,
        f: impl FnOnce(&mut VirtualLine) -> T,
    ) -> Result<T, LineError> {
        match self.lock_lines().get_mut(&line) {
            Some(vline) if vline.is_ready() => Ok(f(vline)),
            _ => Err(LineError::NotProvisioned { line }),
        }
    }

    fn lock_lines(&self) -> MutexGuard<'_, HashMap<LineId, VirtualLine>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_faults(&self) -> MutexGuard<'_, HashSet<LineId>> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GpioPort for VirtualGpio {
    async fn export(&self, line: LineId) -> Result<(), LineError> {
        let ready_at = Instant::now() + self.export_lag();
        let initial = self.config.initial_value;
        self.lock_lines()
            .entry(line)
            .and_modify(|vline| vline.exports += 1)
            .or_insert_with(|| VirtualLine::exported(ready_at, initial));
        tracing::debug!(%line, "virtual line exported");
        Ok(())
    }

    async fn direction(&self, line: LineId) -> Result<Direction, LineError> {
        self.with_ready_line(line, |vline| vline.direction)
    }

    async fn set_direction(&self, line: LineId, direction: Direction) -> Result<(), LineError> {
        self.with_ready_line(line, |vline| vline.direction = direction)
    }

    async fn read_value(&self, line: LineId) -> Result<LineValue, LineError> {
        self.check_fault(line)?;
        self.with_ready_line(line, |vline| vline.value)
    }

    async fn write_value(&self, line: LineId, value: LineValue) -> Result<(), LineError> {
        self.check_fault(line)?;
        self.with_ready_line(line, |vline| {
            vline.value = value;
            vline.writes += 1;
        })
    }
}
