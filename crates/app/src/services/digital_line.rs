//! Digital line: self-provisioning, idempotent access to one output line.

use std::time::Duration;

use coop_domain::error::LineError;
use coop_domain::event::ActuationEvent;
use coop_domain::line::{Direction, LineId, LineValue};
use coop_domain::time::now;

use crate::ports::GpioPort;

/// Default wait after exporting a line before its resources are usable.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// One addressable output line.
///
/// Every access checks that the line is exported and configured for output,
/// provisioning it on first use. Writes read the current value first and
/// only touch the hardware when it differs.
pub struct DigitalLine<G> {
    gpio: G,
    line: LineId,
    settle_delay: Duration,
}

impl<G: GpioPort> DigitalLine<G> {
    /// Create a line handle. Nothing is touched until first access.
    pub fn new(gpio: G, line: LineId, settle_delay: Duration) -> Self {
        Self {
            gpio,
            line,
            settle_delay,
        }
    }

    /// Address of the driven line.
    #[must_use]
    pub fn id(&self) -> LineId {
        self.line
    }

    /// Make sure the line is exported and configured as an output.
    ///
    /// A missing line is exported, then the settle delay elapses before the
    /// direction is checked again. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`LineError`] when exporting, reading or configuring the
    /// direction fails for any reason other than the line being absent.
    #[tracing::instrument(skip(self), fields(line = %self.line))]
    pub async fn ensure_output(&self) -> Result<(), LineError> {
        let direction = match self.gpio.direction(self.line).await {
            Ok(direction) => direction,
            Err(err) if err.is_not_provisioned() => {
                self.provision().await?;
                self.gpio.direction(self.line).await?
            }
            Err(err) => return Err(err),
        };

        if direction != Direction::Out {
            self.gpio.set_direction(self.line, Direction::Out).await?;
            tracing::info!(line = %self.line, "line configured as output");
        }
        Ok(())
    }

    async fn provision(&self) -> Result<(), LineError> {
        tracing::info!(line = %self.line, "exporting line");
        self.gpio.export(self.line).await?;
        tokio::time::sleep(self.settle_delay).await;
        Ok(())
    }

    /// Read the current value, provisioning the line first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LineError`] if provisioning or the read fails.
    pub async fn read(&self) -> Result<LineValue, LineError> {
        self.ensure_output().await?;
        self.gpio.read_value(self.line).await
    }

    /// Drive the line to `value`.
    ///
    /// Returns `None` without writing when the line already holds `value`,
    /// otherwise the recorded transition.
    ///
    /// # Errors
    ///
    /// Returns [`LineError`] if the read-before-write or the write fails.
    pub async fn write(&self, value: LineValue) -> Result<Option<ActuationEvent>, LineError> {
        let current = self.read().await?;
        if current == value {
            tracing::trace!(line = %self.line, %value, "line already at value");
            return Ok(None);
        }

        self.gpio.write_value(self.line, value).await?;
        let event = ActuationEvent {
            line: self.line,
            from: current,
            to: value,
            at: now(),
        };
        tracing::info!(
            line = %event.line,
            from = %event.from,
            to = %event.to,
            at = %event.at,
            "line transition"
        );
        Ok(Some(event))
    }

    /// Like [`write`](Self::write), but a failure is logged and dropped.
    ///
    /// For callers that have nobody to report to, such as a detached timer.
    pub async fn set(&self, value: LineValue) -> Option<ActuationEvent> {
        match self.write(value).await {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, line = %self.line, %value, "failed to set line");
                None
            }
        }
    }
}
