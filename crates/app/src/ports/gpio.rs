//! GPIO port: the file-like digital I/O interface.
//!
//! Each line exposes an export operation, a direction resource and a value
//! resource. Export is eventually consistent on real hardware: the line's
//! resources may appear some time after [`export`](GpioPort::export)
//! returns, so callers wait a settle delay before using a freshly exported
//! line.

use std::future::Future;

use coop_domain::error::LineError;
use coop_domain::line::{Direction, LineId, LineValue};

/// Raw access to digital lines.
///
/// Implementations report an absent line as [`LineError::NotProvisioned`]
/// and every other failure as [`LineError::Io`] (or a parse error for
/// unexpected content). They never retry.
pub trait GpioPort: Send + Sync {
    /// Request that `line` be made available.
    fn export(&self, line: LineId) -> impl Future<Output = Result<(), LineError>> + Send;

    /// Read the configured direction of `line`.
    fn direction(&self, line: LineId)
    -> impl Future<Output = Result<Direction, LineError>> + Send;

    /// Configure the direction of `line`.
    fn set_direction(
        &self,
        line: LineId,
        direction: Direction,
    ) -> impl Future<Output = Result<(), LineError>> + Send;

    /// Read the current value of `line`.
    fn read_value(&self, line: LineId)
    -> impl Future<Output = Result<LineValue, LineError>> + Send;

    /// Write a new value to `line`.
    fn write_value(
        &self,
        line: LineId,
        value: LineValue,
    ) -> impl Future<Output = Result<(), LineError>> + Send;
}

impl<T: GpioPort> GpioPort for std::sync::Arc<T> {
    fn export(&self, line: LineId) -> impl Future<Output = Result<(), LineError>> + Send {
        (**self).export(line)
    }

    fn direction(
        &self,
        line: LineId,
    ) -> impl Future<Output = Result<Direction, LineError>> + Send {
        (**self).direction(line)
    }

    fn set_direction(
        &self,
        line: LineId,
        direction: Direction,
    ) -> impl Future<Output = Result<(), LineError>> + Send {
        (**self).set_direction(line, direction)
    }

    fn read_value(
        &self,
        line: LineId,
    ) -> impl Future<Output = Result<LineValue, LineError>> + Send {
        (**self).read_value(line)
    }

    fn write_value(
        &self,
        line: LineId,
        value: LineValue,
    ) -> impl Future<Output = Result<(), LineError>> + Send {
        (**self).write_value(line, value)
    }
}
