//! Common error types used across the workspace.
//!
//! Each layer reports typed errors and converts into [`CoopError`] via
//! `#[from]`. Line failures split into the one recoverable condition
//! ([`LineError::NotProvisioned`]) and transient faults that are left for the
//! next control-loop iteration to retry.

use chrono::NaiveDate;

use crate::line::LineId;

/// Top-level error for actuation and scheduling.
#[derive(Debug, thiserror::Error)]
pub enum CoopError {
    /// A digital line could not be read, configured or written.
    #[error(transparent)]
    Line(#[from] LineError),

    /// Today's schedule window could not be computed.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Failures of a single digital line.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// The line has not been exported yet; provisioning fixes this.
    #[error("line {line} is not provisioned")]
    NotProvisioned {
        /// The line that was addressed.
        line: LineId,
    },

    /// Any other failure talking to the hardware interface.
    #[error("I/O failure on line {line}: {source}")]
    Io {
        /// The line that was addressed.
        line: LineId,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The value resource held something other than `0` or `1`.
    #[error("line {line} reported unexpected value {raw:?}")]
    InvalidValue {
        /// The line that was addressed.
        line: LineId,
        /// Raw (trimmed) content.
        raw: String,
    },

    /// The direction resource held something other than `in` or `out`.
    #[error("line {line} reported unexpected direction {raw:?}")]
    InvalidDirection {
        /// The line that was addressed.
        line: LineId,
        /// Raw (trimmed) content.
        raw: String,
    },
}

impl LineError {
    /// Whether this is the "not yet provisioned" condition.
    #[must_use]
    pub fn is_not_provisioned(&self) -> bool {
        matches!(self, Self::NotProvisioned { .. })
    }
}

/// Failures computing a schedule window.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The sun does not rise or set on that day at that coordinate.
    #[error("no sunrise/sunset on {date} at {latitude},{longitude}")]
    NoSolarEvents {
        /// Calendar day that was looked up.
        date: NaiveDate,
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },

    /// The offset open time does not precede the close time.
    #[error("open time does not precede close time on {date}")]
    InvertedWindow {
        /// Calendar day of the window.
        date: NaiveDate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_provisioned_error() {
        let err = LineError::NotProvisioned { line: LineId::new(21) };
        assert_eq!(err.to_string(), "line 21 is not provisioned");
        assert!(err.is_not_provisioned());
    }

    #[test]
    fn should_display_io_error_with_underlying_cause() {
        let err = LineError::Io {
            line: LineId::new(20),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.to_string(), "I/O failure on line 20: permission denied");
        assert!(!err.is_not_provisioned());
    }

    #[test]
    fn should_display_invalid_value_error() {
        let err = LineError::InvalidValue {
            line: LineId::new(21),
            raw: "2".to_string(),
        };
        assert_eq!(err.to_string(), "line 21 reported unexpected value \"2\"");
    }

    #[test]
    fn should_keep_io_cause_through_coop_error() {
        let err: CoopError = LineError::Io {
            line: LineId::new(21),
            source: std::io::Error::other("device busy"),
        }
        .into();
        assert_eq!(err.to_string(), "I/O failure on line 21: device busy");
    }

    #[test]
    fn should_forward_line_error_display_through_coop_error() {
        let err: CoopError = LineError::NotProvisioned { line: LineId::new(7) }.into();
        assert_eq!(err.to_string(), "line 7 is not provisioned");
        assert!(matches!(err, CoopError::Line(_)));
    }

    #[test]
    fn should_convert_schedule_error_into_coop_error() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let err: CoopError = ScheduleError::InvertedWindow { date }.into();
        assert!(matches!(err, CoopError::Schedule(_)));
        assert_eq!(
            err.to_string(),
            "open time does not precede close time on 2024-06-21"
        );
    }
}
