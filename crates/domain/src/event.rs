//! Actuation event: a diagnostic record of one line transition.
//!
//! Events are produced whenever a line is actually written. They are only
//! logged; nothing persists them.

use serde::Serialize;

use crate::line::{LineId, LineValue};
use crate::time::Timestamp;

/// A line moved from one value to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActuationEvent {
    pub line: LineId,
    pub from: LineValue,
    pub to: LineValue,
    pub at: Timestamp,
}
