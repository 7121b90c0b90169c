//! Simulated line: one exported GPIO with lagging availability.

use tokio::time::Instant;

use coop_domain::line::{Direction, LineValue};

/// State of one simulated line.
#[derive(Debug, Clone)]
pub struct VirtualLine {
    /// When the line's resources become usable after export.
    ready_at: Instant,
    pub direction: Direction,
    pub value: LineValue,
    /// Number of value writes that reached this line.
    pub writes: usize,
    /// Number of export requests for this line.
    pub exports: usize,
}

impl VirtualLine {
    /// A freshly exported line, usable from `ready_at`.
    pub fn exported(ready_at: Instant, initial: LineValue) -> Self {
        Self {
            ready_at,
            direction: Direction::In,
            value: initial,
            writes: 0,
            exports: 1,
        }
    }

    /// Whether the export has settled.
    pub fn is_ready(&self) -> bool {
        Instant::now() >= self.ready_at
    }
}
