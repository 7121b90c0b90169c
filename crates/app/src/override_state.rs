//! Override state: the manually forced door target, shared between the
//! control loop and the HTTP interface.

use std::sync::atomic::{AtomicU8, Ordering};

use coop_domain::action::Action;

const NONE: u8 = 0;
const OPEN: u8 = 1;
const CLOSE: u8 = 2;

/// Single-word cell holding `None`, `Open` or `Close`.
///
/// Readers observe either the previous or the new value; no ordering with
/// other memory is implied, so a write may land after the control loop has
/// already read the cell for its current iteration.
#[derive(Debug, Default)]
pub struct OverrideState {
    cell: AtomicU8,
}

impl OverrideState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The forced target, if any.
    #[must_use]
    pub fn get(&self) -> Option<Action> {
        match self.cell.load(Ordering::Relaxed) {
            OPEN => Some(Action::Open),
            CLOSE => Some(Action::Close),
            _ => None,
        }
    }

    /// Force the door towards `action` until [`clear`](Self::clear).
    pub fn set(&self, action: Action) {
        let raw = match action {
            Action::Open => OPEN,
            Action::Close => CLOSE,
        };
        self.cell.store(raw, Ordering::Relaxed);
        tracing::info!(%action, "manual override set");
    }

    /// Return to the schedule.
    pub fn clear(&self) {
        self.cell.store(NONE, Ordering::Relaxed);
        tracing::info!("manual override cleared");
    }
}
