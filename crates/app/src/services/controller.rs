//! Actuator controller: converges the door to a target and waters on opening.

use std::sync::Arc;
use std::time::Duration;

use coop_domain::action::Action;
use coop_domain::error::{CoopError, LineError};

use crate::ports::GpioPort;
use crate::services::digital_line::DigitalLine;

/// Default length of the watering pulse started when the door opens.
pub const DEFAULT_PULSE: Duration = Duration::from_secs(60);

/// Result of a successful [`ActuatorController::ensure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    /// The door already matched the target; nothing was written.
    InPlace(Action),
    /// The door was driven from one action to the other.
    Actuated {
        from: Action,
        to: Action,
        /// Whether a water pulse was started.
        watered: bool,
    },
}

/// Drives the door line and the water line.
pub struct ActuatorController<G> {
    door: DigitalLine<G>,
    water: Arc<DigitalLine<G>>,
    pulse: Duration,
}

impl<G> ActuatorController<G>
where
    G: GpioPort + 'static,
{
    /// Build a controller; `pulse` is how long the water stays open after
    /// each door opening.
    pub fn new(door: DigitalLine<G>, water: DigitalLine<G>, pulse: Duration) -> Self {
        Self {
            door,
            water: Arc::new(water),
            pulse,
        }
    }

    /// Current door state.
    ///
    /// # Errors
    ///
    /// Returns [`LineError`] if the door line cannot be read.
    pub async fn door_state(&self) -> Result<Action, LineError> {
        self.door.read().await.map(Action::from_line_value)
    }

    /// Drive the door towards `target`.
    ///
    /// A no-op when the door already matches. Otherwise, when opening, a
    /// water pulse starts first; its timed close runs on a detached task
    /// that nothing cancels, so it completes even if the door is toggled
    /// again or the door write below fails.
    ///
    /// # Errors
    ///
    /// Returns [`CoopError::Line`] if the door cannot be read or written.
    #[tracing::instrument(skip(self))]
    pub async fn ensure(&self, target: Action) -> Result<Ensured, CoopError> {
        let current = self.door_state().await?;
        if current == target {
            return Ok(Ensured::InPlace(current));
        }

        tracing::info!(from = %current, to = %target, "door transition");
        let watered = target == Action::Open;
        if watered {
            self.start_pulse().await;
        }

        self.door.write(target.line_value()).await?;
        Ok(Ensured::Actuated {
            from: current,
            to: target,
            watered,
        })
    }

    /// Open the water line and schedule its close after the pulse duration.
    ///
    /// The spawned task is never joined nor aborted.
    async fn start_pulse(&self) {
        self.water.set(Action::Open.line_value()).await;

        let water = Arc::clone(&self.water);
        let pulse = self.pulse;
        tokio::spawn(async move {
            tokio::time::sleep(pulse).await;
            tracing::debug!(line = %water.id(), "water pulse elapsed");
            water.set(Action::Close.line_value()).await;
        });
    }
}
