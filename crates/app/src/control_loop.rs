//! Control loop: reconciles the door with its target forever.
//!
//! Each iteration resolves today's schedule window, picks the target
//! (override first, then schedule) and asks the controller to converge.
//! A failed iteration is logged and the loop carries on after the usual
//! interval: under persistent faults it keeps trying, it never stops.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use coop_domain::error::CoopError;
use coop_domain::time::{Timestamp, now};

use crate::override_state::OverrideState;
use crate::ports::{GpioPort, SolarPort};
use crate::services::controller::{ActuatorController, Ensured};
use crate::services::schedule_resolver::ScheduleResolver;

/// Default pause between two iterations.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Periodic reconciliation of the door.
pub struct ControlLoop<G, S> {
    controller: Arc<ActuatorController<G>>,
    resolver: Arc<ScheduleResolver<S>>,
    overrides: Arc<OverrideState>,
    interval: Duration,
}

impl<G, S> ControlLoop<G, S>
where
    G: GpioPort + 'static,
    S: SolarPort + 'static,
{
    /// Assemble a loop over components shared with the HTTP side. Nothing
    /// runs until [`start`](Self::start).
    pub fn new(
        controller: Arc<ActuatorController<G>>,
        resolver: Arc<ScheduleResolver<S>>,
        overrides: Arc<OverrideState>,
        interval: Duration,
    ) -> Self {
        Self {
            controller,
            resolver,
            overrides,
            interval,
        }
    }

    /// Spawn the loop on its own task.
    ///
    /// The loop has no stop condition; dropping the handle detaches it and
    /// only aborting the handle or ending the runtime halts it.
    pub fn start(self) -> JoinHandle<()> {
        tracing::info!(interval = ?self.interval, "control loop started");
        tokio::spawn(self.run())
    }

    /// Iterate, wait the interval, repeat.
    pub async fn run(self) {
        loop {
            if let Err(err) = self.iterate(now()).await {
                tracing::warn!(error = %err, "control iteration failed, retrying next interval");
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// A single reconciliation as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CoopError::Schedule`] if the window cannot be computed and
    /// [`CoopError::Line`] if the door cannot be read or driven.
    pub async fn iterate(&self, now: Timestamp) -> Result<Ensured, CoopError> {
        let window = self.resolver.resolve(now)?;
        let target = window.target(self.overrides.get(), now);
        let outcome = self.controller.ensure(target).await?;
        if let Ensured::Actuated { from, to, watered } = outcome {
            tracing::debug!(%from, %to, watered, "door reconciled");
        }
        Ok(outcome)
    }
}
