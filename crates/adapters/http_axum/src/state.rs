//! Shared application state for axum handlers.

use std::sync::Arc;
use std::time::Duration;

use coop_app::override_state::OverrideState;
use coop_app::services::controller::ActuatorController;
use coop_app::services::schedule_resolver::ScheduleResolver;

/// Application state shared across all axum handlers.
///
/// Generic over the GPIO and solar ports to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<G, S> {
    /// Door and water actuation.
    pub controller: Arc<ActuatorController<G>>,
    /// Today's schedule window.
    pub resolver: Arc<ScheduleResolver<S>>,
    /// Manual override cell, shared with the control loop.
    pub overrides: Arc<OverrideState>,
    /// Pause after a manual command so the redirected page shows its effect.
    pub feedback_delay: Duration,
}

impl<G, S> Clone for AppState<G, S> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            resolver: Arc::clone(&self.resolver),
            overrides: Arc::clone(&self.overrides),
            feedback_delay: self.feedback_delay,
        }
    }
}

impl<G, S> AppState<G, S> {
    /// Create a new application state from components already shared with
    /// the control loop.
    pub fn new(
        controller: Arc<ActuatorController<G>>,
        resolver: Arc<ScheduleResolver<S>>,
        overrides: Arc<OverrideState>,
        feedback_delay: Duration,
    ) -> Self {
        Self {
            controller,
            resolver,
            overrides,
            feedback_delay,
        }
    }
}
