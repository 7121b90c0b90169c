//! # coop-app
//!
//! Application layer: actuator state management and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `GpioPort`: export, direction and value access for digital lines
//!   - `SolarPort`: sunrise/sunset for a date and a coordinate
//! - Provide the core services:
//!   - `DigitalLine`: self-provisioning, idempotent access to one line
//!   - `ScheduleResolver`: today's open/close window
//!   - `OverrideState`: the shared manual override cell
//!   - `ActuatorController`: drives the door and the water pulse
//!   - `ControlLoop`: perpetual reconciliation on a fixed cadence
//!
//! ## Dependency rule
//! Depends on `coop-domain` only (plus `tokio` for timers and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod control_loop;
pub mod override_state;
pub mod ports;
pub mod services;

#[cfg(test)]
mod test_support;
