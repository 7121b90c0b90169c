//! # coop-domain
//!
//! Pure domain model for the coop door controller.
//!
//! ## Responsibilities
//! - Foundational types: line identifiers, logical line values, directions,
//!   error conventions, timestamps
//! - Define **Actions** (the door targets `open` / `close`) and their fixed
//!   mapping onto line values
//! - Define **Schedule windows** (the daily open/close instants derived from
//!   sunrise and sunset) and target resolution against an optional override
//! - Define **Actuation events** (diagnostic records of line transitions)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod action;
pub mod event;
pub mod line;
pub mod schedule;
