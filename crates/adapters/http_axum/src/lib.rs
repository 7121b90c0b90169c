//! # coop-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a single **server-side-rendered HTML page** at `/` showing the
//!   door state, the auto/manual mode and today's schedule window
//! - Accept the manual commands `/?open`, `/?close` and `/?auto` from the
//!   page's plain HTML form and redirect back to `/` (PRG pattern)
//! - Answer every other path with 404
//!
//! ## Dependency rule
//! Depends on `coop-app` (for port traits and services) and `coop-domain`
//! (for domain types used in rendering). Never leaks axum types into the domain.

pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;
