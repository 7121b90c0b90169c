//! # coopd: coop door daemon
//!
//! Composition root that wires all adapters together and starts the
//! controller.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise `tracing` from the logging filter
//! - Construct the GPIO backend, the digital lines and the solar provider
//! - Construct the actuator controller, the schedule resolver and the
//!   shared override cell
//! - Spawn the control loop
//! - Build the axum router and serve it, on the fallback port if the
//!   preferred one is taken
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod gpio;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use coop_adapter_http_axum::state::AppState;
use coop_adapter_solar::SunriseProvider;
use coop_app::control_loop::ControlLoop;
use coop_app::override_state::OverrideState;
use coop_app::services::controller::ActuatorController;
use coop_app::services::digital_line::DigitalLine;
use coop_app::services::schedule_resolver::ScheduleResolver;

use crate::config::Config;
use crate::gpio::Gpio;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config.logging.filter);

    // Lines
    let gpio = Arc::new(Gpio::from_config(&config.gpio));
    tracing::info!(
        backend = gpio.name(),
        door = %config.gpio.door(),
        water = %config.gpio.water(),
        "gpio backend selected"
    );
    let settle = config.gpio.settle_delay();
    let door = DigitalLine::new(Arc::clone(&gpio), config.gpio.door(), settle);
    let water = DigitalLine::new(gpio, config.gpio.water(), settle);

    // Services
    let controller = Arc::new(ActuatorController::new(
        door,
        water,
        config.control.pulse(),
    ));
    let resolver = Arc::new(ScheduleResolver::new(SunriseProvider, config.coordinates()));
    let overrides = Arc::new(OverrideState::new());

    // Control loop
    let control = ControlLoop::new(
        Arc::clone(&controller),
        Arc::clone(&resolver),
        Arc::clone(&overrides),
        config.control.interval(),
    )
    .start();

    // HTTP
    let state = AppState::new(
        controller,
        resolver,
        overrides,
        config.control.feedback_delay(),
    );
    let app = coop_adapter_http_axum::router::build(state);

    let listener = bind(&config.bind_addr(), &config.fallback_bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "coopd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    control.abort();
    tracing::info!("coopd stopped");
    Ok(())
}

fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Bind `preferred`, or `fallback` if that fails.
async fn bind(preferred: &str, fallback: &str) -> std::io::Result<TcpListener> {
    match TcpListener::bind(preferred).await {
        Ok(listener) => Ok(listener),
        Err(err) => {
            tracing::warn!(%preferred, %fallback, error = %err, "cannot bind, trying fallback");
            TcpListener::bind(fallback).await
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
