//! End-to-end tests for the full coopd stack.
//!
//! Each test wires the complete application (virtual GPIO, real digital
//! lines, real controller, real solar provider, real axum router) and
//! exercises it through the control loop and the HTTP layer via
//! `tower::ServiceExt::oneshot`. No TCP port is bound.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use coop_adapter_http_axum::router;
use coop_adapter_http_axum::state::AppState;
use coop_adapter_solar::SunriseProvider;
use coop_adapter_virtual::{VirtualConfig, VirtualGpio};
use coop_app::control_loop::ControlLoop;
use coop_app::override_state::OverrideState;
use coop_app::services::controller::{ActuatorController, Ensured};
use coop_app::services::digital_line::DigitalLine;
use coop_app::services::schedule_resolver::ScheduleResolver;
use coop_domain::action::Action;
use coop_domain::line::{LineId, LineValue};
use coop_domain::schedule::Coordinates;

const DOOR: LineId = LineId::new(21);
const WATER: LineId = LineId::new(20);
const PULSE: Duration = Duration::from_secs(60);
const COOP: Coordinates = Coordinates::new(37.4852, -122.2364);

struct Stack {
    gpio: Arc<VirtualGpio>,
    control: ControlLoop<Arc<VirtualGpio>, SunriseProvider>,
    app: axum::Router,
}

/// Wire the application the way `main` does, on simulated lines.
fn stack() -> Stack {
    let gpio = Arc::new(VirtualGpio::new(VirtualConfig {
        export_lag_ms: 200,
        initial_value: LineValue::High,
    }));
    let settle = Duration::from_secs(1);
    let door = DigitalLine::new(Arc::clone(&gpio), DOOR, settle);
    let water = DigitalLine::new(Arc::clone(&gpio), WATER, settle);

    let controller = Arc::new(ActuatorController::new(door, water, PULSE));
    let resolver = Arc::new(ScheduleResolver::new(SunriseProvider, COOP));
    let overrides = Arc::new(OverrideState::new());

    let control = ControlLoop::new(
        Arc::clone(&controller),
        Arc::clone(&resolver),
        Arc::clone(&overrides),
        Duration::from_secs(1),
    );
    let state = AppState::new(controller, resolver, overrides, Duration::from_secs(1));

    Stack {
        gpio,
        control,
        app: router::build(state),
    }
}

/// Local noon at the coop on midsummer day: well inside the open window.
fn midsummer_noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 21, 19, 0, 0).unwrap()
}

/// Local 23:00 at the coop on midsummer day: after sunset.
fn midsummer_night() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 22, 6, 0, 0).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ---------------------------------------------------------------------------
// Control loop
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_open_door_and_water_during_the_day() {
    let stack = stack();

    let outcome = stack.control.iterate(midsummer_noon()).await.unwrap();

    assert_eq!(
        outcome,
        Ensured::Actuated {
            from: Action::Close,
            to: Action::Open,
            watered: true,
        }
    );
    assert_eq!(stack.gpio.value(DOOR), Some(LineValue::Low));
    assert_eq!(stack.gpio.value(WATER), Some(LineValue::Low));
    assert_eq!(stack.gpio.exports(DOOR), 1);
    assert_eq!(stack.gpio.exports(WATER), 1);

    tokio::time::sleep(PULSE + Duration::from_secs(1)).await;
    assert_eq!(stack.gpio.value(WATER), Some(LineValue::High));
}

#[tokio::test(start_paused = true)]
async fn should_close_door_at_night_without_watering() {
    let stack = stack();
    stack.control.iterate(midsummer_noon()).await.unwrap();
    tokio::time::sleep(PULSE + Duration::from_secs(1)).await;
    let water_writes = stack.gpio.writes(WATER);

    let outcome = stack.control.iterate(midsummer_night()).await.unwrap();

    assert!(matches!(
        outcome,
        Ensured::Actuated {
            to: Action::Close,
            watered: false,
            ..
        }
    ));
    assert_eq!(stack.gpio.value(DOOR), Some(LineValue::High));
    assert_eq!(stack.gpio.writes(WATER), water_writes);
}

#[tokio::test(start_paused = true)]
async fn should_not_rewrite_door_already_in_place() {
    let stack = stack();
    stack.control.iterate(midsummer_noon()).await.unwrap();

    let outcome = stack.control.iterate(midsummer_noon()).await.unwrap();

    assert_eq!(outcome, Ensured::InPlace(Action::Open));
    assert_eq!(stack.gpio.writes(DOOR), 1);
}

// ---------------------------------------------------------------------------
// Manual override through HTTP
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_keep_door_closed_after_manual_close() {
    let stack = stack();
    stack.control.iterate(midsummer_noon()).await.unwrap();

    let resp = stack.app.clone().oneshot(get("/?close=")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers()[header::LOCATION], "/");
    assert_eq!(stack.gpio.value(DOOR), Some(LineValue::High));

    let outcome = stack.control.iterate(midsummer_noon()).await.unwrap();
    assert_eq!(outcome, Ensured::InPlace(Action::Close));
}

#[tokio::test(start_paused = true)]
async fn should_resume_schedule_after_auto() {
    let stack = stack();
    stack.app.clone().oneshot(get("/?close=")).await.unwrap();

    let resp = stack.app.clone().oneshot(get("/?auto=")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);

    stack.control.iterate(midsummer_noon()).await.unwrap();
    assert_eq!(stack.gpio.value(DOOR), Some(LineValue::Low));
}

#[tokio::test(start_paused = true)]
async fn should_show_manual_mode_on_the_page() {
    let stack = stack();
    stack.app.clone().oneshot(get("/?open=")).await.unwrap();

    let resp = stack.app.clone().oneshot(get("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(
        resp.into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec(),
    )
    .unwrap();
    assert!(body.contains("<title>coop: open</title>"));
    assert!(body.contains("open (manual)"));
}

#[tokio::test(start_paused = true)]
async fn should_return_404_for_unknown_path() {
    let stack = stack();

    let resp = stack.app.oneshot(get("/status")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Fault containment
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn should_keep_running_while_door_line_is_faulty() {
    let stack = stack();
    stack.control.iterate(midsummer_night()).await.unwrap();
    stack.gpio.inject_fault(DOOR);

    assert!(stack.control.iterate(midsummer_noon()).await.is_err());
    let resp = stack.app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    stack.gpio.clear_fault(DOOR);
    stack.control.iterate(midsummer_noon()).await.unwrap();
    assert_eq!(stack.gpio.value(DOOR), Some(LineValue::Low));
}
