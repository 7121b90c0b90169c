//! Axum router assembly.

use axum::Router;
use axum::http::{StatusCode, Uri};
use axum::routing::get;
use tower_http::trace::TraceLayer;

use coop_app::ports::{GpioPort, SolarPort};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves the control page at `/` and answers every other path with 404.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<G, S>(state: AppState<G, S>) -> Router
where
    G: GpioPort + 'static,
    S: SolarPort + 'static,
{
    Router::new()
        .route("/", get(crate::dashboard::index::<G, S>))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, String) {
    tracing::warn!(path = uri.path(), "unknown path requested");
    (StatusCode::NOT_FOUND, format!("No {}", uri.path()))
}
