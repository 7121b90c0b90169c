//! Control page: door state, mode, schedule and the manual command form.

use askama::Template;
use axum::extract::{RawQuery, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use chrono::Local;

use coop_app::ports::{GpioPort, SolarPort};
use coop_domain::action::{Action, Mode};
use coop_domain::time::{Timestamp, now};

use crate::error::HttpError;
use crate::state::AppState;

/// Control page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    state: Action,
    mode: Mode,
    open_at: String,
    close_at: String,
}

impl IntoResponse for HomeTemplate {
    fn into_response(self) -> Response {
        Html(self.to_string()).into_response()
    }
}

/// A command carried by the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Return to the schedule.
    Auto,
    /// Force the door to an action.
    Force(Action),
    /// Anything else; ignored.
    Unknown,
}

impl Command {
    /// Parse the query string: the command is everything before the first
    /// `=` (`?open` and `?open=` are the same, `?open&x` is unknown).
    #[must_use]
    pub fn from_query(query: &str) -> Option<Self> {
        let key = query.split('=').next().unwrap_or_default();
        if key.is_empty() {
            return None;
        }
        Some(match key {
            "auto" => Self::Auto,
            other => other.parse().map_or(Self::Unknown, Self::Force),
        })
    }
}

/// `GET /`: render the page, or apply a command and redirect back.
pub async fn index<G, S>(
    State(state): State<AppState<G, S>>,
    RawQuery(query): RawQuery,
) -> Result<Response, HttpError>
where
    G: GpioPort + 'static,
    S: SolarPort + 'static,
{
    match query.as_deref().and_then(Command::from_query) {
        None => Ok(render(&state, now()).await?.into_response()),
        Some(command) => {
            apply(&state, command).await?;
            Ok(back_home())
        }
    }
}

async fn apply<G, S>(state: &AppState<G, S>, command: Command) -> Result<(), HttpError>
where
    G: GpioPort + 'static,
    S: SolarPort + 'static,
{
    match command {
        Command::Auto => state.overrides.clear(),
        Command::Force(action) => {
            state.overrides.set(action);
            state.controller.ensure(action).await?;
            tokio::time::sleep(state.feedback_delay).await;
        }
        Command::Unknown => {}
    }
    Ok(())
}

async fn render<G, S>(state: &AppState<G, S>, at: Timestamp) -> Result<HomeTemplate, HttpError>
where
    G: GpioPort + 'static,
    S: SolarPort + 'static,
{
    let door = state.controller.door_state().await?;
    let (open_at, close_at) = match state.resolver.resolve(at) {
        Ok(window) => (local_time(window.open_at), local_time(window.close_at)),
        Err(err) => {
            tracing::warn!(error = %err, "rendering without a schedule window");
            (String::new(), String::new())
        }
    };

    Ok(HomeTemplate {
        state: door,
        mode: Mode::of(state.overrides.get()),
        open_at,
        close_at,
    })
}

fn local_time(at: Timestamp) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// `302 Found` to `/`.
fn back_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}
