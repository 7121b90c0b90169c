//! HTTP error response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use coop_domain::error::{CoopError, LineError};

/// Maps [`CoopError`] to a 500 response carrying the error text.
#[derive(Debug)]
pub struct HttpError(CoopError);

impl From<CoopError> for HttpError {
    fn from(err: CoopError) -> Self {
        Self(err)
    }
}

impl From<LineError> for HttpError {
    fn from(err: LineError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}
