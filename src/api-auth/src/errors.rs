use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::views;

/// Any failure a handler can't recover from (database, hashing, ...). Rendered as a generic 500 page;
/// the cause is only logged.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let cause = format!("{:#}", self.0);
        tracing::error!(error = %cause, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Html(views::render_server_error())).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
