use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error envelope returned by every service on failure.
///
/// `error` is the short human-readable message; `kind` is a stable
/// machine-readable code.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub kind: &'a str,
}

/// Render an error envelope with the given status.
pub fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message,
            kind,
        }),
    )
        .into_response()
}
