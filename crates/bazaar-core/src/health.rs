use std::fmt::Display;

use axum::http::StatusCode;

/// `GET /healthz`: process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map a dependency probe onto a `GET /readyz` status.
pub fn readiness<E: Display>(probe: Result<(), E>) -> StatusCode {
    match probe {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
