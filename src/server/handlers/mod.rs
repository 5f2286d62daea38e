//! HTTP handlers for the server.

pub mod certificates;
pub mod templates;

use axum::http::StatusCode;

use crate::error::LaurelError;

/// Map a library error to a status code and message.
pub(super) fn error_response(e: LaurelError) -> (StatusCode, String) {
    let status = match &e {
        LaurelError::Validation(_) => StatusCode::BAD_REQUEST,
        LaurelError::NotFound(_) => StatusCode::NOT_FOUND,
        LaurelError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        LaurelError::RenderTargetUnavailable(_)
        | LaurelError::Image(_)
        | LaurelError::Document(_)
        | LaurelError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::warn!(error = %e, "Request failed");
    }
    (status, e.to_string())
}
