use axum::http::StatusCode;

use crate::app::errors;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// JSON body for unknown paths, matching the error shape of the API proper.
pub async fn not_found() -> axum::response::Response {
    errors::json_error(
        StatusCode::NOT_FOUND,
        errors::CODE_VALIDATION,
        "API method not found",
    )
}
