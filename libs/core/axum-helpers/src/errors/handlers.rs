use axum::{http::StatusCode, response::Response};

use super::{ErrorCode, error_response};

/// Router fallback for paths that match no route.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::RouteNotFound.default_message(),
        ErrorCode::RouteNotFound,
    )
}

/// Fallback for a known path called with an unsupported method.
pub async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed.default_message(),
        ErrorCode::MethodNotAllowed,
    )
}
