//! UUID path parameter extractor.

use crate::errors::{ErrorCode, error_response};
use axum::{
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::Response,
};
use uuid::Uuid;

/// Single UUID path parameter.
///
/// A segment that is not a UUID is rejected with 400 `INVALID_UUID` before
/// the handler runs.
///
/// ```ignore
/// async fn get_product(UuidPath(id): UuidPath) -> String {
///     format!("Product {id}")
/// }
///
/// let app = Router::new().route("/products/{id}", get(get_product));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| error_response(e.status(), e.body_text(), ErrorCode::InvalidPath))?;

        Uuid::parse_str(&raw).map(UuidPath).map_err(|_| {
            tracing::debug!(id = %raw, "Rejected malformed UUID path parameter");
            error_response(
                StatusCode::BAD_REQUEST,
                format!("{}: '{}'", ErrorCode::InvalidUuid.default_message(), raw),
                ErrorCode::InvalidUuid,
            )
        })
    }
}
