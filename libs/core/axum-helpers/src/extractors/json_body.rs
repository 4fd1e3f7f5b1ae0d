//! JSON body extractor with structured rejections.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// `axum::Json` whose rejection (missing content type, malformed JSON,
/// wrong field types) renders as an [`ErrorResponse`](crate::ErrorResponse)
/// with code `JSON_EXTRACTION`, keeping axum's status (400, 415 or 422).
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::from(rejection).into_response())?;

        Ok(JsonBody(value))
    }
}
