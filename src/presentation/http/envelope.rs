use axum::Json;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use crate::domain::error::ApiError;

/// Reported as `apiVersion` in every response envelope.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `{"apiVersion": ..., "data": ...}` success envelope.
pub fn data<T: Serialize>(value: T) -> Response {
    Json(json!({ "apiVersion": API_VERSION, "data": value })).into_response()
}

/// An [`ApiError`] on its way out as a `{"apiVersion", "error"}` envelope.
#[derive(Debug)]
pub struct ErrorResponse(pub ApiError);

impl From<ApiError> for ErrorResponse {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let (status, error) = match self.0 {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "code": 404, "message": "User not found." }),
            ),
            ApiError::Auth(message) => (
                StatusCode::UNAUTHORIZED,
                json!({ "code": 401, "message": message }),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "code": 400, "errors": errors }),
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "code": 400, "message": message }),
            ),
            ApiError::Storage(e) => {
                tracing::error!(error = ?e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "code": 500, "message": "Storage failure." }),
                )
            }
        };
        (
            status,
            Json(json!({ "apiVersion": API_VERSION, "error": error })),
        )
            .into_response()
    }
}

/// `axum::Json` with the rejection rewritten into the error envelope, so a
/// malformed or unknown-field body comes back as a structured 400 like every
/// other validation failure.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ErrorResponse(ApiError::BadRequest(e.body_text())))?;
        Ok(ApiJson(value))
    }
}
