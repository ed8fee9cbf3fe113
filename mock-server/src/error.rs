use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failure answered by a route. Route errors use an `error` field; token
/// failures use `msg`, matching the JWT layer of the real service.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(&'static str),
    InvalidCredentials,
    NotFound(&'static str),
    MissingToken,
    InvalidToken,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "Invalid credentials" }))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::MissingToken => {
                (StatusCode::UNAUTHORIZED, json!({ "msg": "Missing Authorization Header" }))
            }
            ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, json!({ "msg": "Invalid token" })),
        };

        (status, Json(body)).into_response()
    }
}
