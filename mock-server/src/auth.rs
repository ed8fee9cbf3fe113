use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use crate::error::ApiError;
use crate::Db;

/// Username behind the request's bearer token.
pub struct AuthUser(pub String);

impl FromRequestParts<Db> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(ApiError::MissingToken)?;

        match db.read().await.tokens.get(token.trim()) {
            Some(username) => Ok(AuthUser(username.clone())),
            None => {
                warn!("rejected unknown bearer token");
                Err(ApiError::InvalidToken)
            }
        }
    }
}
