//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Unauthorized` get dedicated variants because handlers
//! react to them differently (a dropped todo, an expired session). Every
//! other non-2xx response lands in `HttpError`. All variants carry the text a
//! user should see, so `Display` is the flat alert message.

use thiserror::Error;

/// Errors produced while building requests, executing them, or parsing
/// responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("{message}")]
    NotFound { message: String },

    /// The server rejected the credentials or bearer token (401).
    #[error("{message}")]
    Unauthorized { message: String },

    /// Any other unexpected status.
    #[error("{message}")]
    HttpError { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The host could not complete the HTTP round-trip.
    #[error("network error: {0}")]
    Transport(String),

    /// The session token could not be read or written.
    #[error("token storage failed: {0}")]
    Storage(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Storage(err.to_string())
    }
}
