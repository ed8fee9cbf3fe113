//! HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `ApiClient` holds the `base_url` and, once logged in, the bearer token.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller executes the round-trip in between, keeping this module free of
//! I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    CreateTodo, Credentials, ErrorBody, LoginResponse, Todo, TodoEnvelope, TodoId,
    TodoListEnvelope, UpdateTodo, User,
};

/// Request builder and response parser for the todo API.
///
/// The token set with `set_token` is attached as `Authorization: Bearer` to
/// every request built afterwards.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    // -- auth ---------------------------------------------------------------

    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/login", credentials)
    }

    pub fn build_register(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/auth/register", credentials)
    }

    pub fn build_profile(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/auth/profile")
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 201)
    }

    pub fn parse_profile(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    // -- todos --------------------------------------------------------------

    pub fn build_list_todos(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todos/")
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/todos/", input)
    }

    pub fn build_toggle_todo(&self, id: &TodoId) -> HttpRequest {
        self.request(HttpMethod::Patch, &format!("/todos/{id}/toggle"))
    }

    pub fn build_update_todo(&self, id: &TodoId, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/todos/{id}"), input)
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/todos/{id}"))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, 200)?;
        decode::<TodoListEnvelope>(&response).map(|e| e.todos)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 201)?;
        decode::<TodoEnvelope>(&response).map(|e| e.todo)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        decode::<TodoEnvelope>(&response).map(|e| e.todo)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        decode::<TodoEnvelope>(&response).map(|e| e.todo)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body: None,
        }
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut req = self.request(method, path);
        req.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        req.body = Some(body);
        Ok(req)
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant,
/// carrying the server's message when it sent one.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let message = error_message(response);
    Err(match response.status {
        401 => ApiError::Unauthorized { message },
        404 => ApiError::NotFound { message },
        status => ApiError::HttpError { status, message },
    })
}

fn error_message(response: &HttpResponse) -> String {
    let body: ErrorBody = serde_json::from_str(&response.body).unwrap_or_default();
    body.error
        .or(body.msg)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Request failed with status code {}", response.status))
}
