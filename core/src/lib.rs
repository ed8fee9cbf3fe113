//! Client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that sit the
//! session store, the todo list store, and `App`, which maps each user action
//! to one or two round-trips executed through a host-supplied `Transport`.
//!
//! # Design
//! - `ApiClient` holds only `base_url` and the current bearer token.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - The session token is persisted through a `TokenStore`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod storage;
pub mod todos;
pub mod types;

#[cfg(test)]
mod test_support;

pub use app::{Alert, App, AuthTab, EditForm, Screen};
pub use client::ApiClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use session::Session;
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use todos::TodoList;
pub use types::{CreateTodo, Credentials, LoginResponse, Todo, TodoId, UpdateTodo, User};
