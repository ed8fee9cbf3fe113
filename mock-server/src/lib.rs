//! In-memory implementation of the todo service API.
//!
//! Serves the same routes, status codes and JSON envelopes as the real
//! backend so clients can be exercised end to end. Nothing is persisted.

pub mod auth;
pub mod error;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

use auth::AuthUser;
use error::ApiError;

const MAX_TITLE_CHARS: usize = 200;
const MAX_DESCRIPTION_CHARS: usize = 1000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

struct UserRecord {
    password: String,
    created_at: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Users, issued tokens and todos. Todos are kept newest first.
#[derive(Default)]
pub struct Store {
    users: HashMap<String, UserRecord>,
    pub(crate) tokens: HashMap<String, String>,
    todos: Vec<Todo>,
}

impl Store {
    fn user_todo_mut(&mut self, id: &str, username: &str) -> Option<&mut Todo> {
        self.todos
            .iter_mut()
            .find(|t| t.id == id && t.username == username)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/profile", get(profile))
        .route("/api/todos/", get(list_todos).post(create_todo))
        .route("/api/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/api/todos/{id}/toggle", patch(toggle_todo))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid todo ID"))
}

fn validate_title(title: &str) -> Result<String, ApiError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Title cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::BadRequest("Title must be less than 200 characters"));
    }
    Ok(title.to_string())
}

fn validate_description(description: &str) -> Result<String, ApiError> {
    let description = description.trim();
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(ApiError::BadRequest(
            "Description must be less than 1000 characters",
        ));
    }
    Ok(description.to_string())
}

async fn register(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if input.username.is_empty() || input.password.is_empty() {
        return Err(ApiError::BadRequest("Username and password are required"));
    }
    let mut store = db.write().await;
    if store.users.contains_key(&input.username) {
        return Err(ApiError::BadRequest("User already exists"));
    }
    store.users.insert(
        input.username.clone(),
        UserRecord {
            password: input.password,
            created_at: now(),
        },
    );
    info!(username = %input.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

async fn login(State(db): State<Db>, Json(input): Json<Credentials>) -> Result<Json<Value>, ApiError> {
    if input.username.is_empty() || input.password.is_empty() {
        return Err(ApiError::BadRequest("Username and password are required"));
    }
    let mut store = db.write().await;
    match store.users.get(&input.username) {
        Some(user) if user.password == input.password => {}
        _ => return Err(ApiError::InvalidCredentials),
    }
    let token = Uuid::new_v4().simple().to_string();
    store.tokens.insert(token.clone(), input.username.clone());
    Ok(Json(json!({
        "access_token": token,
        "user": { "username": input.username },
    })))
}

async fn profile(State(db): State<Db>, AuthUser(username): AuthUser) -> Result<Json<Value>, ApiError> {
    let store = db.read().await;
    let user = store
        .users
        .get(&username)
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(json!({
        "username": username,
        "created_at": user.created_at,
    })))
}

async fn list_todos(State(db): State<Db>, AuthUser(username): AuthUser) -> Json<Value> {
    let store = db.read().await;
    let todos: Vec<&Todo> = store
        .todos
        .iter()
        .filter(|t| t.username == username)
        .collect();
    Json(json!({ "todos": todos }))
}

async fn create_todo(
    State(db): State<Db>,
    AuthUser(username): AuthUser,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if input.title.is_empty() {
        return Err(ApiError::BadRequest("Title is required"));
    }
    let title = validate_title(&input.title)?;
    let description = validate_description(&input.description)?;
    let created_at = now();
    let todo = Todo {
        id: Uuid::new_v4().to_string(),
        username,
        title,
        description,
        completed: false,
        updated_at: created_at.clone(),
        created_at,
    };
    db.write().await.todos.insert(0, todo.clone());
    Ok((StatusCode::CREATED, Json(json!({ "todo": todo }))))
}

async fn update_todo(
    State(db): State<Db>,
    AuthUser(username): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Value>, ApiError> {
    parse_id(&id)?;
    let title = input.title.as_deref().map(validate_title).transpose()?;
    let description = input
        .description
        .as_deref()
        .map(validate_description)
        .transpose()?;

    let mut store = db.write().await;
    let todo = store
        .user_todo_mut(&id, &username)
        .ok_or(ApiError::NotFound("Todo not found"))?;
    if let Some(title) = title {
        todo.title = title;
    }
    if let Some(description) = description {
        todo.description = description;
    }
    if let Some(completed) = input.completed {
        todo.completed = completed;
    }
    todo.updated_at = now();
    Ok(Json(json!({ "todo": todo })))
}

async fn toggle_todo(
    State(db): State<Db>,
    AuthUser(username): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    parse_id(&id)?;
    let mut store = db.write().await;
    let todo = store
        .user_todo_mut(&id, &username)
        .ok_or(ApiError::NotFound("Todo not found"))?;
    todo.completed = !todo.completed;
    todo.updated_at = now();
    Ok(Json(json!({ "todo": todo })))
}

async fn delete_todo(
    State(db): State<Db>,
    AuthUser(username): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    parse_id(&id)?;
    let mut store = db.write().await;
    let before = store.todos.len();
    store
        .todos
        .retain(|t| !(t.id == id && t.username == username));
    if store.todos.len() == before {
        return Err(ApiError::NotFound("Todo not found"));
    }
    Ok(Json(json!({ "message": "Todo deleted successfully" })))
}
