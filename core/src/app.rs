//! Application state and the handlers a view binds user actions to.
//!
//! # Design
//! Each handler is one user action: it issues at most a couple of requests,
//! applies the result to the session or todo list, and reports failure as a
//! single flat `Alert`. Nothing is retried and nothing runs in the
//! background. The screen to render is derived from whether a user profile
//! is loaded.

use std::fmt;

use tracing::{debug, error, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::session::Session;
use crate::storage::TokenStore;
use crate::todos::TodoList;
use crate::types::{Credentials, Todo, TodoId, User};

pub const REGISTERED_NOTICE: &str = "Registration successful! Please login.";

/// Which form the authentication screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    Register,
}

impl AuthTab {
    pub fn other(self) -> Self {
        match self {
            AuthTab::Login => AuthTab::Register,
            AuthTab::Register => AuthTab::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth(AuthTab),
    Todos,
}

/// Fields of the todo currently being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub id: TodoId,
    pub title: String,
    pub description: String,
}

/// User-facing failure message for a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert(pub String);

impl Alert {
    fn from_api(action: &str, err: &ApiError) -> Self {
        debug!(%action, error = %err, "request failed");
        Alert(format!("{action}: {err}"))
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct App<T, S> {
    client: ApiClient,
    transport: T,
    session: Session<S>,
    todos: TodoList,
    tab: AuthTab,
    editing: Option<EditForm>,
}

impl<T: Transport, S: TokenStore> App<T, S> {
    pub fn new(base_url: &str, transport: T, store: S) -> Self {
        Self {
            client: ApiClient::new(base_url),
            transport,
            session: Session::new(store),
            todos: TodoList::new(),
            tab: AuthTab::default(),
            editing: None,
        }
    }

    pub fn screen(&self) -> Screen {
        if self.session.is_logged_in() {
            Screen::Todos
        } else {
            Screen::Auth(self.tab)
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn todos(&self) -> &[Todo] {
        self.todos.items()
    }

    pub fn tab(&self) -> AuthTab {
        self.tab
    }

    pub fn token_store(&self) -> &S {
        self.session.store()
    }

    pub fn edit_form(&self) -> Option<&EditForm> {
        self.editing.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        self.editing.as_mut()
    }

    pub fn select_tab(&mut self, tab: AuthTab) {
        self.tab = tab;
    }

    /// Resume a persisted session: attach the stored token, then load the
    /// profile and the todos. Every failure here is logged, never alerted;
    /// a rejected token leaves the app on the login screen.
    pub fn restore(&mut self) {
        match self.session.attach_persisted(&mut self.client) {
            Ok(true) => self.load_user_data(),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "could not read persisted token"),
        }
    }

    pub fn login(&mut self, credentials: &Credentials) -> Result<(), Alert> {
        self.session
            .login(&mut self.client, &self.transport, credentials)
            .map_err(|e| Alert::from_api("Login failed", &e))?;
        self.load_user_data();
        Ok(())
    }

    /// Register an account and switch to the login tab. Returns the notice
    /// to show on success.
    pub fn register(&mut self, credentials: &Credentials) -> Result<&'static str, Alert> {
        self.session
            .register(&self.client, &self.transport, credentials)
            .map_err(|e| Alert::from_api("Registration failed", &e))?;
        self.tab = AuthTab::Login;
        Ok(REGISTERED_NOTICE)
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.session.logout(&mut self.client) {
            warn!(error = %e, "could not remove persisted token");
        }
        self.todos.clear();
        self.editing = None;
        self.tab = AuthTab::Login;
    }

    pub fn refresh(&mut self) -> Result<(), Alert> {
        self.todos
            .list(&self.client, &self.transport)
            .map(|_| ())
            .map_err(|e| Alert::from_api("Error fetching todos", &e))
    }

    /// Create a todo from the add form. A blank title is ignored and reported
    /// as `Ok(false)`.
    pub fn add_todo(&mut self, title: &str, description: &str) -> Result<bool, Alert> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(false);
        }
        let description = Some(description.trim()).filter(|d| !d.is_empty());
        self.todos
            .create(&self.client, &self.transport, title, description)
            .map_err(|e| Alert::from_api("Error adding todo", &e))?;
        Ok(true)
    }

    pub fn toggle(&mut self, id: &TodoId) -> Result<(), Alert> {
        self.todos
            .toggle(&self.client, &self.transport, id)
            .map(|_| ())
            .map_err(|e| Alert::from_api("Error toggling todo", &e))
    }

    /// Open the edit form for `id`, prefilled from the cached todo.
    pub fn begin_edit(&mut self, id: &TodoId) -> Option<&mut EditForm> {
        let todo = self.todos.get(id)?;
        self.editing = Some(EditForm {
            id: todo.id.clone(),
            title: todo.title.clone(),
            description: todo.description.clone().unwrap_or_default(),
        });
        self.editing.as_mut()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Submit the edit form. The form stays open when the title is blank or
    /// the request fails.
    pub fn save_edit(&mut self) -> Result<(), Alert> {
        let Some(form) = &self.editing else {
            return Ok(());
        };
        let title = form.title.trim();
        if title.is_empty() {
            return Err(Alert("Title cannot be empty".to_string()));
        }
        let description = Some(form.description.trim()).filter(|d| !d.is_empty());
        self.todos
            .update(&self.client, &self.transport, &form.id, title, description)
            .map_err(|e| Alert::from_api("Error updating todo", &e))?;
        self.editing = None;
        Ok(())
    }

    pub fn delete(&mut self, id: &TodoId) -> Result<(), Alert> {
        self.todos
            .delete(&self.client, &self.transport, id)
            .map_err(|e| Alert::from_api("Error deleting todo", &e))?;
        if self.editing.as_ref().is_some_and(|f| &f.id == id) {
            self.editing = None;
        }
        Ok(())
    }

    fn load_user_data(&mut self) {
        if self
            .session
            .load_profile(&mut self.client, &self.transport)
            .is_err()
        {
            return;
        }
        if let Err(e) = self.todos.list(&self.client, &self.transport) {
            error!(error = %e, "error fetching todos");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::storage::MemoryTokenStore;
    use crate::test_support::{todo_json, Scripted};

    const PROFILE: &str = r#"{"username":"testuser","created_at":"2024-01-01T00:00:00"}"#;

    fn list_body(todos: &[String]) -> String {
        format!(r#"{{"todos":[{}]}}"#, todos.join(","))
    }

    fn logged_in(todos: &[String]) -> App<Scripted, MemoryTokenStore> {
        let transport = Scripted::new(vec![
            HttpResponse::new(200, PROFILE),
            HttpResponse::new(200, list_body(todos)),
        ]);
        let mut app = App::new("http://api.test", transport, MemoryTokenStore::with_token("abc"));
        app.restore();
        app
    }

    #[test]
    fn unauthenticated_start_shows_login() {
        let mut app = App::new("http://api.test", Scripted::new(Vec::new()), MemoryTokenStore::new());
        app.restore();
        assert_eq!(app.screen(), Screen::Auth(AuthTab::Login));
        assert_eq!(app.transport.request_count(), 0);
    }

    #[test]
    fn switching_tabs() {
        let mut app = App::new("http://api.test", Scripted::new(Vec::new()), MemoryTokenStore::new());
        app.select_tab(app.tab().other());
        assert_eq!(app.screen(), Screen::Auth(AuthTab::Register));
    }

    #[test]
    fn persisted_token_loads_profile_and_todos() {
        let app = logged_in(&[todo_json("1", "First todo", false)]);
        assert_eq!(app.screen(), Screen::Todos);
        assert_eq!(app.user().unwrap().username, "testuser");
        assert_eq!(app.todos().len(), 1);

        let seen = app.transport.seen.borrow();
        assert_eq!(seen[0].path, "http://api.test/auth/profile");
        assert_eq!(seen[1].path, "http://api.test/todos/");
        assert_eq!(seen[1].header("authorization"), Some("Bearer abc"));
    }

    #[test]
    fn rejected_token_is_cleared_silently() {
        let transport = Scripted::new(vec![HttpResponse::new(401, r#"{"msg":"Token has expired"}"#)]);
        let mut app = App::new("http://api.test", transport, MemoryTokenStore::with_token("old"));
        app.restore();

        assert_eq!(app.screen(), Screen::Auth(AuthTab::Login));
        assert_eq!(app.token_store().load().unwrap(), None);
        assert_eq!(app.transport.request_count(), 1);
    }

    #[test]
    fn login_stores_token_and_loads_data() {
        let transport = Scripted::new(vec![
            HttpResponse::new(200, r#"{"access_token":"tok123","user":{"username":"loginuser"}}"#),
            HttpResponse::new(200, PROFILE),
            HttpResponse::new(200, list_body(&[todo_json("1", "First todo", false)])),
        ]);
        let mut app = App::new("http://api.test", transport, MemoryTokenStore::new());

        app.login(&Credentials::new("u", "p")).unwrap();

        assert_eq!(app.screen(), Screen::Todos);
        assert_eq!(app.user().unwrap().username, "testuser");
        assert_eq!(app.token_store().load().unwrap().as_deref(), Some("tok123"));
        assert_eq!(app.todos().len(), 1);
    }

    #[test]
    fn login_failure_alerts_with_server_message() {
        let transport = Scripted::new(vec![HttpResponse::new(401, r#"{"error":"Invalid credentials"}"#)]);
        let mut app = App::new("http://api.test", transport, MemoryTokenStore::new());

        let alert = app.login(&Credentials::new("u", "bad")).unwrap_err();
        assert_eq!(alert.to_string(), "Login failed: Invalid credentials");
        assert_eq!(app.screen(), Screen::Auth(AuthTab::Login));
    }

    #[test]
    fn login_network_failure_alerts() {
        let mut app = App::new("http://api.test", Scripted::new(Vec::new()), MemoryTokenStore::new());
        let alert = app.login(&Credentials::new("u", "p")).unwrap_err();
        assert_eq!(alert.to_string(), "Login failed: network error: connection refused");
    }

    #[test]
    fn register_switches_to_login_tab() {
        let transport = Scripted::new(vec![HttpResponse::new(201, r#"{"message":"User registered successfully"}"#)]);
        let mut app = App::new("http://api.test", transport, MemoryTokenStore::new());
        app.select_tab(AuthTab::Register);

        let notice = app.register(&Credentials::new("new", "pw")).unwrap();
        assert_eq!(notice, REGISTERED_NOTICE);
        assert_eq!(app.screen(), Screen::Auth(AuthTab::Login));
        assert_eq!(app.token_store().load().unwrap(), None);
    }

    #[test]
    fn register_failure_stays_on_register_tab() {
        let transport = Scripted::new(vec![HttpResponse::new(400, r#"{"error":"User already exists"}"#)]);
        let mut app = App::new("http://api.test", transport, MemoryTokenStore::new());
        app.select_tab(AuthTab::Register);

        let alert = app.register(&Credentials::new("dup", "pw")).unwrap_err();
        assert_eq!(alert.0, "Registration failed: User already exists");
        assert_eq!(app.tab(), AuthTab::Register);
    }

    #[test]
    fn add_todo_prepends() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.transport
            .push(HttpResponse::new(201, format!(r#"{{"todo":{}}}"#, todo_json("2", "New todo", false))));

        assert!(app.add_todo("  New todo ", "").unwrap());
        assert_eq!(app.todos()[0].title, "New todo");
        assert_eq!(app.todos().len(), 2);

        let seen = app.transport.seen.borrow();
        let body: serde_json::Value = serde_json::from_str(seen[2].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "title": "New todo" }));
    }

    #[test]
    fn blank_title_is_ignored() {
        let mut app = logged_in(&[]);
        assert!(!app.add_todo("   ", "desc").unwrap());
        assert_eq!(app.transport.request_count(), 2);
    }

    #[test]
    fn toggle_flips_after_confirmation() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.transport
            .push(HttpResponse::new(200, format!(r#"{{"todo":{}}}"#, todo_json("1", "First todo", true))));

        app.toggle(&TodoId::from("1")).unwrap();
        assert!(app.todos()[0].completed);
        assert_eq!(app.transport.seen.borrow()[2].method, HttpMethod::Patch);
    }

    #[test]
    fn toggle_failure_alerts() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.transport
            .push(HttpResponse::new(404, r#"{"error":"Todo not found"}"#));

        let alert = app.toggle(&TodoId::from("1")).unwrap_err();
        assert_eq!(alert.0, "Error toggling todo: Todo not found");
        assert!(!app.todos()[0].completed);
    }

    #[test]
    fn edit_flow() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        let form = app.begin_edit(&TodoId::from("1")).unwrap();
        assert_eq!(form.title, "First todo");
        assert_eq!(form.description, "");
        form.title = "Renamed".to_string();
        form.description = "details".to_string();

        app.transport.push(HttpResponse::new(
            200,
            r#"{"todo":{"_id":"1","title":"Renamed","description":"details","completed":false,"created_at":"2024-05-01T09:30:00","updated_at":"2024-05-02T09:30:00"}}"#,
        ));
        app.save_edit().unwrap();

        assert!(app.edit_form().is_none());
        assert_eq!(app.todos()[0].title, "Renamed");
        assert_eq!(app.todos()[0].description(), Some("details"));
    }

    #[test]
    fn edit_with_blank_title_is_rejected_locally() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.begin_edit(&TodoId::from("1")).unwrap().title = "  ".to_string();

        let alert = app.save_edit().unwrap_err();
        assert_eq!(alert.0, "Title cannot be empty");
        assert!(app.edit_form().is_some());
        assert_eq!(app.transport.request_count(), 2);
    }

    #[test]
    fn cancel_edit_discards_form() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.begin_edit(&TodoId::from("1"));
        app.cancel_edit();
        assert!(app.edit_form().is_none());
        assert!(app.begin_edit(&TodoId::from("missing")).is_none());
    }

    #[test]
    fn delete_removes_todo() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.transport
            .push(HttpResponse::new(200, r#"{"message":"Todo deleted successfully"}"#));

        app.delete(&TodoId::from("1")).unwrap();
        assert!(app.todos().is_empty());
    }

    #[test]
    fn add_failure_alerts_and_keeps_list() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.transport.push(HttpResponse::new(
            400,
            r#"{"error":"Title must be less than 200 characters"}"#,
        ));

        let alert = app.add_todo(&"x".repeat(201), "").unwrap_err();
        assert_eq!(alert.0, "Error adding todo: Title must be less than 200 characters");
        assert_eq!(app.todos().len(), 1);
    }

    #[test]
    fn failed_save_keeps_form_and_draft() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.begin_edit(&TodoId::from("1")).unwrap().title = "draft".to_string();
        app.transport.push(HttpResponse::new(500, ""));

        let alert = app.save_edit().unwrap_err();
        assert_eq!(alert.0, "Error updating todo: Request failed with status code 500");
        assert_eq!(app.edit_form().unwrap().title, "draft");
        assert_eq!(app.todos()[0].title, "First todo");

        // Retrying the same form succeeds and closes it.
        app.transport
            .push(HttpResponse::new(200, format!(r#"{{"todo":{}}}"#, todo_json("1", "draft", false))));
        app.save_edit().unwrap();
        assert!(app.edit_form().is_none());
        assert_eq!(app.todos()[0].title, "draft");
    }

    #[test]
    fn delete_failure_alerts_and_keeps_todo() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.transport
            .push(HttpResponse::new(404, r#"{"error":"Todo not found"}"#));

        let alert = app.delete(&TodoId::from("1")).unwrap_err();
        assert_eq!(alert.0, "Error deleting todo: Todo not found");
        assert_eq!(app.todos().len(), 1);
    }

    #[test]
    fn refresh_failure_alerts() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.transport
            .push(HttpResponse::new(500, r#"{"error":"boom"}"#));

        let alert = app.refresh().unwrap_err();
        assert_eq!(alert.0, "Error fetching todos: boom");
        assert_eq!(app.todos().len(), 1);
    }

    #[test]
    fn logout_returns_to_login() {
        let mut app = logged_in(&[todo_json("1", "First todo", false)]);
        app.select_tab(AuthTab::Register);
        app.logout();

        assert_eq!(app.screen(), Screen::Auth(AuthTab::Login));
        assert!(app.todos().is_empty());
        assert_eq!(app.token_store().load().unwrap(), None);
    }

    #[test]
    fn failed_todo_fetch_still_logs_in() {
        let transport = Scripted::new(vec![
            HttpResponse::new(200, PROFILE),
            HttpResponse::new(500, r#"{"error":"boom"}"#),
        ]);
        let mut app = App::new("http://api.test", transport, MemoryTokenStore::with_token("abc"));
        app.restore();

        assert_eq!(app.screen(), Screen::Todos);
        assert!(app.todos().is_empty());
    }
}
