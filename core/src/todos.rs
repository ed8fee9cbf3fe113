//! In-memory todo list for the current session.
//!
//! The server owns every todo. This list is a cached copy: replaced
//! wholesale by `list`, patched item by item after each confirmed mutation.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{CreateTodo, Todo, TodoId, UpdateTodo};

#[derive(Debug, Default, Clone)]
pub struct TodoList {
    items: Vec<Todo>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.items.iter().find(|t| &t.id == id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Fetch the user's todos and replace the local copy.
    pub fn list(&mut self, client: &ApiClient, transport: &impl Transport) -> Result<&[Todo], ApiError> {
        let todos = client.parse_list_todos(transport.execute(client.build_list_todos())?)?;
        debug!(count = todos.len(), "fetched todos");
        self.items = todos;
        Ok(&self.items)
    }

    /// Create a todo and put the server's copy at the front of the list.
    pub fn create(
        &mut self,
        client: &ApiClient,
        transport: &impl Transport,
        title: &str,
        description: Option<&str>,
    ) -> Result<&Todo, ApiError> {
        let input = CreateTodo {
            title: title.to_string(),
            description: description.map(str::to_string),
        };
        let req = client.build_create_todo(&input)?;
        let todo = client.parse_create_todo(transport.execute(req)?)?;
        debug!(id = %todo.id, "created todo");
        self.items.insert(0, todo);
        Ok(&self.items[0])
    }

    pub fn toggle(
        &mut self,
        client: &ApiClient,
        transport: &impl Transport,
        id: &TodoId,
    ) -> Result<&Todo, ApiError> {
        let todo = client.parse_toggle_todo(transport.execute(client.build_toggle_todo(id))?)?;
        debug!(%id, completed = todo.completed, "toggled todo");
        Ok(self.replace(todo))
    }

    /// Replace title and description. An absent description clears it.
    pub fn update(
        &mut self,
        client: &ApiClient,
        transport: &impl Transport,
        id: &TodoId,
        title: &str,
        description: Option<&str>,
    ) -> Result<&Todo, ApiError> {
        let input = UpdateTodo {
            title: Some(title.to_string()),
            description: Some(description.unwrap_or_default().to_string()),
            completed: None,
        };
        let req = client.build_update_todo(id, &input)?;
        let todo = client.parse_update_todo(transport.execute(req)?)?;
        debug!(%id, "updated todo");
        Ok(self.replace(todo))
    }

    pub fn delete(&mut self, client: &ApiClient, transport: &impl Transport, id: &TodoId) -> Result<(), ApiError> {
        client.parse_delete_todo(transport.execute(client.build_delete_todo(id))?)?;
        debug!(%id, "deleted todo");
        self.items.retain(|t| &t.id != id);
        Ok(())
    }

    /// Swap in the server's copy of a todo. A todo missing locally (the list
    /// was refreshed meanwhile) is appended instead.
    fn replace(&mut self, todo: Todo) -> &Todo {
        match self.items.iter().position(|t| t.id == todo.id) {
            Some(i) => {
                self.items[i] = todo;
                &self.items[i]
            }
            None => {
                self.items.push(todo);
                &self.items[self.items.len() - 1]
            }
        }
    }
}
