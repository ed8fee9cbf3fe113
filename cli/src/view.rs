//! Plain-text rendering of the two screens.

use todo_core::{AuthTab, EditForm, Todo, User};

pub const TITLE: &str = "To-Do App";
pub const EMPTY_LIST: &str = "No todos yet. Add one with `add`!";
pub const DELETE_CONFIRM: &str = "Are you sure you want to delete this todo? [y/N] ";

pub fn tab_bar(tab: AuthTab) -> &'static str {
    match tab {
        AuthTab::Login => "[Login]  Register",
        AuthTab::Register => "Login  [Register]",
    }
}

pub fn auth_screen(tab: AuthTab) -> String {
    let action = match tab {
        AuthTab::Login => "log in",
        AuthTab::Register => "register",
    };
    format!(
        "{TITLE}\n\n  {}\n\nPress Enter to {action}, `tab` to switch forms, `help` for commands.\n",
        tab_bar(tab)
    )
}

pub fn completion_marker(todo: &Todo) -> &'static str {
    if todo.completed {
        "✓"
    } else {
        "○"
    }
}

pub fn todo_screen(user: &User, todos: &[Todo], editing: Option<&EditForm>) -> String {
    let mut out = format!("{TITLE}    Welcome, {}!\n\nYour Todos ({})\n", user.username, todos.len());
    if todos.is_empty() {
        out.push_str(&format!("  {EMPTY_LIST}\n"));
        return out;
    }
    for (i, todo) in todos.iter().enumerate() {
        match editing.filter(|form| form.id == todo.id) {
            Some(form) => out.push_str(&edit_item(i + 1, form)),
            None => out.push_str(&todo_item(i + 1, todo)),
        }
    }
    out
}

fn todo_item(n: usize, todo: &Todo) -> String {
    let mut item = format!("{n:>3}. {} {}\n", completion_marker(todo), todo.title);
    if let Some(description) = todo.description() {
        item.push_str(&format!("       {description}\n"));
    }
    item.push_str(&format!("       Created: {}\n", todo.created_date()));
    item
}

fn edit_item(n: usize, form: &EditForm) -> String {
    let mut item = format!("{n:>3}. [editing] {}\n", form.title);
    if !form.description.is_empty() {
        item.push_str(&format!("       {}\n", form.description));
    }
    item.push_str("       `save` to retry, `cancel` to discard\n");
    item
}

pub fn auth_help() -> &'static str {
    "Commands:\n  \
     <Enter>    submit the current form\n  \
     login      log in with username and password\n  \
     register   create an account\n  \
     tab        switch between the login and register forms\n  \
     quit       exit\n"
}

pub fn todo_help() -> &'static str {
    "Commands:\n  \
     add [title]   add a todo (prompts for title and description)\n  \
     toggle <n>    mark todo n complete or incomplete\n  \
     edit <n>      change the title and description of todo n\n  \
     save          retry saving the open edit\n  \
     cancel        discard the open edit\n  \
     delete <n>    delete todo n\n  \
     refresh       reload todos from the server\n  \
     logout        end the session\n  \
     quit          exit\n"
}
