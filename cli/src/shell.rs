//! Interactive loop: render the current screen, read one command, hand it
//! to the matching `App` handler, repeat.

use std::io::{self, BufRead, Write};

use todo_core::{App, AuthTab, Credentials, Screen, TodoId, TokenStore, Transport};

use crate::view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit,
    Login,
    Register,
    Tab,
    Add(Option<String>),
    Toggle(usize),
    Edit(usize),
    Save,
    Cancel,
    Delete(usize),
    Refresh,
    Logout,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Todo numbers are 1-based, as rendered.
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let index = || -> Result<usize, String> {
            match rest.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(format!("`{word}` needs a todo number")),
            }
        };
        Ok(match word.to_ascii_lowercase().as_str() {
            "" => Command::Submit,
            "login" => Command::Login,
            "register" => Command::Register,
            "tab" => Command::Tab,
            "add" => Command::Add(Some(rest.to_string()).filter(|t| !t.is_empty())),
            "toggle" => Command::Toggle(index()?),
            "edit" => Command::Edit(index()?),
            "save" => Command::Save,
            "cancel" => Command::Cancel,
            "delete" | "rm" => Command::Delete(index()?),
            "refresh" => Command::Refresh,
            "logout" => Command::Logout,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command `{other}`, try `help`")),
        })
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<T, S, R, W> {
    app: App<T, S>,
    input: R,
    output: W,
}

impl<T, S, R, W> Shell<T, S, R, W>
where
    T: Transport,
    S: TokenStore,
    R: BufRead,
    W: Write,
{
    pub fn new(app: App<T, S>, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    pub fn app(&self) -> &App<T, S> {
        &self.app
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_app(self) -> App<T, S> {
        self.app
    }

    /// Run until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.render()?;
            let Some(line) = self.prompt("> ")? else {
                return Ok(());
            };
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    self.alert(&message)?;
                    continue;
                }
            };
            if let Flow::Quit = self.dispatch(command)? {
                return Ok(());
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let screen = match self.app.user() {
            Some(user) => view::todo_screen(user, self.app.todos(), self.app.edit_form()),
            None => view::auth_screen(self.app.tab()),
        };
        writeln!(self.output)?;
        write!(self.output, "{screen}")
    }

    fn dispatch(&mut self, command: Command) -> io::Result<Flow> {
        match (self.app.screen(), command) {
            (_, Command::Quit) => return Ok(Flow::Quit),
            (Screen::Auth(_), Command::Help) => self.say(view::auth_help())?,
            (Screen::Todos, Command::Help) => self.say(view::todo_help())?,

            (Screen::Auth(tab), Command::Submit) => self.submit(tab)?,
            (Screen::Auth(_), Command::Login) => self.submit(AuthTab::Login)?,
            (Screen::Auth(_), Command::Register) => self.submit(AuthTab::Register)?,
            (Screen::Auth(tab), Command::Tab) => self.app.select_tab(tab.other()),
            (Screen::Auth(_), _) => self.alert("Log in first, or `help` for commands")?,

            (Screen::Todos, Command::Add(title)) => self.add(title)?,
            (Screen::Todos, Command::Toggle(n)) => {
                if let Some(id) = self.todo_id(n)? {
                    let result = self.app.toggle(&id);
                    self.report(result)?;
                }
            }
            (Screen::Todos, Command::Edit(n)) => self.edit(n)?,
            (Screen::Todos, Command::Save) => {
                let result = self.app.save_edit();
                self.report(result)?;
            }
            (Screen::Todos, Command::Cancel) => self.app.cancel_edit(),
            (Screen::Todos, Command::Delete(n)) => self.delete(n)?,
            (Screen::Todos, Command::Refresh) => {
                let result = self.app.refresh();
                self.report(result)?;
            }
            (Screen::Todos, Command::Logout) => self.app.logout(),
            (Screen::Todos, Command::Submit) => {}
            (Screen::Todos, _) => self.alert("Already logged in")?,
        }
        Ok(Flow::Continue)
    }

    fn submit(&mut self, tab: AuthTab) -> io::Result<()> {
        self.app.select_tab(tab);
        let Some(username) = self.prompt("Username: ")? else {
            return Ok(());
        };
        let Some(password) = self.prompt("Password: ")? else {
            return Ok(());
        };
        if username.trim().is_empty() || password.is_empty() {
            return self.alert("Username and password are required");
        }
        let credentials = Credentials::new(username.trim(), password);
        match tab {
            AuthTab::Login => {
                let result = self.app.login(&credentials);
                self.report(result)
            }
            AuthTab::Register => match self.app.register(&credentials) {
                Ok(notice) => self.say(notice),
                Err(alert) => self.alert(&alert.0),
            },
        }
    }

    fn add(&mut self, title: Option<String>) -> io::Result<()> {
        let (title, description) = match title {
            Some(title) => (title, String::new()),
            None => {
                let Some(title) = self.prompt("Title: ")? else {
                    return Ok(());
                };
                let Some(description) = self.prompt("Description (optional): ")? else {
                    return Ok(());
                };
                (title, description)
            }
        };
        let result = self.app.add_todo(&title, &description).map(|_| ());
        self.report(result)
    }

    /// Prompt for new values; Enter keeps the current one and `-` clears the
    /// description.
    fn edit(&mut self, n: usize) -> io::Result<()> {
        let Some(id) = self.todo_id(n)? else {
            return Ok(());
        };
        let Some(form) = self.app.begin_edit(&id) else {
            return Ok(());
        };
        let (title, description) = (form.title.clone(), form.description.clone());

        let Some(new_title) = self.prompt(&format!("Title [{title}]: "))? else {
            self.app.cancel_edit();
            return Ok(());
        };
        let Some(new_description) = self.prompt(&format!("Description [{description}]: "))? else {
            self.app.cancel_edit();
            return Ok(());
        };

        if let Some(form) = self.app.edit_form_mut() {
            if !new_title.is_empty() {
                form.title = new_title;
            }
            match new_description.trim() {
                "" => {}
                "-" => form.description.clear(),
                _ => form.description = new_description,
            }
        }
        let result = self.app.save_edit();
        self.report(result)
    }

    fn delete(&mut self, n: usize) -> io::Result<()> {
        let Some(id) = self.todo_id(n)? else {
            return Ok(());
        };
        let confirmed = self
            .prompt(view::DELETE_CONFIRM)?
            .is_some_and(|answer| matches!(answer.trim(), "y" | "Y" | "yes"));
        if !confirmed {
            return Ok(());
        }
        let result = self.app.delete(&id);
        self.report(result)
    }

    fn todo_id(&mut self, n: usize) -> io::Result<Option<TodoId>> {
        match self.app.todos().get(n - 1) {
            Some(todo) => Ok(Some(todo.id.clone())),
            None => {
                self.alert(&format!("No todo number {n}"))?;
                Ok(None)
            }
        }
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn report(&mut self, result: Result<(), todo_core::Alert>) -> io::Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(alert) => self.alert(&alert.0),
        }
    }

    fn alert(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "! {message}")
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message.trim_end())
    }
}
