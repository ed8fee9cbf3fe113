//! Terminal front end for the todo service.
//!
//! Wires `todo_core::App` to a blocking ureq transport, a token file and a
//! line-oriented shell that renders either the login/register screen or the
//! todo list.

pub mod config;
pub mod shell;
pub mod transport;
pub mod view;

pub use config::Args;
pub use shell::{Command, Shell};
pub use transport::UreqTransport;
