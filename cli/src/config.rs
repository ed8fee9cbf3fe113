//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal client for the todo service")]
pub struct Args {
    /// Base URL of the API, including its path prefix.
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// File holding the session token between runs.
    #[arg(long, env = "TODO_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory; pass --token-file")]
    NoConfigDir,
}

impl Args {
    pub fn token_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.token_file {
            Some(path) => Ok(path.clone()),
            None => default_token_path().ok_or(ConfigError::NoConfigDir),
        }
    }
}

/// `<config dir>/todo-client/token`.
pub fn default_token_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("todo-client").join("token"))
}
