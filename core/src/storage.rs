//! Persistence of the session token between runs.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ApiError;

/// Local storage for the single active session token.
pub trait TokenStore {
    fn load(&self) -> Result<Option<String>, ApiError>;
    fn save(&mut self, token: &str) -> Result<(), ApiError>;
    fn clear(&mut self) -> Result<(), ApiError>;
}

/// Keeps the token in memory only; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, ApiError> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<(), ApiError> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ApiError> {
        self.token = None;
        Ok(())
    }
}

/// Stores the token as the sole content of a file, creating parent
/// directories on first save. On unix the file is readable by its owner
/// only.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, ApiError> {
        match fs::read_to_string(&self.path) {
            Ok(s) => {
                let token = s.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, token: &str) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&self.path)?;
        // `mode` only applies on creation.
        #[cfg(unix)]
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
        file.write_all(token.as_bytes())?;
        debug!(path = %self.path.display(), "session token saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
