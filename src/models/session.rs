use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// The signed-in user, handed explicitly to every command that touches user data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

/// Persists the session as a small JSON file. Load/save/clear are the only
/// lifecycle hooks; nothing reads the file behind the caller's back.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        let session = serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt session file: {}", self.path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session file: {}", self.path.display()))?;
        }
        Ok(())
    }
}
