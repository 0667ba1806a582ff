use anyhow::Result;
use moviephile_models::User;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Default)]
struct SessionData {
    #[serde(default)]
    user: Option<User>,
}

/// File-backed cache of the current user.
///
/// This is a convenience for restoring the session between runs; nothing in it
/// is verified.
pub struct SessionStore {
    path: PathBuf,
    user: Option<User>,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path, user: None }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let data: SessionData = toml::from_str(&content)?;
            self.user = data.user;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = SessionData {
            user: self.user.clone(),
        };
        let content = toml::to_string_pretty(&data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Remove the session file entirely
    pub fn clear(&mut self) -> Result<()> {
        self.user = None;
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
