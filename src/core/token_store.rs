// src/core/token_store.rs
//! Session storage. One canonical store holds the bearer token and the
//! logged-in user; the cookie form is derived from it on demand.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

use super::fs_ops::FsOps;

pub const COOKIE_NAME: &str = "auth_token";
pub const COOKIE_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<Value>,
}

impl Session {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user: None,
        }
    }
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Session>;

    async fn save(&self, session: &Session) -> Result<()>;

    async fn clear(&self) -> Result<()> {
        self.save(&Session::default()).await
    }

    async fn token(&self) -> Result<Option<String>> {
        Ok(self.load().await?.token.filter(|t| !t.trim().is_empty()))
    }
}

/// Process-local store, used by tests and one-shot commands
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: RwLock<Session>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(Session::with_token(token)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Session> {
        self.session
            .read()
            .map(|s| s.clone())
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))?;
        *guard = session.clone();
        Ok(())
    }
}

/// JSON file store; a missing file is an empty session
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Session> {
        if !FsOps::file_accessible(&self.path).await {
            return Ok(Session::default());
        }

        let content = FsOps::read_file_safe(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Session::default());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Corrupt session file: {}", self.path.display()))
    }

    async fn save(&self, session: &Session) -> Result<()> {
        let content =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        FsOps::write_file_safe(&self.path, &content).await?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        FsOps::remove_file(&self.path).await
    }
}

/// `Set-Cookie` form of the token: 7 days, `SameSite=Lax`
pub fn cookie_header(token: &str) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; SameSite=Lax",
        COOKIE_NAME, token, COOKIE_MAX_AGE_SECS
    )
}

/// Cookie that expires the token immediately
pub fn expired_cookie_header() -> String {
    format!("{}=; Max-Age=0; Path=/; SameSite=Lax", COOKIE_NAME)
}
