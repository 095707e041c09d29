//! Persistence of the session token across process restarts
//!
//! The session client only talks to the [`TokenStore`] trait, and only when
//! the credentials ask for persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::{ApiError, Result, Session};

/// Load/save capability for a cached session
pub trait TokenStore: Send + Sync {
    /// The cached session, or `None` when nothing has been saved
    fn load(&self) -> Result<Option<Session>>;

    /// Replace the cached session
    fn save(&self, session: &Session) -> Result<()>;
}

/// Stores the session as a JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<user cache dir>/ring-sdk/session.json`
    pub fn default_location() -> Result<Self> {
        let cache_dir = dirs::cache_dir().ok_or_else(|| {
            ApiError::TokenStore("no cache directory available on this platform".to_string())
        })?;
        Ok(Self::new(cache_dir.join("ring-sdk").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| {
            ApiError::TokenStore(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        let session = serde_json::from_str(&raw).map_err(|e| {
            ApiError::TokenStore(format!("corrupt token cache {}: {}", self.path.display(), e))
        })?;

        Ok(Some(session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ApiError::TokenStore(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }

        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| ApiError::TokenStore(format!("failed to encode session: {}", e)))?;
        write_private(&self.path, raw.as_bytes()).map_err(|e| {
            ApiError::TokenStore(format!("failed to write {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(path = %self.path.display(), "session token cached");
        Ok(())
    }
}

/// Write a file only the owner can read; the mode applies from creation
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` is ignored when the file already exists
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
}

/// Keeps the session in memory; useful for tests and short-lived embedding
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: Mutex<Option<Session>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }
}
