//! Persisted session credential

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// File-backed holder for the bearer credential. The credential is read
/// once on open and kept in memory; `set_token` and `clear` write through
/// to disk so the session survives restarts.
#[derive(Debug)]
pub struct SessionStore {
    dir: PathBuf,
    token: Option<String>,
}

impl SessionStore {
    /// Open the store, loading a previously persisted credential if one
    /// exists. A missing file is not an error; an unparseable one is
    /// treated as absent.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let path = dir.join(SESSION_FILE);

        let token = if path.exists() {
            let contents = fs::read_to_string(&path).context("Failed to read session file")?;
            match serde_json::from_str::<StoredSession>(&contents) {
                Ok(stored) => Some(stored.token),
                Err(e) => {
                    warn!("Ignoring unparseable session file {}: {}", path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Self { dir, token })
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Store a new credential in memory and on disk. The in-memory value
    /// is updated first so the session stays usable for this run even when
    /// persisting fails.
    pub fn set_token(&mut self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.token = Some(token.clone());

        fs::create_dir_all(&self.dir).context("Failed to create session directory")?;

        let contents = serde_json::to_string_pretty(&StoredSession { token })
            .context("Failed to serialize session")?;

        fs::write(self.session_path(), contents).context("Failed to write session file")?;

        Ok(())
    }

    /// Forget the credential and remove the persisted file.
    pub fn clear(&mut self) -> Result<()> {
        self.token = None;

        let path = self.session_path();
        if path.exists() {
            fs::remove_file(&path).context("Failed to delete session file")?;
        }

        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_without_file_has_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path()).unwrap();
        assert!(store.token().is_none());
    }

    #[test]
    fn token_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = SessionStore::open(dir.path()).unwrap();
        store.set_token("tok-123").unwrap();
        assert_eq!(store.token(), Some("tok-123"));

        let reopened = SessionStore::open(dir.path()).unwrap();
        assert_eq!(reopened.token(), Some("tok-123"));
    }

    #[test]
    fn clear_removes_file_and_memory() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = SessionStore::open(dir.path()).unwrap();
        store.set_token("tok-123").unwrap();
        store.clear().unwrap();
        assert!(store.token().is_none());
        assert!(!dir.path().join(SESSION_FILE).exists());

        let reopened = SessionStore::open(dir.path()).unwrap();
        assert!(reopened.token().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::open(dir.path()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();

        let store = SessionStore::open(dir.path()).unwrap();
        assert!(store.token().is_none());
    }
}
