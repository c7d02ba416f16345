//! Session persistence for the signed-in operator.
//!
//! A session is the opaque token handed out by the login endpoint plus the
//! operator profile. It is written to `<state_dir>/session.json` under the
//! fixed keys `authToken` and `user`, survives restarts, and is removed on
//! logout.
//!
//! Authenticated calls receive the [`Session`] explicitly; nothing reads the
//! store behind the caller's back.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use payflow_core::AdminProfile;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from reading or writing the session file.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Filesystem access failed.
    #[error("session file I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but does not hold a session.
    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// An authenticated operator session.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    /// Opaque token sent as `X-Auth-Token`.
    pub token: SecretString,
    /// Who the token belongs to.
    pub user: AdminProfile,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

impl Session {
    /// Create a session from a token and profile.
    #[must_use]
    pub fn new(token: impl Into<String>, user: AdminProfile) -> Self {
        Self {
            token: SecretString::from(token.into()),
            user,
        }
    }

    /// Whether the token is usable at all.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.expose_secret().trim().is_empty()
    }
}

/// On-disk layout, keyed like the browser storage it replaces.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "authToken")]
    auth_token: String,
    user: AdminProfile,
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            auth_token: session.token.expose_secret().to_string(),
            user: session.user.clone(),
        }
    }
}

impl StoredSession {
    fn into_session(self) -> Option<Session> {
        if self.auth_token.trim().is_empty() {
            return None;
        }
        Some(Session::new(self.auth_token, self.user))
    }
}

/// Client-side session storage.
pub trait SessionStore {
    /// Read the current session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<Session>, SessionStoreError>;

    /// Replace the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set_session(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Forget the stored session. Clearing an empty store is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear_session(&self) -> Result<(), SessionStoreError>;

    /// The stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get_token(&self) -> Result<Option<SecretString>, SessionStoreError> {
        Ok(self.load()?.map(|session| session.token))
    }
}

/// Session store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store reading and writing `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionStoreError {
        SessionStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let stored: StoredSession = serde_json::from_str(&contents)?;
        let session = stored.into_session();
        if session.is_none() {
            warn!(path = %self.path.display(), "Session file has an empty token");
        }
        Ok(session)
    }

    fn set_session(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let body = serde_json::to_vec_pretty(&StoredSession::from(session))?;

        // Write next to the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        let mut file = open_private(&tmp).map_err(|e| self.io_error(e))?;
        file.write_all(&body).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), user = %session.user.username, "Session saved");
        Ok(())
    }

    fn clear_session(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// In-memory session store.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Mutex::new(Some(session)),
        }
    }
}

impl std::fmt::Debug for MemorySessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySessionStore").finish_non_exhaustive()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionStoreError> {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone().filter(Session::has_token))
    }

    fn set_session(&self, session: &Session) -> Result<(), SessionStoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> Result<(), SessionStoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("jwt-token", AdminProfile::named("admin"))
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested/session.json"));

        assert!(store.load().unwrap().is_none());
        store.set_session(&session()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token.expose_secret(), "jwt-token");
        assert_eq!(loaded.user.username, "admin");
        assert_eq!(
            store.get_token().unwrap().unwrap().expose_secret(),
            "jwt-token"
        );
    }

    #[test]
    fn test_file_store_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.set_session(&session()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["authToken"], "jwt-token");
        assert_eq!(raw["user"]["username"], "admin");
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        store.set_session(&session()).unwrap();

        store.clear_session().unwrap();
        store.clear_session().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_empty_token_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"authToken":"","user":{"username":"admin"}}"#).unwrap();

        assert!(FileSessionStore::new(path).load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = FileSessionStore::new(path).load().unwrap_err();
        assert!(matches!(err, SessionStoreError::Corrupt(_)));
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        assert!(store.get_token().unwrap().is_none());

        store.set_session(&session()).unwrap();
        assert!(store.load().unwrap().is_some());

        store.clear_session().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let rendered = format!("{:?}", session());
        assert!(!rendered.contains("jwt-token"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
