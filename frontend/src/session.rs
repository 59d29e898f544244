//! # Session Store
//!
//! The single access point for the signed-in identity. Pages never read
//! storage themselves; they receive a [`Session`] value obtained through
//! [`SessionStore::get`] (see [`crate::router::guard`]).
//!
//! A stored session is all-or-nothing: the identity triple is written as one
//! document and replaced atomically, so a reader either sees a complete
//! session or none at all.

use anyhow::{Context, Result};
use shared::Session;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Storage abstraction for the client-side session
pub trait SessionStore: Send + Sync {
    /// The stored session, or `None` when signed out
    fn get(&self) -> Result<Option<Session>>;

    /// Persist `session`, replacing any previous one
    fn set(&self, session: &Session) -> Result<()>;

    /// Remove the stored session. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// Session persisted as a JSON file; survives restarts but not logout
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<Session>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read session file {}", self.path.display())
                })
            }
        };

        match serde_json::from_str::<Session>(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // An incomplete document means no usable session
                warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    fn set(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory {}", parent.display())
                })?;
            }
        }

        let json = serde_json::to_string_pretty(session)?;
        let temp = self.temp_path();
        write_private(&temp, json.as_bytes())
            .with_context(|| format!("Failed to write session file {}", temp.display()))?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(e)
                .with_context(|| format!("Failed to replace session file {}", self.path.display()));
        }

        info!("🔐 Session stored for {}", session.user_email);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("🔓 Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session to clear at {}", self.path.display());
                Ok(())
            }
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove session file {}", self.path.display())
            }),
        }
    }
}

/// Create or truncate `path` readable by the owner only; it may hold a bearer token
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// In-process session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<Session>> {
        let guard = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))?;
        Ok(guard.clone())
    }

    fn set(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("Session lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}
