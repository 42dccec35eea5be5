#![forbid(unsafe_code)]

//! Snapshot stores for cross-session navigation state.
//!
//! A session persists one small opaque byte blob (the shell's encoded
//! catalog index) at its boundaries: loaded once before the loop starts,
//! saved once after it exits. Stores never interpret the bytes.
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: store failures never panic; operations
//!    return `Result` and callers degrade to the default seed.
//! 2. **Atomic writes**: file saves use the write-then-rename pattern so a
//!    crash mid-save cannot corrupt the previous snapshot.
//! 3. **First run is not an error**: a missing snapshot loads as `None`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

/// Errors that can occur during snapshot store operations.
#[derive(Debug)]
pub enum SnapshotError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Store state is unusable (e.g. a poisoned lock).
    Corruption(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "I/O error: {e}"),
            SnapshotError::Corruption(msg) => write!(f, "snapshot corruption: {msg}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(e) => Some(e),
            SnapshotError::Corruption(_) => None,
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

/// Result type for snapshot store operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Trait for pluggable snapshot stores.
///
/// Implementations must be thread-safe (`Send + Sync`); the bytes are
/// opaque to the store.
pub trait SnapshotStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Load the stored snapshot.
    ///
    /// Returns `Ok(None)` when no snapshot exists (first run).
    fn load(&self) -> SnapshotResult<Option<Vec<u8>>>;

    /// Replace the stored snapshot.
    fn save(&self, bytes: &[u8]) -> SnapshotResult<()>;

    /// Remove the stored snapshot.
    fn clear(&self) -> SnapshotResult<()>;
}

/// In-memory snapshot store for tests and ephemeral sessions.
///
/// State is lost when the process exits.
#[derive(Default)]
pub struct MemorySnapshotStore {
    data: RwLock<Option<Vec<u8>>>,
}

impl MemorySnapshotStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store pre-populated with a snapshot.
    #[must_use]
    pub fn with_snapshot(bytes: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(bytes)),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn name(&self) -> &str {
        "MemorySnapshotStore"
    }

    fn load(&self) -> SnapshotResult<Option<Vec<u8>>> {
        let guard = self
            .data
            .read()
            .map_err(|_| SnapshotError::Corruption("lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, bytes: &[u8]) -> SnapshotResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| SnapshotError::Corruption("lock poisoned".into()))?;
        *guard = Some(bytes.to_vec());
        Ok(())
    }

    fn clear(&self) -> SnapshotResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| SnapshotError::Corruption("lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

impl fmt::Debug for MemorySnapshotStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self
            .data
            .read()
            .map(|g| g.as_ref().map_or(0, Vec::len))
            .unwrap_or(0);
        f.debug_struct("MemorySnapshotStore")
            .field("bytes", &len)
            .finish()
    }
}

/// File-based snapshot store.
///
/// The snapshot lives in a single file. Writes go to `{path}.tmp` first and
/// are renamed into place, so the previous snapshot survives a crash
/// mid-save.
#[derive(Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store at the given path.
    ///
    /// The file does not need to exist; it is created on first save.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn name(&self) -> &str {
        "FileSnapshotStore"
    }

    fn load(&self) -> SnapshotResult<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                debug!(path = %self.path.display(), len = bytes.len(), "snapshot loaded");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, bytes: &[u8]) -> SnapshotResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), len = bytes.len(), "snapshot saved");
        Ok(())
    }

    fn clear(&self) -> SnapshotResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
