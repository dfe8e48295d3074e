//! Durable backing stores.
//!
//! [`StorageBackend`] is the host-provided key/value mechanism underlying
//! all stores. [`FileBackend`] keeps one JSON file per key under a data
//! directory; [`MemoryBackend`] backs tests and ephemeral runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default data directory.
///
/// - macOS: `~/Library/Application Support/Monedero`
/// - Linux: `~/.local/share/monedero`
/// - Windows: `%APPDATA%\Monedero`
pub fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("Monedero"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::data_dir()
            .map(|d| d.join("monedero"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// ============================================================================
// Backend Contract
// ============================================================================

/// Durable key/value storage.
///
/// Values are opaque serialized JSON strings; (de)serialization belongs to
/// the cells. The backend is shared process-wide and no caller owns
/// exclusive write access to a key.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Loads the raw value under `key`, or `None` if absent.
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores the raw value under `key`.
    async fn store(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ============================================================================
// File Backend
// ============================================================================

/// File-per-key backend: `<dir>/<key>.json`.
///
/// Writes are atomic (temp file + rename) and files get restrictive
/// permissions on Unix.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a backend rooted at the platform default data directory.
    pub fn default_location() -> Self {
        Self::new(default_data_dir())
    }

    /// The directory this backend writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path(key);
        ensure_dir(&self.dir).await?;

        // Write atomically (write to temp file, then rename)
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, value).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        set_restrictive_permissions(&path).await?;
        debug!(key, path = %path.display(), "Value persisted");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Ensures the data directory exists with owner-only permissions.
async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "Creating data directory");
        tokio::fs::create_dir_all(path).await?;
        set_restrictive_dir_permissions(path).await?;
    }
    Ok(())
}

/// Sets restrictive file permissions (0o600) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o600); // Owner read/write only
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// Sets restrictive directory permissions (0o700) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o700); // Owner only
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// Memory Backend
// ============================================================================

/// In-memory backend for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.map.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
