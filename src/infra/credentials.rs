//! Durable client-side credential storage.
//!
//! Holds exactly two values, the bearer token and the display username,
//! under the same keys the browser console used (`admin_token`,
//! `admin_username`).

use std::{
    fmt, fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::InfraError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCredential {
    #[serde(rename = "admin_token")]
    pub token: String,
    #[serde(rename = "admin_username", default)]
    pub username: String,
}

pub trait CredentialStore: fmt::Debug + Send + Sync {
    fn load(&self) -> Result<Option<PersistedCredential>, InfraError>;
    fn save(&self, credential: &PersistedCredential) -> Result<(), InfraError>;
    /// Remove any stored credential; clearing an empty store succeeds.
    fn clear(&self) -> Result<(), InfraError>;
}

/// JSON file store used by the command-line console.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<PersistedCredential>, InfraError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let credential: PersistedCredential = serde_json::from_str(&data).map_err(|err| {
            InfraError::storage(format!("{} is not a valid credential file: {err}", self.path.display()))
        })?;
        Ok((!credential.token.is_empty()).then_some(credential))
    }

    fn save(&self, credential: &PersistedCredential) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(credential)
            .map_err(|err| InfraError::storage(format!("failed to encode credential: {err}")))?;
        let mut file = open_private(&self.path)?;
        file.write_all(&data)?;
        // files created by older runs keep their mode until narrowed here
        restrict_permissions(&self.path)?;
        debug!(path = %self.path.display(), "credential persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), InfraError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
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

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), InfraError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), InfraError> {
    Ok(())
}

/// Process-local store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<PersistedCredential>>,
}

impl MemoryCredentialStore {
    pub fn with_credential(credential: PersistedCredential) -> Self {
        Self {
            inner: Mutex::new(Some(credential)),
        }
    }

    pub fn current(&self) -> Option<PersistedCredential> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<PersistedCredential>, InfraError> {
        Ok(self.current())
    }

    fn save(&self, credential: &PersistedCredential) -> Result<(), InfraError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), InfraError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn credential() -> PersistedCredential {
        PersistedCredential {
            token: "tok".into(),
            username: "admin".into(),
        }
    }

    #[test]
    fn file_store_round_trips_under_browser_keys() {
        let dir = TempDir::new().expect("tmp dir");
        let store = FileCredentialStore::new(dir.path().join("nested").join("session.json"));

        store.save(&credential()).expect("save");
        let raw = fs::read_to_string(store.path()).expect("read");
        assert!(raw.contains("\"admin_token\""));
        assert!(raw.contains("\"admin_username\""));
        assert_eq!(store.load().expect("load"), Some(credential()));
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("tmp dir");
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").expect("seed");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");
        let store = FileCredentialStore::new(&path);

        store.save(&credential()).expect("save over existing");
        let mode = fs::metadata(&path).expect("meta").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let fresh = FileCredentialStore::new(dir.path().join("fresh.json"));
        fresh.save(&credential()).expect("save new");
        let mode = fs::metadata(fresh.path()).expect("meta").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fresh.load().expect("load"), Some(credential()));
    }

    #[test]
    fn missing_file_loads_as_none_and_clear_is_idempotent() {
        let dir = TempDir::new().expect("tmp dir");
        let store = FileCredentialStore::new(dir.path().join("session.json"));

        assert_eq!(store.load().expect("load"), None);
        store.clear().expect("first clear");
        store.clear().expect("second clear");
    }

    #[test]
    fn corrupted_file_is_a_storage_error() {
        let dir = TempDir::new().expect("tmp dir");
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").expect("write");

        let err = FileCredentialStore::new(path).load().expect_err("corrupt");
        assert!(matches!(err, InfraError::Storage { .. }));
    }

    #[test]
    fn memory_store_clears() {
        let store = MemoryCredentialStore::with_credential(credential());
        store.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
    }
}
