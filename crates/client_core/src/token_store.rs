//! Durable storage for the bearer token.
//!
//! The file store keeps a flat JSON object of string keys and values, so the token
//! lives under [`TOKEN_STORAGE_KEY`] the same way it would in browser local storage.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::error::StoreError;

pub const TOKEN_STORAGE_KEY: &str = "token";
pub const STORAGE_FILE_NAME: &str = "storage.json";

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(STORAGE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let serialized = serde_json::to_string_pretty(entries).map_err(|source| {
            StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, serialized).map_err(io_err)
    }

    /// Entries to rewrite on save; an unreadable file is replaced rather than kept.
    fn entries_for_update(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.read_entries() {
            Ok(entries) => Ok(entries),
            Err(StoreError::Corrupt { path, source }) => {
                warn!(path = %path.display(), "discarding unreadable token storage: {source}");
                Ok(BTreeMap::new())
            }
            Err(err) => Err(err),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(TOKEN_STORAGE_KEY))
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        let mut entries = self.entries_for_update()?;
        entries.insert(TOKEN_STORAGE_KEY.to_string(), token.to_string());
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), "token persisted");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries_for_update()?;
        if entries.remove(TOKEN_STORAGE_KEY).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.write_entries(&entries)?;
        debug!(path = %self.path.display(), "token removed");
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        Ok(())
    }
}
