//! JSON file-backed session store
//!
//! The backing file is a JSON object; the session record lives under one
//! namespaced key and any other keys in the document are left untouched.

use crate::error::{Result, StoreError};
use crate::state::{Domain, FieldValue, SessionState, StateKey};
use crate::store::SessionStore;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Default namespaced key for the session record
pub const DEFAULT_STORAGE_KEY: &str = "guest-session";

type Document = Map<String, Value>;

/// Store persisting the record to a JSON document on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    key: String,
    /// Serializes read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl FileStore {
    /// Create store at `path` using [`DEFAULT_STORAGE_KEY`]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, DEFAULT_STORAGE_KEY)
    }

    /// Create store at `path` under a custom storage key
    #[must_use]
    pub fn with_key(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    /// Backing file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Storage key of the record
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_document(&self) -> Result<Document> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(StoreError::io_error(&self.path, e)),
        };
        if contents.trim().is_empty() {
            return Ok(Document::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_document(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io_error(parent, e))?;
        }

        let contents = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, contents).map_err(|e| StoreError::io_error(&tmp, e))?;

        // Record holds tokens: owner read/write only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| StoreError::io_error(&tmp, e))?;
        }

        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::io_error(&self.path, e))
    }

    fn read_record(&self, document: &Document) -> Result<Option<SessionState>> {
        document
            .get(&self.key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .map_err(StoreError::from)
    }

    fn write_record(&self, document: &mut Document, state: &SessionState) -> Result<()> {
        document.insert(self.key.clone(), serde_json::to_value(state)?);
        self.write_document(document)
    }
}

impl SessionStore for FileStore {
    fn snapshot(&self) -> Result<SessionState> {
        let _guard = self.lock.lock();
        let document = self.read_document()?;
        Ok(self.read_record(&document)?.unwrap_or_default())
    }

    fn set(&self, key: StateKey, value: Option<FieldValue>) -> Result<()> {
        let _guard = self.lock.lock();
        let mut document = self.read_document()?;
        let mut state = self.read_record(&document)?.unwrap_or_default();
        state.set(key, value)?;
        self.write_record(&mut document, &state)
    }

    fn seed_defaults(&self, domain: Domain) -> Result<bool> {
        let _guard = self.lock.lock();
        let mut document = self.read_document()?;
        if self.read_record(&document)?.is_some() {
            return Ok(false);
        }
        tracing::debug!(path = %self.path.display(), key = %self.key, "seeding session record");
        self.write_record(&mut document, &SessionState::new().with_domain(domain))?;
        Ok(true)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock();
        let mut document = self.read_document()?;
        if document.remove(&self.key).is_none() {
            return Ok(());
        }
        self.write_document(&document)
    }
}
