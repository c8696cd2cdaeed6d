//! Session configuration
//!
//! Loaded from TOML; every field has a default, and a missing file yields
//! the default configuration.

use gs_reconcile::{Reconciler, DEFAULT_RESET_PARAM};
use gs_session::{Domain, DEFAULT_STORAGE_KEY};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Guest session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Namespaced key the session record is stored under
    pub storage_key: String,
    /// Query parameter whose presence clears the guest session
    pub reset_param: String,
    /// Host variant seeded into a new session
    pub default_domain: Domain,
}

/// Errors loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`SessionConfig`]
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SessionConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With storage key
    #[inline]
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// With reset parameter name
    #[inline]
    #[must_use]
    pub fn with_reset_param(mut self, name: impl Into<String>) -> Self {
        self.reset_param = name.into();
        self
    }

    /// With default domain
    #[inline]
    #[must_use]
    pub fn with_default_domain(mut self, domain: Domain) -> Self {
        self.default_domain = domain;
        self
    }

    /// Parse TOML
    ///
    /// # Errors
    /// [`ConfigError::Toml`] on syntax errors or unknown domain values.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from a TOML file; a missing file yields defaults
    ///
    /// # Errors
    /// Read failures other than not-found, and parse failures.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        Self::from_toml_str(&contents)
    }

    /// Reconciler honoring the configured reset parameter
    #[must_use]
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new().with_reset_param(&self.reset_param)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            reset_param: DEFAULT_RESET_PARAM.to_string(),
            default_domain: Domain::default(),
        }
    }
}
